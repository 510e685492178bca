// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Returned to the producer feeding a [`Subject`](crate::Subject) it can no
/// longer push into.
///
/// This never reaches observers; their failures arrive as
/// [`RivuletError`](crate::RivuletError) through `on_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// `complete` or `error` was already called on the subject.
    #[error("Subject is closed")]
    Closed,
}

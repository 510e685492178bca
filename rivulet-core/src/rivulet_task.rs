// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background tasks with cooperative cancellation, spawned on Tokio.

use crate::{CancellationToken, Result, RivuletError};
use core::future::Future;
use tokio::runtime::Handle;

/// Handle to a spawned task; dropping it requests cancellation.
///
/// The spawned future receives a [`CancellationToken`] and is expected to stop
/// at its next checkpoint once the token fires.
///
/// ```rust
/// use rivulet_core::RivuletTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = RivuletTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// })
/// .unwrap();
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct RivuletTask {
    cancel: CancellationToken,
}

impl RivuletTask {
    /// Spawns `f` on the Tokio runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns `RivuletError::StreamProcessingError` when called outside a Tokio
    /// runtime. `f` is not invoked in that case.
    pub fn spawn<F, Fut>(f: F) -> Result<Self>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current()
            .map_err(|e| RivuletError::stream_error(format!("no Tokio runtime available: {e}")))?;
        Ok(Self::spawn_on(&handle, f))
    }

    /// Spawns `f` on the given runtime handle.
    pub fn spawn_on<F, Fut>(handle: &Handle, f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        handle.spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signals the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RivuletTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

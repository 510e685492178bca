// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Errors carried by terminal notifications.
//!
//! A [`RivuletError`] is what an observer receives in `on_error`. Failures raised
//! inside user callbacks (projections, combine functions, `create` producers) are
//! returned as `Err` and travel downstream unchanged, so the value an observer
//! receives is the very value the callback returned.
//!
//! ```
//! use rivulet_core::{Result, ResultExt};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse::<u16>().map_err(rivulet_core::RivuletError::user_error).context("port")
//! }
//!
//! assert_eq!(parse_port("8080").unwrap(), 8080);
//! assert_eq!(
//!     parse_port("http").unwrap_err().to_string(),
//!     "Stream processing error: port: invalid digit found in string"
//! );
//! ```

use std::error::Error;
use std::sync::Arc;

/// Terminal error of an observable chain.
///
/// Cloning is cheap: user errors sit behind an `Arc`, so one failure can be
/// delivered to several observers and still be recognised as the same instance.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RivuletError {
    /// A source or operator failed with a descriptive message.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// What went wrong
        context: String,
    },

    /// Error returned by user code.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn Error + Send + Sync>),

    /// An operator was configured with a concurrency limit of zero.
    #[error("Invalid concurrency limit: {limit} (must be at least 1)")]
    InvalidConcurrencyLimit {
        /// The rejected limit
        limit: usize,
    },

    /// A single-shot source was subscribed a second time.
    #[error("Source already consumed: {context}")]
    SourceConsumed {
        /// Which source was re-subscribed
        context: String,
    },
}

impl RivuletError {
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wraps an error raised by user code, keeping it as the `source()`.
    pub fn user_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    #[must_use]
    pub const fn invalid_concurrency_limit(limit: usize) -> Self {
        Self::InvalidConcurrencyLimit { limit }
    }

    pub fn source_consumed(context: impl Into<String>) -> Self {
        Self::SourceConsumed {
            context: context.into(),
        }
    }

    /// Returns `true` for errors caused by how the library was called rather
    /// than by the data flowing through it.
    ///
    /// ```
    /// use rivulet_core::RivuletError;
    ///
    /// assert!(RivuletError::invalid_concurrency_limit(0).is_misuse());
    /// assert!(!RivuletError::stream_error("timeout").is_misuse());
    /// ```
    #[must_use]
    pub const fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::InvalidConcurrencyLimit { .. } | Self::SourceConsumed { .. }
        )
    }

    /// The wrapped user error, if this is a `UserError`.
    #[must_use]
    pub fn user_source(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::UserError(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Result alias used by every fallible callback.
pub type Result<T> = std::result::Result<T, RivuletError>;

/// Converts foreign errors into [`RivuletError`].
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoRivuletError {
    /// Wraps `self` as a stream error prefixed with `context`. An empty context
    /// keeps the error as a `UserError` instead.
    fn into_rivulet_error(self, context: &str) -> RivuletError;

    /// Wraps `self` as a `UserError`.
    fn into_rivulet(self) -> RivuletError
    where
        Self: Sized,
    {
        self.into_rivulet_error("")
    }
}

impl<E: Error + Send + Sync + 'static> IntoRivuletError for E {
    fn into_rivulet_error(self, context: &str) -> RivuletError {
        if context.is_empty() {
            RivuletError::user_error(self)
        } else {
            RivuletError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Adds context to a failing callback result.
///
/// User errors become stream errors carrying the context and the user error's
/// message. Stream errors get the context prepended to their own. Misuse errors
/// (see [`RivuletError::is_misuse`]) are returned unchanged so that callers can
/// still match on their fields.
pub trait ResultExt<T> {
    /// # Errors
    /// Returns the original error, with `context` prepended as described above.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`ResultExt::context`], building the context only on failure.
    ///
    /// # Errors
    /// Returns the original error, with the built context prepended as for `context`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RivuletError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| prefix_context(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| prefix_context(e.into(), f()))
    }
}

fn prefix_context(error: RivuletError, prefix: String) -> RivuletError {
    match error {
        RivuletError::UserError(inner) => RivuletError::stream_error(format!("{prefix}: {inner}")),
        RivuletError::StreamProcessingError { context } => {
            RivuletError::stream_error(format!("{prefix}: {context}"))
        }
        misuse => misuse,
    }
}

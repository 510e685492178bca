// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Rivulet push-stream library.
//!
//! This crate is meant for development and testing only.
//!
//! # Key Types
//!
//! - [`Recorder`]: an observer that records every notification it receives, so a
//!   test can assert on the exact sequence delivered downstream.
//! - [`ProbeSource`]: a manually driven source that counts live subscriptions,
//!   used to check how many inner sources an operator keeps open at once.
//! - [`ErrorInjectingStream`]: wraps a `futures::Stream` and injects a
//!   `StreamItem::Error` at a chosen position.
//!
//! ```rust
//! use rivulet_core::{from_iter, Observable};
//! use rivulet_test_utils::Recorder;
//!
//! let recorder = Recorder::new();
//! from_iter(vec![1, 2, 3]).subscribe(recorder.observer());
//!
//! assert_eq!(recorder.values(), vec![1, 2, 3]);
//! assert!(recorder.is_completed());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod probe;
pub mod recorder;

use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use rivulet_core::{RivuletError, StreamItem};

pub use error_injection::ErrorInjectingStream;
pub use helpers::{assert_no_element_emitted, wait_until};
pub use probe::ProbeSource;
pub use recorder::{Notification, Recorder};

/// Error value used by tests that only need *some* failure.
pub fn test_error(message: &str) -> RivuletError {
    RivuletError::stream_error(message)
}

/// Creates a channel whose receiving half yields `StreamItem::Value` for each sent value.
///
/// Pair it with [`rivulet_core::from_stream`] to feed an observable from a test.
///
/// ```rust
/// use futures::StreamExt;
/// use rivulet_core::StreamItem;
/// use rivulet_test_utils::test_channel;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
/// tx.unbounded_send(7).unwrap();
///
/// assert_eq!(stream.next().await, Some(StreamItem::Value(7)));
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded();
    (tx, rx.map(StreamItem::Value))
}

/// Creates a channel that carries `StreamItem<T>`, so tests can send errors too.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    mpsc::unbounded()
}

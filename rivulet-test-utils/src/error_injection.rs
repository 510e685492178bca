// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Feeding `from_stream` a sequence that fails part-way.

use futures::stream::{BoxStream, Stream, StreamExt};
use rivulet_core::{RivuletError, StreamItem};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Lifts a plain stream into `StreamItem`s and slips one error in after
/// `values_before_error` values.
///
/// If the inner stream ends first, no error is produced.
///
/// ```rust
/// use futures::{stream, StreamExt};
/// use rivulet_test_utils::ErrorInjectingStream;
///
/// # #[tokio::main]
/// # async fn main() {
/// let items: Vec<_> = ErrorInjectingStream::new(stream::iter(vec![1, 2]), 1)
///     .collect()
///     .await;
///
/// assert!(items[0].is_value());
/// assert!(items[1].is_error());
/// assert!(items[2].is_value());
/// # }
/// ```
pub struct ErrorInjectingStream<T> {
    values: BoxStream<'static, T>,
    countdown: Option<usize>,
    message: String,
}

impl<T: Send + 'static> ErrorInjectingStream<T> {
    pub fn new(values: impl Stream<Item = T> + Send + 'static, values_before_error: usize) -> Self {
        Self {
            values: values.boxed(),
            countdown: Some(values_before_error),
            message: "Injected test error".to_string(),
        }
    }

    /// Replaces the injected error's message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl<T> Stream for ErrorInjectingStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.countdown == Some(0) {
            this.countdown = None;
            let error = RivuletError::stream_error(std::mem::take(&mut this.message));
            return Poll::Ready(Some(StreamItem::Error(error)));
        }

        this.values.poll_next_unpin(cx).map(|next| {
            next.map(|value| {
                if let Some(remaining) = this.countdown.as_mut() {
                    *remaining -= 1;
                }
                StreamItem::Value(value)
            })
        })
    }
}

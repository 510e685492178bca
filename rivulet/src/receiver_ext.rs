// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods for tokio `UnboundedReceiver` to create observables.

use futures::stream::{self, Stream};
use rivulet_core::{from_stream, FromStream, StreamItem};
use tokio::sync::mpsc::UnboundedReceiver;

/// Extension trait for `UnboundedReceiver` to create single-shot observables.
pub trait UnboundedReceiverExt<T> {
    /// Converts the receiver into an observable emitting every received value.
    ///
    /// The observable completes once every sender has been dropped. Like any
    /// [`from_stream`] source it can be subscribed once and needs a tokio runtime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet::prelude::*;
    /// use rivulet_test_utils::{wait_until, Recorder};
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let (tx, rx) = mpsc::unbounded_channel();
    /// let recorder = Recorder::new();
    ///
    /// rx.into_observable_source()
    ///     .merge_map(|v: u32, _| Ok(vec![v, v + 1]))
    ///     .subscribe(recorder.observer());
    ///
    /// tx.send(10).unwrap();
    /// drop(tx);
    ///
    /// assert!(wait_until(|| recorder.is_completed(), 1000).await);
    /// assert_eq!(recorder.values(), vec![10, 11]);
    /// # }
    /// ```
    fn into_observable_source(
        self,
    ) -> FromStream<impl Stream<Item = StreamItem<T>> + Send + 'static, T>;

    /// Converts the receiver into an observable, transforming each value with `mapper`.
    ///
    /// This lets receivers of different message types feed sources of one
    /// shared type, for instance an enum of events.
    fn into_observable_source_with<U, F>(
        self,
        mapper: F,
    ) -> FromStream<impl Stream<Item = StreamItem<U>> + Send + 'static, U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static;
}

impl<T: Send + 'static> UnboundedReceiverExt<T> for UnboundedReceiver<T> {
    fn into_observable_source(
        self,
    ) -> FromStream<impl Stream<Item = StreamItem<T>> + Send + 'static, T> {
        self.into_observable_source_with(core::convert::identity)
    }

    fn into_observable_source_with<U, F>(
        self,
        mapper: F,
    ) -> FromStream<impl Stream<Item = StreamItem<U>> + Send + 'static, U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        from_stream(stream::unfold(
            (self, mapper),
            |(mut receiver, mut mapper)| async move {
                let value = receiver.recv().await?;
                Some((StreamItem::Value(mapper(value)), (receiver, mapper)))
            },
        ))
    }
}

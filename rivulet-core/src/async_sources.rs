// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sources backed by futures and `futures::Stream`s.
//!
//! Both sources are single-shot: the wrapped future or stream is moved into a
//! Tokio task on the first subscription, and any later subscription receives
//! `RivuletError::SourceConsumed`. Releasing the subscription cancels the task.
//! Subscribing outside a Tokio runtime signals a `StreamProcessingError`.

use crate::mutex::Mutex;
use crate::{
    BoxObservable, BoxObserver, IntoObservable, Observable, RivuletError, RivuletTask, StreamItem,
    Subscriber, Subscription,
};
use core::future::Future;
use core::marker::PhantomData;
use core::pin::pin;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Source draining a `futures::Stream` of [`StreamItem`]s. Built by [`from_stream`].
pub struct FromStream<S, U> {
    stream: Mutex<Option<S>>,
    _marker: PhantomData<fn() -> U>,
}

/// Wraps `stream`: each `StreamItem::Value` is emitted, the first
/// `StreamItem::Error` terminates with that error and the end of the stream
/// completes.
///
/// ```
/// use futures::stream;
/// use rivulet_core::{from_stream, ObservableExt, StreamItem};
///
/// # #[tokio::main]
/// # async fn main() {
/// use futures::StreamExt;
///
/// let source = from_stream(stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]));
/// let collected: Vec<_> = source.into_stream().collect().await;
///
/// assert_eq!(collected, vec![StreamItem::Value(1), StreamItem::Value(2)]);
/// # }
/// ```
pub fn from_stream<S, U>(stream: S) -> FromStream<S, U>
where
    S: Stream<Item = StreamItem<U>> + Send + 'static,
    U: Send + 'static,
{
    FromStream {
        stream: Mutex::new(Some(stream)),
        _marker: PhantomData,
    }
}

impl<S, U> Observable<U> for FromStream<S, U>
where
    S: Stream<Item = StreamItem<U>> + Send + 'static,
    U: Send + 'static,
{
    fn subscribe(&self, observer: BoxObserver<U>) -> Subscription {
        let subscription = Subscription::new();
        let mut subscriber = Subscriber::new(observer, subscription.clone());

        let Some(handle) = runtime_handle(&mut subscriber, "from_stream") else {
            return subscription;
        };
        let Some(stream) = self.stream.lock().take() else {
            subscriber.error(RivuletError::source_consumed("from_stream"));
            return subscription;
        };

        let task = RivuletTask::spawn_on(&handle, move |cancel| async move {
            let mut stream = pin!(stream);
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    item = stream.next() => match item {
                        Some(item) => item.deliver(&mut subscriber),
                        None => {
                            subscriber.complete();
                            break;
                        }
                    },
                }
                if subscriber.is_closed() {
                    break;
                }
            }
        });
        subscription.add_teardown(move || drop(task));
        subscription
    }
}

/// Source resolving a future once. Built by [`from_future`].
pub struct FromFuture<F, U> {
    future: Mutex<Option<F>>,
    _marker: PhantomData<fn() -> U>,
}

/// Wraps `future`: `Ok` emits the value and completes, `Err` terminates with
/// the error.
pub fn from_future<F, U>(future: F) -> FromFuture<F, U>
where
    F: Future<Output = crate::Result<U>> + Send + 'static,
    U: Send + 'static,
{
    FromFuture {
        future: Mutex::new(Some(future)),
        _marker: PhantomData,
    }
}

impl<F, U> Observable<U> for FromFuture<F, U>
where
    F: Future<Output = crate::Result<U>> + Send + 'static,
    U: Send + 'static,
{
    fn subscribe(&self, observer: BoxObserver<U>) -> Subscription {
        let subscription = Subscription::new();
        let mut subscriber = Subscriber::new(observer, subscription.clone());

        let Some(handle) = runtime_handle(&mut subscriber, "from_future") else {
            return subscription;
        };
        let Some(future) = self.future.lock().take() else {
            subscriber.error(RivuletError::source_consumed("from_future"));
            return subscription;
        };

        let task = RivuletTask::spawn_on(&handle, move |cancel| async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                result = future => match result {
                    Ok(value) => {
                        subscriber.next(value);
                        subscriber.complete();
                    }
                    Err(error) => subscriber.error(error),
                },
            }
        });
        subscription.add_teardown(move || drop(task));
        subscription
    }
}

fn runtime_handle<U>(subscriber: &mut Subscriber<U>, source: &str) -> Option<Handle> {
    match Handle::try_current() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("{source} subscribed outside a Tokio runtime: {e}");
            subscriber.error(RivuletError::stream_error(format!(
                "{source} requires a Tokio runtime: {e}"
            )));
            None
        }
    }
}

impl<S, U> IntoObservable<U> for FromStream<S, U>
where
    S: Stream<Item = StreamItem<U>> + Send + 'static,
    U: Send + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<F, U> IntoObservable<U> for FromFuture<F, U>
where
    F: Future<Output = crate::Result<U>> + Send + 'static,
    U: Send + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

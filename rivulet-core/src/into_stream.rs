// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Observable, Observer, RivuletError, StreamItem, Subscription};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

struct ChannelObserver<T> {
    sender: UnboundedSender<StreamItem<T>>,
}

impl<T: Send> Observer<T> for ChannelObserver<T> {
    fn on_next(&mut self, value: T) {
        let _ = self.sender.unbounded_send(StreamItem::Value(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        let _ = self.sender.unbounded_send(StreamItem::Error(error));
        self.sender.close_channel();
    }

    fn on_complete(&mut self) {
        self.sender.close_channel();
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Pull-based view of an observable. Built by
/// [`ObservableExt::into_stream`](crate::ObservableExt::into_stream).
///
/// Yields `StreamItem::Value` per `on_next`, one `StreamItem::Error` on error, and
/// ends on completion. Dropping it releases the underlying subscription.
///
/// ```
/// use rivulet_core::{from_iter, ObservableExt, StreamItem};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut stream = from_iter(vec![1, 2]).into_stream();
///
/// assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
/// assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
/// assert_eq!(stream.next().await, None);
/// # }
/// ```
pub struct ObservableStream<T> {
    receiver: UnboundedReceiver<StreamItem<T>>,
    subscription: Subscription,
}

impl<T: Send + 'static> ObservableStream<T> {
    pub(crate) fn subscribe<O>(source: &O) -> Self
    where
        O: Observable<T> + ?Sized,
    {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = source.subscribe(Box::new(ChannelObserver { sender }));
        Self {
            receiver,
            subscription,
        }
    }
}

impl<T> ObservableStream<T> {
    /// The subscription feeding this stream.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Stream for ObservableStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl<T> Drop for ObservableStream<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

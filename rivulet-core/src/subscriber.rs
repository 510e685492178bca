// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{BoxObserver, Observer, RivuletError, Subscription};

/// Grammar-enforcing wrapper around an observer, handed to sources.
///
/// - values are dropped once the subscriber is closed
/// - at most one terminal notification reaches the observer
/// - a terminal notification releases the subscription
///
/// A subscriber is closed after a terminal notification, after its
/// subscription was released, or when the wrapped observer reports
/// [`Observer::is_closed`].
pub struct Subscriber<T> {
    observer: BoxObserver<T>,
    subscription: Subscription,
    stopped: bool,
}

impl<T> Subscriber<T> {
    /// Wraps `observer`; `subscription` is the handle returned to the caller.
    pub fn new(observer: BoxObserver<T>, subscription: Subscription) -> Self {
        Self {
            observer,
            subscription,
            stopped: false,
        }
    }

    /// The subscription this subscriber feeds.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Forwards a value unless closed.
    pub fn next(&mut self, value: T) {
        if !self.is_closed() {
            self.observer.on_next(value);
        }
    }

    /// Forwards a terminal error unless closed, then releases the subscription.
    pub fn error(&mut self, error: RivuletError) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        self.observer.on_error(error);
        self.subscription.unsubscribe();
    }

    /// Forwards completion unless closed, then releases the subscription.
    pub fn complete(&mut self) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        self.observer.on_complete();
        self.subscription.unsubscribe();
    }

    /// Returns `true` when further notifications would be dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stopped || self.subscription.is_closed() || self.observer.is_closed()
    }
}

impl<T> Observer<T> for Subscriber<T> {
    fn on_next(&mut self, value: T) {
        self.next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.error(error);
    }

    fn on_complete(&mut self) {
        self.complete();
    }

    fn is_closed(&self) -> bool {
        Subscriber::is_closed(self)
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Manually driven source that tracks its live subscriptions.

use rivulet_core::mutex::Mutex;
use rivulet_core::{
    BoxObservable, BoxObserver, IntoObservable, Observable, RivuletError, Subscriber, Subscription,
};
use std::sync::{Arc, Weak};

type SharedSubscriber<U> = Arc<Mutex<Subscriber<U>>>;

struct ProbeState<U> {
    subscribers: Vec<(SharedSubscriber<U>, Subscription)>,
    active: usize,
    peak: usize,
}

/// A source whose subscriptions are driven one by one from the test.
///
/// Subscriptions are numbered in the order they were made. A subscription
/// counts as active until it is released, either by the subscriber or by a
/// terminal notification sent through [`ProbeSource::complete`] or
/// [`ProbeSource::error`].
///
/// ```rust
/// use rivulet_core::Observable;
/// use rivulet_test_utils::{ProbeSource, Recorder};
///
/// let probe = ProbeSource::new();
/// let recorder = Recorder::new();
/// probe.subscribe(recorder.observer());
///
/// probe.emit(0, "a");
/// probe.complete(0);
///
/// assert_eq!(recorder.values(), vec!["a"]);
/// assert_eq!(probe.active(), 0);
/// assert_eq!(probe.peak(), 1);
/// ```
pub struct ProbeSource<U> {
    state: Arc<Mutex<ProbeState<U>>>,
}

impl<U: Send + 'static> ProbeSource<U> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProbeState {
                subscribers: Vec::new(),
                active: 0,
                peak: 0,
            })),
        }
    }

    /// Number of subscriptions not yet released.
    pub fn active(&self) -> usize {
        self.state.lock().active
    }

    /// Highest number of simultaneously active subscriptions seen so far.
    pub fn peak(&self) -> usize {
        self.state.lock().peak
    }

    /// Total number of subscriptions ever made.
    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Returns `true` if subscription `index` has been released.
    ///
    /// # Panics
    ///
    /// Panics if no subscription with that index exists.
    pub fn is_released(&self, index: usize) -> bool {
        self.state.lock().subscribers[index].1.is_closed()
    }

    /// Delivers `value` to subscription `index`.
    pub fn emit(&self, index: usize, value: U) {
        self.subscriber(index).lock().next(value);
    }

    /// Completes subscription `index`.
    pub fn complete(&self, index: usize) {
        self.subscriber(index).lock().complete();
    }

    /// Fails subscription `index` with `error`.
    pub fn error(&self, index: usize, error: RivuletError) {
        self.subscriber(index).lock().error(error);
    }

    // The state lock is released before the subscriber runs, so downstream may
    // subscribe to this probe again from inside a notification.
    fn subscriber(&self, index: usize) -> SharedSubscriber<U> {
        Arc::clone(&self.state.lock().subscribers[index].0)
    }
}

fn release<U>(state: &Weak<Mutex<ProbeState<U>>>) {
    if let Some(state) = state.upgrade() {
        state.lock().active -= 1;
    }
}

impl<U: Send + 'static> Observable<U> for ProbeSource<U> {
    fn subscribe(&self, observer: BoxObserver<U>) -> Subscription {
        let subscription = Subscription::new();
        let subscriber = Subscriber::new(observer, subscription.clone());
        {
            let mut state = self.state.lock();
            state
                .subscribers
                .push((Arc::new(Mutex::new(subscriber)), subscription.clone()));
            state.active += 1;
            let active = state.active;
            state.peak = state.peak.max(active);
        }

        let weak = Arc::downgrade(&self.state);
        subscription.add_teardown(move || release(&weak));
        subscription
    }
}

impl<U: Send + 'static> IntoObservable<U> for ProbeSource<U> {
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U: Send + 'static> Default for ProbeSource<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Clone for ProbeSource<U> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

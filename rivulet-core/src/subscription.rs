// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Disposable subscription handles.
//!
//! A [`Subscription`] is returned by every call to
//! [`Observable::subscribe`](crate::Observable::subscribe). Releasing it stops the
//! flow of notifications and runs the teardown actions registered by the source.

use crate::mutex::Mutex;
use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Teardown = Box<dyn FnOnce() + Send>;

struct SubscriptionState {
    closed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

/// Handle to a live subscription.
///
/// Clones share the same state: unsubscribing through any clone closes all of
/// them. Releasing is idempotent; teardown actions run exactly once.
///
/// # Example
///
/// ```
/// use rivulet_core::Subscription;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let released = Arc::new(AtomicUsize::new(0));
/// let counter = released.clone();
///
/// let subscription = Subscription::with_teardown(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscription.unsubscribe();
/// subscription.unsubscribe();
///
/// assert!(subscription.is_closed());
/// assert_eq!(released.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionState>,
}

impl Subscription {
    /// Creates an open subscription without teardown actions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubscriptionState {
                closed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates an open subscription that runs `teardown` when released.
    pub fn with_teardown(teardown: impl FnOnce() + Send + 'static) -> Self {
        let subscription = Self::new();
        subscription.add_teardown(teardown);
        subscription
    }

    /// Creates a subscription that is already closed.
    ///
    /// Returned by sources that finish synchronously and hold no resources.
    #[must_use]
    pub fn empty() -> Self {
        let subscription = Self::new();
        subscription.inner.closed.store(true, Ordering::Release);
        subscription
    }

    /// Registers an action to run on release.
    ///
    /// If the subscription is already closed the action runs immediately.
    pub fn add_teardown(&self, teardown: impl FnOnce() + Send + 'static) {
        {
            let mut teardowns = self.inner.teardowns.lock();
            if !self.is_closed() {
                teardowns.push(Box::new(teardown));
                return;
            }
        }
        teardown();
    }

    /// Ties `child` to this subscription: releasing `self` releases `child`.
    pub fn add(&self, child: Subscription) {
        self.add_teardown(move || child.unsubscribe());
    }

    /// Releases the subscription and runs its teardown actions.
    ///
    /// Calling it more than once has no additional effect.
    pub fn unsubscribe(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let teardowns = core::mem::take(&mut *self.inner.teardowns.lock());
        for teardown in teardowns {
            teardown();
        }
    }

    /// Returns `true` once the subscription has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapting stream-like results into tagged inner subscriptions.
//!
//! Higher-order operators subscribe to many inner sources and need to know which
//! inner source produced each notification. [`subscribe_to_result`] adapts any
//! [`IntoObservable`] value, subscribes to it and reroutes every notification to an
//! [`InnerListener`], tagged with the caller's [`InnerKey`] and a running inner index.

use crate::{IntoObservable, Observable, Observer, RivuletError, Subscription};
use core::fmt;
use std::sync::Arc;

/// Identifier of one inner subscription, unique within its operator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InnerId(u64);

impl InnerId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inner#{}", self.0)
    }
}

/// Provenance attached to every notification of an adapted inner source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InnerKey {
    /// Which inner subscription produced the notification.
    pub id: InnerId,
    /// Index of the outer value the inner source was projected from.
    pub outer_index: usize,
}

/// Receiver of tagged inner notifications.
pub trait InnerListener<U>: Send + Sync {
    /// The inner source produced its `inner_index`-th value (counting from zero).
    fn inner_next(&self, key: InnerKey, inner_index: usize, value: U);

    /// The inner source failed.
    fn inner_error(&self, key: InnerKey, error: RivuletError);

    /// The inner source completed.
    fn inner_complete(&self, key: InnerKey);

    /// Returns `true` when the listener has stopped accepting notifications.
    fn is_closed(&self) -> bool {
        false
    }
}

struct InnerObserver<U> {
    listener: Arc<dyn InnerListener<U>>,
    key: InnerKey,
    inner_index: usize,
}

impl<U> Observer<U> for InnerObserver<U> {
    fn on_next(&mut self, value: U) {
        let index = self.inner_index;
        self.inner_index += 1;
        self.listener.inner_next(self.key, index, value);
    }

    fn on_error(&mut self, error: RivuletError) {
        self.listener.inner_error(self.key, error);
    }

    fn on_complete(&mut self) {
        self.listener.inner_complete(self.key);
    }

    fn is_closed(&self) -> bool {
        self.listener.is_closed()
    }
}

/// Subscribes to `result` and redirects its notifications to `listener`.
///
/// Every notification carries `key`; values also carry their position within
/// this inner source. Returns the inner subscription handle.
///
/// ```
/// use rivulet_core::{subscribe_to_result, InnerId, InnerKey, InnerListener, RivuletError};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Log(Mutex<Vec<String>>);
///
/// impl InnerListener<char> for Log {
///     fn inner_next(&self, key: InnerKey, inner_index: usize, value: char) {
///         self.0.lock().unwrap().push(format!("{}/{inner_index}:{value}", key.outer_index));
///     }
///     fn inner_error(&self, _key: InnerKey, _error: RivuletError) {}
///     fn inner_complete(&self, key: InnerKey) {
///         self.0.lock().unwrap().push(format!("{} done", key.id));
///     }
/// }
///
/// let log = Arc::new(Log::default());
/// let key = InnerKey { id: InnerId::new(7), outer_index: 3 };
/// let listener: Arc<dyn InnerListener<char>> = log.clone();
/// subscribe_to_result(listener, vec!['x', 'y'], key);
///
/// assert_eq!(*log.0.lock().unwrap(), vec!["3/0:x", "3/1:y", "inner#7 done"]);
/// ```
pub fn subscribe_to_result<U, S>(
    listener: Arc<dyn InnerListener<U>>,
    result: S,
    key: InnerKey,
) -> Subscription
where
    U: 'static,
    S: IntoObservable<U>,
{
    result.into_observable().subscribe(Box::new(InnerObserver {
        listener,
        key,
        inner_index: 0,
    }))
}

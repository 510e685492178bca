// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold, synchronous sources.
//!
//! Every source here replays its sequence for each new subscriber and emits
//! synchronously inside `subscribe`. Emission stops as soon as the subscriber is
//! closed, so an operator that terminates mid-sequence halts the producer too.

use crate::{BoxObserver, Observable, RivuletError, Subscriber, Subscription};
use core::marker::PhantomData;

/// Emits one value, then completes. Built by [`just`].
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

/// Creates a source emitting `value` once and completing.
pub fn just<T>(value: T) -> Just<T>
where
    T: Clone + Send + Sync,
{
    Just { value }
}

impl<T> Observable<T> for Just<T>
where
    T: Clone + Send + Sync,
{
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        let subscription = Subscription::new();
        let mut subscriber = Subscriber::new(observer, subscription.clone());
        subscriber.next(self.value.clone());
        subscriber.complete();
        subscription
    }
}

/// Emits every item of an iterable, then completes. Built by [`from_iter`].
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    items: I,
}

/// Creates a source emitting the items of `items` in order.
///
/// `items` is cloned on each subscription so the source can be replayed.
pub fn from_iter<I>(items: I) -> FromIter<I>
where
    I: IntoIterator + Clone + Send + Sync,
{
    FromIter { items }
}

impl<I> Observable<I::Item> for FromIter<I>
where
    I: IntoIterator + Clone + Send + Sync,
{
    fn subscribe(&self, observer: BoxObserver<I::Item>) -> Subscription {
        let subscription = Subscription::new();
        let mut subscriber = Subscriber::new(observer, subscription.clone());
        for item in self.items.clone() {
            if subscriber.is_closed() {
                return subscription;
            }
            subscriber.next(item);
        }
        subscriber.complete();
        subscription
    }
}

/// Completes immediately. Built by [`empty`].
pub struct Empty<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Creates a source that completes without emitting.
#[must_use]
pub fn empty<T>() -> Empty<T> {
    Empty {
        _marker: PhantomData,
    }
}

impl<T> Observable<T> for Empty<T> {
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        let subscription = Subscription::new();
        Subscriber::new(observer, subscription.clone()).complete();
        subscription
    }
}

/// Never emits and never terminates. Built by [`never`].
pub struct Never<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Creates a source that stays silent until released.
#[must_use]
pub fn never<T>() -> Never<T> {
    Never {
        _marker: PhantomData,
    }
}

impl<T: 'static> Observable<T> for Never<T> {
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        let subscription = Subscription::new();
        subscription.add_teardown(move || drop(observer));
        subscription
    }
}

/// Errors immediately. Built by [`throw_error`].
pub struct ThrowError<T> {
    error: RivuletError,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a source that signals `error` without emitting.
#[must_use]
pub fn throw_error<T>(error: RivuletError) -> ThrowError<T> {
    ThrowError {
        error,
        _marker: PhantomData,
    }
}

impl<T> Observable<T> for ThrowError<T> {
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        let subscription = Subscription::new();
        Subscriber::new(observer, subscription.clone()).error(self.error.clone());
        subscription
    }
}

/// Source driven by a user-supplied producer. Built by [`create`].
pub struct Create<F, T> {
    producer: F,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a source from a producer closure.
///
/// The producer receives the [`Subscriber`] for each new subscription. It may
/// emit synchronously or move the subscriber elsewhere (a task, a callback
/// registry) and emit later.
///
/// ```
/// use rivulet_core::{create, ObservableExt};
/// use std::sync::{Arc, Mutex};
///
/// let source = create(|mut subscriber| {
///     subscriber.next("a");
///     subscriber.next("b");
///     subscriber.complete();
/// });
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// source.subscribe_fn(move |v| sink.lock().unwrap().push(v), |_| {}, || {});
///
/// assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
/// ```
pub fn create<T, F>(producer: F) -> Create<F, T>
where
    F: Fn(Subscriber<T>) + Send + Sync,
{
    Create {
        producer,
        _marker: PhantomData,
    }
}

impl<T, F> Observable<T> for Create<F, T>
where
    F: Fn(Subscriber<T>) + Send + Sync,
{
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        let subscription = Subscription::new();
        (self.producer)(Subscriber::new(observer, subscription.clone()));
        subscription
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Source attachment and operator composition.
//!
//! An [`Observable`] delivers its notifications to whichever observer is attached
//! through [`Observable::subscribe`]. An [`Operator`] sits between a source and a
//! downstream observer; [`ObservableExt::lift`] turns a source plus an operator into
//! a new observable, so operators compose into chains.

use crate::into_stream::ObservableStream;
use crate::observer::{observer_fn, BoxObserver};
use crate::{RivuletError, Subscription};
use core::marker::PhantomData;
use std::sync::Arc;

/// A push-based source of values.
///
/// Calling `subscribe` begins delivering the source's notifications to
/// `observer` and returns the handle that stops them.
pub trait Observable<T>: Send + Sync {
    /// Attaches `observer` and starts delivery.
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription;
}

/// Shared, type-erased observable.
pub type BoxObservable<T> = Arc<dyn Observable<T>>;

impl<T, O> Observable<T> for Arc<O>
where
    O: Observable<T> + ?Sized,
{
    fn subscribe(&self, observer: BoxObserver<T>) -> Subscription {
        (**self).subscribe(observer)
    }
}

/// A transform attachable to any source.
///
/// `attach` wires the operator between `source` and `downstream` and returns the
/// disposable that tears the whole attachment down.
pub trait Operator<T, R>: Send + Sync {
    /// Attaches the operator to `source`, emitting into `downstream`.
    fn attach(&self, source: &dyn Observable<T>, downstream: BoxObserver<R>) -> Subscription;
}

/// Observable produced by [`ObservableExt::lift`].
///
/// Every subscription attaches the operator to the source afresh.
pub struct Lift<S, Op, T> {
    source: S,
    operator: Op,
    _marker: PhantomData<fn(T)>,
}

impl<S, Op, T> Lift<S, Op, T> {
    /// Combines `source` with `operator`.
    pub fn new(source: S, operator: Op) -> Self {
        Self {
            source,
            operator,
            _marker: PhantomData,
        }
    }
}

impl<S, Op, T, R> Observable<R> for Lift<S, Op, T>
where
    S: Observable<T>,
    Op: Operator<T, R>,
{
    fn subscribe(&self, observer: BoxObserver<R>) -> Subscription {
        self.operator.attach(&self.source, observer)
    }
}

/// Combinators available on every observable.
pub trait ObservableExt<T: 'static>: Observable<T> + Sized {
    /// Erases the concrete type.
    fn boxed(self) -> BoxObservable<T>
    where
        Self: 'static,
    {
        Arc::new(self)
    }

    /// Applies `operator` to this observable.
    fn lift<R, Op>(self, operator: Op) -> Lift<Self, Op, T>
    where
        Op: Operator<T, R>,
    {
        Lift::new(self, operator)
    }

    /// Subscribes with closures instead of an observer type.
    fn subscribe_fn<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
    where
        N: FnMut(T) + Send + 'static,
        E: FnMut(RivuletError) + Send + 'static,
        C: FnMut() + Send + 'static,
    {
        self.subscribe(Box::new(observer_fn(next, error, complete)))
    }

    /// Bridges this observable into a pull-based `futures::Stream`.
    ///
    /// The subscription is made immediately; values are buffered in an unbounded
    /// channel until polled. Dropping the stream releases the subscription.
    fn into_stream(self) -> ObservableStream<T>
    where
        T: Send,
    {
        ObservableStream::subscribe(&self)
    }
}

impl<T: 'static, O: Observable<T>> ObservableExt<T> for O {}

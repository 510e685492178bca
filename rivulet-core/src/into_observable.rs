// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observable::Lift;
use crate::sources::{Create, Empty, FromIter, Just, Never, ThrowError};
use crate::{
    empty, from_iter, just, throw_error, BoxObservable, Observable, RivuletError, Subject,
    Subscriber,
};
use std::sync::Arc;

/// A trait for values that can be adapted into an observable.
///
/// This lets operators accept stream-like results (an observable, a single value,
/// a vector, an `Option`, a `Result`, a future or a `futures::Stream`) and subscribe
/// to them uniformly.
///
/// | Value | Adapted as |
/// |-------|------------|
/// | `BoxObservable<U>`, sources, `Subject<U>`, lifted chains | itself |
/// | `Vec<U>` | every element, then completion |
/// | `Option<U>` | `Some` → one value; `None` → immediate completion |
/// | `Result<U, RivuletError>` | `Ok` → one value; `Err` → that error |
pub trait IntoObservable<U> {
    /// Converts this value into a shared observable.
    fn into_observable(self) -> BoxObservable<U>;
}

impl<U: 'static> IntoObservable<U> for BoxObservable<U> {
    fn into_observable(self) -> BoxObservable<U> {
        self
    }
}

impl<U> IntoObservable<U> for Just<U>
where
    U: Clone + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<I> IntoObservable<I::Item> for FromIter<I>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<I::Item> {
        Arc::new(self)
    }
}

impl<U: 'static> IntoObservable<U> for Empty<U> {
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U: 'static> IntoObservable<U> for Never<U> {
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U: 'static> IntoObservable<U> for ThrowError<U> {
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U, F> IntoObservable<U> for Create<F, U>
where
    U: 'static,
    F: Fn(Subscriber<U>) + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U: Clone + Send + 'static> IntoObservable<U> for Subject<U> {
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<S, Op, T, U> IntoObservable<U> for Lift<S, Op, T>
where
    Lift<S, Op, T>: Observable<U> + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(self)
    }
}

impl<U> IntoObservable<U> for Vec<U>
where
    U: Clone + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        Arc::new(from_iter(self))
    }
}

impl<U> IntoObservable<U> for Option<U>
where
    U: Clone + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        match self {
            Some(value) => Arc::new(just(value)),
            None => Arc::new(empty()),
        }
    }
}

impl<U> IntoObservable<U> for Result<U, RivuletError>
where
    U: Clone + Send + Sync + 'static,
{
    fn into_observable(self) -> BoxObservable<U> {
        match self {
            Ok(value) => Arc::new(just(value)),
            Err(error) => Arc::new(throw_error(error)),
        }
    }
}

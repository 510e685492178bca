// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::RivuletError;

/// Receiver of push notifications.
///
/// A source delivers any number of `on_next` calls followed by at most one
/// terminal call (`on_error` or `on_complete`). [`Subscriber`](crate::Subscriber)
/// enforces that grammar on behalf of sources.
pub trait Observer<T>: Send {
    /// Delivers the next value.
    fn on_next(&mut self, value: T);

    /// Delivers a terminal error.
    fn on_error(&mut self, error: RivuletError);

    /// Delivers successful completion.
    fn on_complete(&mut self);

    /// Returns `true` when the observer no longer wants notifications.
    ///
    /// Sources poll this between emissions so that synchronous producers stop
    /// early once downstream has gone away.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Type-erased observer handed to [`Observable::subscribe`](crate::Observable::subscribe).
pub type BoxObserver<T> = Box<dyn Observer<T>>;

impl<T, O> Observer<T> for Box<O>
where
    O: Observer<T> + ?Sized,
{
    fn on_next(&mut self, value: T) {
        (**self).on_next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        (**self).on_error(error);
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Observer assembled from three closures. Built by [`observer_fn`].
pub struct FnObserver<N, E, C> {
    next: N,
    error: E,
    complete: C,
}

/// Builds an observer from `next`, `error` and `complete` closures.
///
/// # Example
///
/// ```
/// use rivulet_core::{from_iter, observer_fn, Observable};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// from_iter(vec![1, 2, 3]).subscribe(Box::new(observer_fn(
///     move |value: i32| sink.lock().unwrap().push(value),
///     |_error| {},
///     || {},
/// )));
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub fn observer_fn<T, N, E, C>(next: N, error: E, complete: C) -> FnObserver<N, E, C>
where
    N: FnMut(T) + Send,
    E: FnMut(RivuletError) + Send,
    C: FnMut() + Send,
{
    FnObserver {
        next,
        error,
        complete,
    }
}

impl<T, N, E, C> Observer<T> for FnObserver<N, E, C>
where
    N: FnMut(T) + Send,
    E: FnMut(RivuletError) + Send,
    C: FnMut() + Send,
{
    fn on_next(&mut self, value: T) {
        (self.next)(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        (self.error)(error);
    }

    fn on_complete(&mut self) {
        (self.complete)();
    }
}

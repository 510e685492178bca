// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `merge_map` operator descriptor and its extension methods.
//!
//! [`MergeMap`] holds the projection, the optional combine function and the
//! concurrency limit. It carries no per-subscription state: every attachment
//! builds a fresh coordinator, so one descriptor can be reused across sources
//! and subscriptions.

use crate::coordinator::MergeMapCoordinator;
use crate::Concurrency;
use core::fmt;
use rivulet_core::{
    BoxObservable, BoxObserver, IntoObservable, Lift, Observable, Operator, Result, Subscription,
};
use std::sync::Arc;

/// Projection: outer value and outer index to an adapted inner source.
pub type ProjectFn<T, U> = Arc<dyn Fn(T, usize) -> Result<BoxObservable<U>> + Send + Sync>;

/// Combine: outer value, inner value, outer index and inner index to the emitted value.
pub type CombineFn<T, U, R> = Arc<dyn Fn(&T, U, usize, usize) -> Result<R> + Send + Sync>;

/// How inner values become downstream values.
pub(crate) enum Selector<T, U, R> {
    Passthrough(fn(U) -> R),
    Combine(CombineFn<T, U, R>),
}

impl<T, U, R> Clone for Selector<T, U, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Passthrough(f) => Self::Passthrough(*f),
            Self::Combine(f) => Self::Combine(Arc::clone(f)),
        }
    }
}

/// Bounded-concurrency flat-map descriptor.
///
/// Each outer value is projected into an inner source; the values of all
/// active inner sources are merged into one output. With a concurrency limit,
/// outer values arriving while the limit is reached wait in FIFO order until an
/// inner source completes.
///
/// # Example
///
/// ```
/// use rivulet_core::{from_iter, just, Observable, ObservableExt};
/// use rivulet_merge_map::MergeMap;
/// use rivulet_test_utils::Recorder;
///
/// let operator = MergeMap::new(|v: i32, _index| Ok(just(v * 10)))
///     .with_limit(2)
///     .unwrap();
///
/// let recorder = Recorder::new();
/// from_iter(vec![1, 2, 3]).lift(operator).subscribe(recorder.observer());
///
/// assert_eq!(recorder.values(), vec![10, 20, 30]);
/// assert!(recorder.is_completed());
/// ```
pub struct MergeMap<T, U, R> {
    pub(crate) project: ProjectFn<T, U>,
    pub(crate) selector: Selector<T, U, R>,
    pub(crate) concurrency: Concurrency,
}

impl<T, U> MergeMap<T, U, U>
where
    T: 'static,
    U: 'static,
{
    /// Creates an unbounded merge that forwards inner values unchanged.
    ///
    /// `project` receives each outer value with its outer index and returns
    /// anything adaptable into an inner source, or an error that terminates
    /// the merge.
    pub fn new<F, I>(project: F) -> Self
    where
        F: Fn(T, usize) -> Result<I> + Send + Sync + 'static,
        I: IntoObservable<U>,
    {
        Self {
            project: Arc::new(move |value: T, index: usize| {
                project(value, index).map(<I as IntoObservable<U>>::into_observable)
            }),
            selector: Selector::Passthrough(core::convert::identity),
            concurrency: Concurrency::Unbounded,
        }
    }

    /// Builds a descriptor from positional arguments.
    ///
    /// `second` occupies the position of the combine function. If it holds a
    /// number instead ([`MergeMapArg::Limit`]), that number is taken as the
    /// concurrency limit and no combine function is used. A numeric `second`
    /// takes precedence over `limit`. `None` for both means unbounded.
    ///
    /// ```
    /// use rivulet_core::just;
    /// use rivulet_merge_map::{Concurrency, MergeMap, MergeMapArg};
    ///
    /// let operator =
    ///     MergeMap::from_args(|v: u8, _| Ok(just(v)), Some(MergeMapArg::Limit(3)), Some(8)).unwrap();
    ///
    /// assert_eq!(operator.concurrency(), Concurrency::limited(3).unwrap());
    /// assert!(!operator.has_combine());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `RivuletError::InvalidConcurrencyLimit` if the effective limit is zero.
    pub fn from_args<F, I>(
        project: F,
        second: Option<MergeMapArg<T, U>>,
        limit: Option<usize>,
    ) -> Result<Self>
    where
        F: Fn(T, usize) -> Result<I> + Send + Sync + 'static,
        I: IntoObservable<U>,
    {
        let (combine, limit) = match second {
            Some(MergeMapArg::Limit(count)) => (None, Some(count)),
            Some(MergeMapArg::Combine(combine)) => (Some(combine), limit),
            None => (None, limit),
        };

        let operator = Self::new(project);
        let operator = match combine {
            Some(combine) => operator.with_selector(Selector::Combine(combine)),
            None => operator,
        };
        match limit {
            Some(limit) => operator.with_limit(limit),
            None => Ok(operator),
        }
    }
}

impl<T, U, R> MergeMap<T, U, R> {
    /// Replaces the output mapping with `combine`.
    ///
    /// Every inner value is passed to `combine` together with the outer value
    /// it was projected from and both indices; the result is emitted instead
    /// of the inner value. A combine error terminates the merge.
    pub fn with_combine<R2, C>(self, combine: C) -> MergeMap<T, U, R2>
    where
        C: Fn(&T, U, usize, usize) -> Result<R2> + Send + Sync + 'static,
    {
        self.with_selector(Selector::Combine(Arc::new(combine)))
    }

    /// Caps the number of simultaneously active inner sources.
    ///
    /// # Errors
    ///
    /// Returns `RivuletError::InvalidConcurrencyLimit` if `limit` is zero.
    pub fn with_limit(self, limit: usize) -> Result<Self> {
        Ok(self.with_concurrency(Concurrency::limited(limit)?))
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The configured concurrency limit.
    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    /// Returns `true` if a combine function is configured.
    pub fn has_combine(&self) -> bool {
        matches!(self.selector, Selector::Combine(_))
    }

    fn with_selector<R2>(self, selector: Selector<T, U, R2>) -> MergeMap<T, U, R2> {
        MergeMap {
            project: self.project,
            selector,
            concurrency: self.concurrency,
        }
    }
}

impl<T, U, R> Clone for MergeMap<T, U, R> {
    fn clone(&self) -> Self {
        Self {
            project: Arc::clone(&self.project),
            selector: self.selector.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<T, U, R> fmt::Debug for MergeMap<T, U, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeMap")
            .field("concurrency", &self.concurrency)
            .field("combine", &self.has_combine())
            .finish_non_exhaustive()
    }
}

impl<T, U, R> Operator<T, R> for MergeMap<T, U, R>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    R: Send + 'static,
{
    fn attach(&self, source: &dyn Observable<T>, downstream: BoxObserver<R>) -> Subscription {
        MergeMapCoordinator::attach(self.clone(), source, downstream)
    }
}

/// Value in the combine position of [`MergeMap::from_args`].
pub enum MergeMapArg<T, U> {
    /// A combine function producing values of the inner type.
    Combine(CombineFn<T, U, U>),
    /// A number, read as the concurrency limit.
    Limit(usize),
}

impl<T, U> MergeMapArg<T, U> {
    /// Wraps a combine function.
    pub fn combine<C>(combine: C) -> Self
    where
        C: Fn(&T, U, usize, usize) -> Result<U> + Send + Sync + 'static,
    {
        Self::Combine(Arc::new(combine))
    }
}

impl<T, U> From<usize> for MergeMapArg<T, U> {
    fn from(limit: usize) -> Self {
        Self::Limit(limit)
    }
}

impl<T, U> fmt::Debug for MergeMapArg<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combine(_) => f.write_str("Combine(..)"),
            Self::Limit(limit) => f.debug_tuple("Limit").field(limit).finish(),
        }
    }
}

/// `merge_map` family on every observable.
pub trait MergeMapExt<T>: Observable<T> + Sized
where
    T: Clone + Send + 'static,
{
    /// Projects each value into an inner source and merges all of them,
    /// without a concurrency limit.
    ///
    /// ```
    /// use rivulet_core::{from_iter, Observable};
    /// use rivulet_merge_map::MergeMapExt;
    /// use rivulet_test_utils::Recorder;
    ///
    /// let recorder = Recorder::new();
    /// from_iter(vec![1, 2])
    ///     .merge_map(|v, _| Ok(vec![v, v]))
    ///     .subscribe(recorder.observer());
    ///
    /// assert_eq!(recorder.values(), vec![1, 1, 2, 2]);
    /// ```
    fn merge_map<U, I, F>(self, project: F) -> Lift<Self, MergeMap<T, U, U>, T>
    where
        U: Send + 'static,
        F: Fn(T, usize) -> Result<I> + Send + Sync + 'static,
        I: IntoObservable<U>,
    {
        Lift::new(self, MergeMap::new(project))
    }

    /// Applies a configured [`MergeMap`].
    fn merge_map_with<U, R>(self, operator: MergeMap<T, U, R>) -> Lift<Self, MergeMap<T, U, R>, T>
    where
        U: Send + 'static,
        R: Send + 'static,
    {
        Lift::new(self, operator)
    }

    /// Maps every value to the same inner source, subscribed anew each time.
    fn merge_map_to<U, S>(self, inner: S) -> Lift<Self, MergeMap<T, U, U>, T>
    where
        U: Send + 'static,
        S: Observable<U> + 'static,
    {
        let inner: BoxObservable<U> = Arc::new(inner);
        Lift::new(
            self,
            MergeMap::new(move |_value, _index| Ok(Arc::clone(&inner))),
        )
    }

    /// Projects and merges one inner source at a time, preserving outer order.
    fn concat_map<U, I, F>(self, project: F) -> Lift<Self, MergeMap<T, U, U>, T>
    where
        U: Send + 'static,
        F: Fn(T, usize) -> Result<I> + Send + Sync + 'static,
        I: IntoObservable<U>,
    {
        Lift::new(
            self,
            MergeMap::new(project).with_concurrency(Concurrency::SERIAL),
        )
    }

    /// Flattens a source of sources, keeping at most `concurrency` subscribed.
    fn merge_all<U>(self, concurrency: Concurrency) -> Lift<Self, MergeMap<T, U, U>, T>
    where
        U: Send + 'static,
        T: IntoObservable<U>,
    {
        Lift::new(
            self,
            MergeMap::new(|inner: T, _index| Ok(inner)).with_concurrency(concurrency),
        )
    }
}

impl<T, O> MergeMapExt<T> for O
where
    T: Clone + Send + 'static,
    O: Observable<T>,
{
}

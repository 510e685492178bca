// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Rivulet
//!
//! Push-based reactive streams with a bounded-concurrency `merge_map`.
//!
//! ## Overview
//!
//! Rivulet models sources as [`Observable`]s that push values into [`Observer`]s.
//! Operators are descriptors attached to a source with
//! [`ObservableExt::lift`]; the flagship operator, [`MergeMap`], projects every
//! value into an inner source and merges the results, optionally capping how many
//! inner sources run at once.
//!
//! - **Cold and hot sources**: `just`, `from_iter`, `create`, plus the hot [`Subject`].
//! - **Async bridging**: `from_future`/`from_stream` drive futures and streams on
//!   tokio, and `into_stream` turns any observable back into a `futures::Stream`.
//! - **Deterministic teardown**: every attachment returns a [`Subscription`] whose
//!   release propagates to the source and to every inner source.
//!
//! ## Quick Start
//!
//! ```rust
//! use rivulet::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let operator = MergeMap::new(|word: &'static str, _| Ok(word.chars().collect::<Vec<_>>()))
//!     .with_limit(1)
//!     .unwrap();
//!
//! from_iter(vec!["ab", "cd"])
//!     .merge_map_with(operator)
//!     .subscribe_fn(move |c| sink.lock().unwrap().push(c), |_| {}, || {});
//!
//! assert_eq!(*seen.lock().unwrap(), vec!['a', 'b', 'c', 'd']);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[cfg(feature = "runtime-tokio")]
pub mod receiver_ext;

pub use rivulet_core::{
    create, empty, from_iter, just, never, observer_fn, subscribe_to_result, throw_error,
    BoxObservable, BoxObserver, IntoObservable, Lift, Observable, ObservableExt,
    ObservableStream, Observer, Operator, Result, RivuletError, StreamItem, Subject,
    SubjectError, Subscriber, Subscription,
};
#[cfg(feature = "runtime-tokio")]
pub use rivulet_core::{from_future, from_stream};
pub use rivulet_merge_map::{Concurrency, MergeMap, MergeMapArg, MergeMapExt};

#[cfg(feature = "runtime-tokio")]
pub use receiver_ext::UnboundedReceiverExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use rivulet_core::{
        from_iter, just, BoxObservable, IntoObservable, Observable, ObservableExt, Observer,
        RivuletError, StreamItem, Subject, Subscription,
    };
    pub use rivulet_merge_map::{Concurrency, MergeMap, MergeMapArg, MergeMapExt};

    #[cfg(feature = "runtime-tokio")]
    pub use crate::receiver_ext::UnboundedReceiverExt;
    #[cfg(feature = "runtime-tokio")]
    pub use rivulet_core::{from_future, from_stream};
}

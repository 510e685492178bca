// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded-concurrency flat-map for Rivulet observables.
//!
//! `merge_map` projects every value of a source into an inner source and merges
//! the values of all active inner sources into a single output.
//!
//! - With a [`Concurrency`] limit, values arriving while the limit is reached
//!   are buffered and projected in arrival order as inner sources complete.
//! - The output completes once the source has completed, no inner source is
//!   active and the buffer is empty.
//! - The first error, whether raised by the source, an inner source, the
//!   projection or the combine function, is forwarded as is and releases every
//!   subscription.
//! - Releasing the output subscription releases the source and all inner
//!   sources.
//!
//! # Example
//!
//! ```
//! use rivulet_core::{from_iter, just, Observable};
//! use rivulet_merge_map::MergeMapExt;
//! use rivulet_test_utils::Recorder;
//!
//! let recorder = Recorder::new();
//! from_iter(vec!["a", "b", "c"])
//!     .concat_map(|letter, index| Ok(just(format!("{letter}{index}"))))
//!     .subscribe(recorder.observer());
//!
//! assert_eq!(recorder.values(), vec!["a0", "b1", "c2"]);
//! assert!(recorder.is_completed());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

mod coordinator;
pub mod concurrency;
pub mod operator;

pub use self::concurrency::Concurrency;
pub use self::operator::{CombineFn, MergeMap, MergeMapArg, MergeMapExt, ProjectFn};

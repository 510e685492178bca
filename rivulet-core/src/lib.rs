// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellation_token;
pub mod error;
pub mod into_observable;
pub mod into_stream;
pub mod mutex;
pub mod observable;
pub mod observer;
pub mod sources;
pub mod stream_item;
pub mod subject;
pub mod subject_error;
pub mod subscribe_to_result;
pub mod subscriber;
pub mod subscription;

#[cfg(feature = "runtime-tokio")]
pub mod async_sources;
#[cfg(feature = "runtime-tokio")]
pub mod rivulet_task;

pub use self::cancellation_token::CancellationToken;
pub use self::error::{IntoRivuletError, Result, ResultExt, RivuletError};
pub use self::into_observable::IntoObservable;
pub use self::into_stream::ObservableStream;
pub use self::observable::{BoxObservable, Lift, Observable, ObservableExt, Operator};
pub use self::observer::{observer_fn, BoxObserver, FnObserver, Observer};
pub use self::sources::{
    create, empty, from_iter, just, never, throw_error, Create, Empty, FromIter, Just, Never,
    ThrowError,
};
pub use self::stream_item::StreamItem;
pub use self::subject::Subject;
pub use self::subject_error::SubjectError;
pub use self::subscribe_to_result::{subscribe_to_result, InnerId, InnerKey, InnerListener};
pub use self::subscriber::Subscriber;
pub use self::subscription::Subscription;

#[cfg(feature = "runtime-tokio")]
pub use self::async_sources::{from_future, from_stream, FromFuture, FromStream};
#[cfg(feature = "runtime-tokio")]
pub use self::rivulet_task::RivuletTask;

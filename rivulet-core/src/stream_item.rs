// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{RivuletError, Subscriber};

/// One element of a pulled sequence: a value, or the error that ends it.
///
/// This is how observer notifications look on the `futures::Stream` side.
/// [`from_stream`](crate::from_stream) consumes it and
/// [`ObservableExt::into_stream`](crate::ObservableExt::into_stream) produces it.
/// Completion has no item of its own; it is the end of the stream.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    Value(T),
    /// Terminates the sequence.
    Error(RivuletError),
}

// Errors compare unequal, even to themselves.
impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> StreamItem<T> {
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value, or `None` for an error.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// The error, or `None` for a value.
    pub const fn as_error(&self) -> Option<&RivuletError> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Transforms the value, passing errors through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StreamItem<U> {
        match self {
            Self::Value(value) => StreamItem::Value(f(value)),
            Self::Error(error) => StreamItem::Error(error),
        }
    }

    /// Pushes the item into `subscriber`: a value as `next`, an error as the
    /// terminal `error`.
    pub fn deliver(self, subscriber: &mut Subscriber<T>) {
        match self {
            Self::Value(value) => subscriber.next(value),
            Self::Error(error) => subscriber.error(error),
        }
    }
}

impl<T> From<Result<T, RivuletError>> for StreamItem<T> {
    fn from(result: Result<T, RivuletError>) -> Self {
        result.map_or_else(Self::Error, Self::Value)
    }
}

impl<T> From<StreamItem<T>> for Result<T, RivuletError> {
    fn from(item: StreamItem<T>) -> Self {
        match item {
            StreamItem::Value(value) => Ok(value),
            StreamItem::Error(error) => Err(error),
        }
    }
}

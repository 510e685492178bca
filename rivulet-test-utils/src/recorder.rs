// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::mutex::Mutex;
use rivulet_core::{BoxObserver, Observer, RivuletError};
use std::sync::Arc;

/// One notification observed by a [`Recorder`].
#[derive(Debug, Clone)]
pub enum Notification<T> {
    Next(T),
    Error(RivuletError),
    Complete,
}

impl<T> Notification<T> {
    /// Returns `true` for `Error` and `Complete`.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

/// Records the notifications delivered to its observers.
///
/// Clones share the same log. Each call to [`Recorder::observer`] creates a new
/// observer writing into that log.
pub struct Recorder<T> {
    log: Arc<Mutex<Vec<Notification<T>>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A boxed observer appending to this recorder.
    pub fn observer(&self) -> BoxObserver<T> {
        Box::new(RecordingObserver {
            log: Arc::clone(&self.log),
        })
    }

    /// Every notification in arrival order.
    pub fn notifications(&self) -> Vec<Notification<T>> {
        self.log.lock().clone()
    }

    /// The values delivered through `on_next`, in order.
    pub fn values(&self) -> Vec<T> {
        self.log
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Next(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// The errors delivered through `on_error`.
    pub fn errors(&self) -> Vec<RivuletError> {
        self.log
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn completion_count(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Complete))
            .count()
    }

    pub fn is_completed(&self) -> bool {
        self.completion_count() > 0
    }

    pub fn is_errored(&self) -> bool {
        self.log
            .lock()
            .iter()
            .any(|n| matches!(n, Notification::Error(_)))
    }

    /// Number of terminal notifications (errors plus completions).
    pub fn terminal_count(&self) -> usize {
        self.log.lock().iter().filter(|n| n.is_terminal()).count()
    }

    /// Returns `true` if any value arrived after a terminal notification.
    pub fn has_value_after_terminal(&self) -> bool {
        self.log
            .lock()
            .iter()
            .skip_while(|n| !n.is_terminal())
            .any(|n| matches!(n, Notification::Next(_)))
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }
}

impl<T: Clone + Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

struct RecordingObserver<T> {
    log: Arc<Mutex<Vec<Notification<T>>>>,
}

impl<T: Send> Observer<T> for RecordingObserver<T> {
    fn on_next(&mut self, value: T) {
        self.log.lock().push(Notification::Next(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        self.log.lock().push(Notification::Error(error));
    }

    fn on_complete(&mut self) {
        self.log.lock().push(Notification::Complete);
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-observer subject.
//!
//! A [`Subject`] is both a producer handle and an [`Observable`]: values pushed with
//! [`Subject::next`] are delivered synchronously to every observer attached at that
//! moment.
//!
//! ## Characteristics
//!
//! - **Hot**: Late observers do not receive past values, only values sent after subscribing.
//! - **Terminal replay**: Observers attaching after `error`/`complete` receive that
//!   terminal notification immediately.
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Serialized delivery**: Notifications go through an outbox emptied by one
//!   caller at a time. An observer may push into the subject from its own
//!   `on_next`; the value is delivered after the current one, once every observer
//!   has seen that. A push racing with a delivery on another thread returns at
//!   once and is delivered by that thread.
//! - **Snapshot delivery**: Each notification goes to the observers attached when
//!   its delivery starts, so observers may subscribe or unsubscribe while being
//!   notified.
//!
//! ## Example
//!
//! ```
//! use rivulet_core::{ObservableExt, Subject};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = Subject::<i32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let _subscription = subject.subscribe_fn(move |v| sink.lock().unwrap().push(v), |_| {}, || {});
//!
//! subject.next(1).unwrap();
//! subject.next(2).unwrap();
//! subject.complete();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! assert!(subject.next(3).is_err());
//! ```

use crate::mutex::Mutex;
use crate::{BoxObserver, Observable, Observer, RivuletError, SubjectError, Subscription};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};

type SharedObserver<T> = Arc<Mutex<BoxObserver<T>>>;

#[derive(Clone)]
enum Terminal {
    Completed,
    Errored(RivuletError),
}

enum Delivery<T> {
    Next(T),
    Terminal(Terminal),
}

struct SubjectState<T> {
    terminal: Option<Terminal>,
    observers: Vec<(u64, SharedObserver<T>)>,
    next_id: u64,
    outbox: VecDeque<Delivery<T>>,
    // Some caller is already emptying the outbox.
    flushing: bool,
}

/// A hot subject that broadcasts notifications to all current observers.
///
/// See the [module documentation](self) for details.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates an open subject with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                terminal: None,
                observers: Vec::new(),
                next_id: 0,
                outbox: VecDeque::new(),
                flushing: false,
            })),
        }
    }

    /// Delivers `value` to every current observer.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        {
            let mut state = self.state.lock();
            if state.terminal.is_some() {
                warn!("Subject::next called after the subject terminated");
                return Err(SubjectError::Closed);
            }
            state.outbox.push_back(Delivery::Next(value));
        }
        self.flush();
        Ok(())
    }

    /// Terminates the subject with `error`, delivering it to every current observer.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn error(&self, error: RivuletError) -> Result<(), SubjectError> {
        self.terminate(Terminal::Errored(error))?;
        self.flush();
        Ok(())
    }

    /// Completes the subject, notifying every current observer.
    ///
    /// Completing is idempotent; completing an errored subject has no effect.
    pub fn complete(&self) {
        if self.terminate(Terminal::Completed).is_ok() {
            self.flush();
        }
    }

    /// Returns `true` once the subject has completed or errored.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().terminal.is_some()
    }

    /// Returns the number of attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }

    fn terminate(&self, terminal: Terminal) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.terminal.is_some() {
            return Err(SubjectError::Closed);
        }
        state.terminal = Some(terminal.clone());
        state.outbox.push_back(Delivery::Terminal(terminal));
        Ok(())
    }

    /// Delivers queued notifications in push order, unless an outer call on
    /// the stack or another thread is already doing it.
    fn flush(&self) {
        {
            let mut state = self.state.lock();
            if state.flushing {
                return;
            }
            state.flushing = true;
        }

        loop {
            let (delivery, observers) = {
                let mut state = self.state.lock();
                let Some(delivery) = state.outbox.pop_front() else {
                    state.flushing = false;
                    return;
                };
                let observers = match delivery {
                    Delivery::Next(_) => snapshot(&state.observers),
                    Delivery::Terminal(_) => state.observers.drain(..).map(|(_, o)| o).collect(),
                };
                (delivery, observers)
            };

            match delivery {
                Delivery::Next(value) => {
                    for observer in observers {
                        let mut observer = observer.lock();
                        if !observer.is_closed() {
                            observer.on_next(value.clone());
                        }
                    }
                }
                Delivery::Terminal(Terminal::Completed) => {
                    for observer in observers {
                        observer.lock().on_complete();
                    }
                }
                Delivery::Terminal(Terminal::Errored(error)) => {
                    for observer in observers {
                        observer.lock().on_error(error.clone());
                    }
                }
            }
        }
    }
}

fn snapshot<T>(observers: &[(u64, SharedObserver<T>)]) -> Vec<SharedObserver<T>> {
    observers.iter().map(|(_, o)| Arc::clone(o)).collect()
}

fn detach<T>(state: &Weak<Mutex<SubjectState<T>>>, id: u64) {
    if let Some(state) = state.upgrade() {
        state.lock().observers.retain(|(observer_id, _)| *observer_id != id);
    }
}

impl<T: Clone + Send + 'static> Observable<T> for Subject<T> {
    fn subscribe(&self, mut observer: BoxObserver<T>) -> Subscription {
        let terminal = {
            let mut state = self.state.lock();
            if let Some(terminal) = state.terminal.clone() {
                terminal
            } else {
                let id = state.next_id;
                state.next_id += 1;
                state.observers.push((id, Arc::new(Mutex::new(observer))));

                let weak = Arc::downgrade(&self.state);
                return Subscription::with_teardown(move || detach(&weak, id));
            }
        };

        match terminal {
            Terminal::Completed => observer.on_complete(),
            Terminal::Errored(error) => observer.on_error(error),
        }
        Subscription::empty()
    }
}

impl<T: Clone + Send + 'static> Observer<T> for Subject<T> {
    fn on_next(&mut self, value: T) {
        let _ = self.next(value);
    }

    fn on_error(&mut self, error: RivuletError) {
        let _ = Subject::error(self, error);
    }

    fn on_complete(&mut self) {
        self.complete();
    }

    fn is_closed(&self) -> bool {
        Subject::is_closed(self)
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-subscription state machine behind `merge_map`.
//!
//! Every notification, outer or inner, is turned into a [`Message`] and passed
//! to [`MergeMapCoordinator::dispatch`]. The first caller that finds the
//! mailbox idle becomes its drainer and handles queued messages one at a time
//! until the mailbox is empty. Notifications from other threads, and any
//! notification raised from inside a downstream callback, are queued behind the
//! message being handled, so each handler runs to completion before the next
//! one starts.
//!
//! Inner values produced on the drainer's own thread outside a downstream
//! callback (a synchronous inner source emitting while it is being subscribed)
//! are forwarded inline. The coordinator never stores inner values, and a
//! downstream that unsubscribes stops such a source at its next value.
//!
//! No lock is held while user code runs: projections, combine functions,
//! inner subscriptions and downstream callbacks all see an unlocked coordinator.
//!
//! ```text
//! Active ──outer complete──▶ Draining ──last inner done, buffer empty──▶ Completed
//!   │                          │
//!   └──────── any error ───────┴──▶ Errored        (unsubscribe ──▶ Unsubscribed)
//! ```

use crate::operator::{MergeMap, Selector};
use core::fmt;
use rivulet_core::mutex::Mutex;
use rivulet_core::{
    subscribe_to_result, BoxObserver, InnerId, InnerKey, InnerListener, Observable, Observer,
    RivuletError, Subscription,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Where a terminal error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cause {
    Projection,
    Combine,
    Upstream,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projection => write!(f, "projection"),
            Self::Combine => write!(f, "combine"),
            Self::Upstream => write!(f, "upstream"),
        }
    }
}

pub(crate) enum Message<T, U> {
    OuterNext(T),
    OuterComplete,
    InnerNext {
        subscription_id: InnerId,
        inner_index: usize,
        value: U,
    },
    InnerComplete {
        subscription_id: InnerId,
    },
    Error {
        cause: Cause,
        error: RivuletError,
    },
    Unsubscribe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Active,
    /// Outer source completed; inner sources or buffered values remain.
    Draining,
    Completed,
    Errored,
    Unsubscribed,
}

impl Phase {
    const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored | Self::Unsubscribed)
    }
}

struct InnerRecord<T> {
    /// `None` while the inner source is still being subscribed.
    subscription: Option<Subscription>,
    /// Kept only when a combine function needs it.
    outer_value: Option<T>,
    outer_index: usize,
}

struct State<T> {
    phase: Phase,
    pending: VecDeque<T>,
    active: usize,
    outer_index: usize,
    next_inner_id: u64,
    inner: HashMap<InnerId, InnerRecord<T>>,
}

struct Mailbox<T, U> {
    queue: VecDeque<Message<T, U>>,
    drainer: Option<ThreadId>,
    /// The drainer is inside a downstream callback.
    delivering: bool,
}

enum Route {
    Drain,
    Inline,
}

enum OuterSlot {
    Pending,
    Attached(Subscription),
    Released,
}

/// Stateful engine wired between one source subscription and one downstream.
pub(crate) struct MergeMapCoordinator<T, U, R> {
    operator: MergeMap<T, U, R>,
    state: Mutex<State<T>>,
    mailbox: Mutex<Mailbox<T, U>>,
    // Only the drainer touches it.
    downstream: Mutex<BoxObserver<R>>,
    outer: Mutex<OuterSlot>,
    // Set on termination or release; checked without taking any lock.
    closed: AtomicBool,
    subscription: Subscription,
}

impl<T, U, R> MergeMapCoordinator<T, U, R>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    R: Send + 'static,
{
    /// Subscribes a new coordinator to `source` and returns the downstream handle.
    pub(crate) fn attach(
        operator: MergeMap<T, U, R>,
        source: &dyn Observable<T>,
        downstream: BoxObserver<R>,
    ) -> Subscription {
        let subscription = Subscription::new();
        let coordinator = Arc::new(Self {
            operator,
            state: Mutex::new(State {
                phase: Phase::Active,
                pending: VecDeque::new(),
                active: 0,
                outer_index: 0,
                next_inner_id: 0,
                inner: HashMap::new(),
            }),
            mailbox: Mutex::new(Mailbox {
                queue: VecDeque::new(),
                drainer: None,
                delivering: false,
            }),
            downstream: Mutex::new(downstream),
            outer: Mutex::new(OuterSlot::Pending),
            closed: AtomicBool::new(false),
            subscription: subscription.clone(),
        });

        let handle = Arc::clone(&coordinator);
        subscription.add_teardown(move || handle.release());

        let outer = source.subscribe(Box::new(OuterObserver {
            coordinator: Arc::clone(&coordinator),
        }));
        coordinator.set_outer(outer);
        subscription
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Downstream released its subscription.
    fn release(self: &Arc<Self>) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.dispatch(Message::Unsubscribe);
    }

    fn set_outer(&self, subscription: Subscription) {
        {
            let mut slot = self.outer.lock();
            if !matches!(*slot, OuterSlot::Released) {
                *slot = OuterSlot::Attached(subscription);
                return;
            }
        }
        // Terminated while the source was still subscribing.
        subscription.unsubscribe();
    }

    fn release_outer(&self) {
        let previous = core::mem::replace(&mut *self.outer.lock(), OuterSlot::Released);
        if let OuterSlot::Attached(subscription) = previous {
            subscription.unsubscribe();
        }
    }

    pub(crate) fn dispatch(self: &Arc<Self>, message: Message<T, U>) {
        if self.is_closed() && !matches!(message, Message::Unsubscribe) {
            return;
        }

        let current = thread::current().id();
        let route = {
            let mut mailbox = self.mailbox.lock();
            let drainer = mailbox.drainer;
            match drainer {
                None => {
                    mailbox.drainer = Some(current);
                    Route::Drain
                }
                Some(drainer)
                    if drainer == current
                        && !mailbox.delivering
                        && matches!(message, Message::InnerNext { .. }) =>
                {
                    Route::Inline
                }
                Some(_) => {
                    mailbox.queue.push_back(message);
                    return;
                }
            }
        };

        self.handle(message);
        if matches!(route, Route::Drain) {
            while let Some(message) = self.next_message() {
                self.handle(message);
            }
        }
    }

    fn next_message(&self) -> Option<Message<T, U>> {
        let mut mailbox = self.mailbox.lock();
        let message = mailbox.queue.pop_front();
        if message.is_none() {
            mailbox.drainer = None;
        }
        message
    }

    fn handle(self: &Arc<Self>, message: Message<T, U>) {
        match message {
            Message::Unsubscribe => {
                self.finish(Phase::Unsubscribed);
            }
            // A release is queued behind this message.
            _ if self.is_closed() => {}
            Message::OuterNext(value) => self.on_outer_next(value),
            Message::OuterComplete => self.on_outer_complete(),
            Message::InnerNext {
                subscription_id,
                inner_index,
                value,
            } => self.on_inner_next(subscription_id, inner_index, value),
            Message::InnerComplete { subscription_id } => self.on_inner_complete(subscription_id),
            Message::Error { cause, error } => self.terminate(cause, error),
        }
    }

    /// Calls the downstream observer, marking the drainer as busy delivering.
    fn deliver(&self, notify: impl FnOnce(&mut BoxObserver<R>)) {
        self.mailbox.lock().delivering = true;
        notify(&mut self.downstream.lock());
        self.mailbox.lock().delivering = false;
    }

    fn on_outer_next(self: &Arc<Self>, value: T) {
        if self.state.lock().phase != Phase::Active {
            return;
        }
        self.accept(value);
    }

    fn accept(self: &Arc<Self>, value: T) {
        let outer_index = {
            let mut state = self.state.lock();
            if !self.operator.concurrency.has_capacity(state.active) {
                state.pending.push_back(value);
                trace!(
                    "merge_map at limit {}, {} outer values buffered",
                    self.operator.concurrency,
                    state.pending.len()
                );
                return;
            }
            state.active += 1;
            let index = state.outer_index;
            state.outer_index += 1;
            index
        };
        self.project(value, outer_index);
    }

    fn project(self: &Arc<Self>, value: T, outer_index: usize) {
        let outer_value = match self.operator.selector {
            Selector::Combine(_) => Some(value.clone()),
            Selector::Passthrough(_) => None,
        };

        let inner = match (self.operator.project)(value, outer_index) {
            Ok(inner) => inner,
            Err(error) => {
                self.terminate(Cause::Projection, error);
                return;
            }
        };

        let id = {
            let mut state = self.state.lock();
            if state.phase.is_terminal() {
                return;
            }
            let id = InnerId::new(state.next_inner_id);
            state.next_inner_id += 1;
            state.inner.insert(
                id,
                InnerRecord {
                    subscription: None,
                    outer_value,
                    outer_index,
                },
            );
            id
        };
        trace!("merge_map starting {id} for outer value #{outer_index}");

        let listener: Arc<dyn InnerListener<U>> = Arc::new(InnerRelay {
            coordinator: Arc::clone(self),
        });
        let subscription = subscribe_to_result(listener, inner, InnerKey { id, outer_index });

        let orphan = match self.state.lock().inner.get_mut(&id) {
            Some(record) => {
                record.subscription = Some(subscription);
                None
            }
            None => Some(subscription),
        };
        // Released while subscribing.
        if let Some(subscription) = orphan {
            subscription.unsubscribe();
        }
    }

    fn on_inner_next(&self, id: InnerId, inner_index: usize, value: U) {
        let output = match &self.operator.selector {
            Selector::Passthrough(forward) => {
                if !self.state.lock().inner.contains_key(&id) {
                    return;
                }
                Ok(forward(value))
            }
            Selector::Combine(combine) => {
                let outer = self
                    .state
                    .lock()
                    .inner
                    .get(&id)
                    .and_then(|record| Some((record.outer_value.clone()?, record.outer_index)));
                let Some((outer_value, outer_index)) = outer else {
                    return;
                };
                combine(&outer_value, value, outer_index, inner_index)
            }
        };

        match output {
            Ok(output) => self.deliver(|downstream| downstream.on_next(output)),
            Err(error) => self.terminate(Cause::Combine, error),
        }
    }

    fn on_inner_complete(self: &Arc<Self>, id: InnerId) {
        let (subscription, next, done) = {
            let mut state = self.state.lock();
            let Some(record) = state.inner.remove(&id) else {
                return;
            };
            state.active -= 1;
            trace!("merge_map {id} finished, {} still active", state.active);
            let next = state.pending.pop_front();
            let done = next.is_none() && state.active == 0 && state.phase == Phase::Draining;
            (record.subscription, next, done)
        };

        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        if let Some(value) = next {
            self.accept(value);
        } else if done {
            self.complete();
        }
    }

    fn on_outer_complete(&self) {
        let idle = {
            let mut state = self.state.lock();
            if state.phase != Phase::Active {
                return;
            }
            let idle = state.active == 0 && state.pending.is_empty();
            if !idle {
                trace!(
                    "merge_map source completed, waiting on {} active and {} buffered",
                    state.active,
                    state.pending.len()
                );
                state.phase = Phase::Draining;
            }
            idle
        };
        if idle {
            self.complete();
        }
    }

    fn terminate(&self, cause: Cause, error: RivuletError) {
        if self.finish(Phase::Errored) {
            debug!("merge_map terminated by {cause} error: {error}");
            self.deliver(|downstream| downstream.on_error(error));
            self.subscription.unsubscribe();
        }
    }

    fn complete(&self) {
        if self.finish(Phase::Completed) {
            self.deliver(|downstream| downstream.on_complete());
            self.subscription.unsubscribe();
        }
    }

    /// Enters a terminal phase and releases every subscription still held.
    ///
    /// Returns `false` if the coordinator had already terminated.
    fn finish(&self, phase: Phase) -> bool {
        let released: Vec<Subscription> = {
            let mut state = self.state.lock();
            if state.phase.is_terminal() {
                return false;
            }
            debug!(
                "merge_map {phase:?} after projecting {} outer values, releasing {} inner sources",
                state.outer_index, state.active
            );
            state.phase = phase;
            self.closed.store(true, Ordering::Release);
            state.pending.clear();
            state.active = 0;
            state
                .inner
                .drain()
                .filter_map(|(_, record)| record.subscription)
                .collect()
        };
        for subscription in released {
            subscription.unsubscribe();
        }
        self.release_outer();
        true
    }
}

struct OuterObserver<T, U, R> {
    coordinator: Arc<MergeMapCoordinator<T, U, R>>,
}

impl<T, U, R> Observer<T> for OuterObserver<T, U, R>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    R: Send + 'static,
{
    fn on_next(&mut self, value: T) {
        self.coordinator.dispatch(Message::OuterNext(value));
    }

    fn on_error(&mut self, error: RivuletError) {
        self.coordinator.dispatch(Message::Error {
            cause: Cause::Upstream,
            error,
        });
    }

    fn on_complete(&mut self) {
        self.coordinator.dispatch(Message::OuterComplete);
    }

    fn is_closed(&self) -> bool {
        self.coordinator.is_closed()
    }
}

struct InnerRelay<T, U, R> {
    coordinator: Arc<MergeMapCoordinator<T, U, R>>,
}

impl<T, U, R> InnerListener<U> for InnerRelay<T, U, R>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    R: Send + 'static,
{
    fn inner_next(&self, key: InnerKey, inner_index: usize, value: U) {
        self.coordinator.dispatch(Message::InnerNext {
            subscription_id: key.id,
            inner_index,
            value,
        });
    }

    fn inner_error(&self, key: InnerKey, error: RivuletError) {
        trace!("merge_map {} failed", key.id);
        self.coordinator.dispatch(Message::Error {
            cause: Cause::Upstream,
            error,
        });
    }

    fn inner_complete(&self, key: InnerKey) {
        self.coordinator.dispatch(Message::InnerComplete {
            subscription_id: key.id,
        });
    }

    fn is_closed(&self) -> bool {
        self.coordinator.is_closed()
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stop signal shared between a subscription and the task feeding it.
//!
//! Async sources run their producer on a background task. Releasing the
//! subscription fires the token; the task notices at its next `select!` and exits.

use core::sync::atomic::{AtomicBool, Ordering};
use event_listener::Event;
use std::sync::Arc;

/// Cloneable one-way stop signal.
///
/// Once fired it stays fired. Every clone observes the same state.
///
/// ```
/// use rivulet_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!handle.is_cancelled());
///
/// token.cancel();
/// assert!(handle.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    signal: Arc<Signal>,
}

#[derive(Debug, Default)]
struct Signal {
    fired: AtomicBool,
    waiters: Event,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the token and wakes every waiter. Later calls do nothing.
    pub fn cancel(&self) {
        if !self.signal.fired.swap(true, Ordering::AcqRel) {
            self.signal.waiters.notify(usize::MAX);
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.fired.load(Ordering::Acquire)
    }

    /// Waits until the token fires. Returns at once if it already has.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let listener = self.signal.waiters.listen();
            // Registered before the re-check, so a concurrent cancel() cannot be missed.
            if self.is_cancelled() {
                return;
            }
            listener.await;
        }
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronization primitive used for all shared operator and subject state.

pub use parking_lot::{Mutex, MutexGuard};

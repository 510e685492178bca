// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::num::NonZeroUsize;
use rivulet_core::{Result, RivuletError};

/// Maximum number of inner sources a merge may keep subscribed at once.
///
/// ```
/// use rivulet_merge_map::Concurrency;
///
/// assert_eq!(Concurrency::default(), Concurrency::Unbounded);
/// assert_eq!(Concurrency::limited(2).unwrap().get(), Some(2));
/// assert!(Concurrency::limited(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Concurrency {
    /// Every outer value is projected as soon as it arrives.
    #[default]
    Unbounded,
    /// At most this many inner sources are active; excess outer values wait.
    Limited(NonZeroUsize),
}

impl Concurrency {
    /// One inner source at a time.
    pub const SERIAL: Self = Self::Limited(NonZeroUsize::MIN);

    /// Builds a limit of `limit` inner sources.
    ///
    /// # Errors
    ///
    /// Returns `RivuletError::InvalidConcurrencyLimit` if `limit` is zero.
    pub fn limited(limit: usize) -> Result<Self> {
        NonZeroUsize::new(limit)
            .map(Self::Limited)
            .ok_or(RivuletError::invalid_concurrency_limit(limit))
    }

    /// The numeric limit, or `None` when unbounded.
    #[must_use]
    pub const fn get(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Limited(limit) => Some(limit.get()),
        }
    }

    /// Returns `true` if another inner source may start while `active` are running.
    #[must_use]
    pub const fn has_capacity(self, active: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited(limit) => active < limit.get(),
        }
    }
}

impl From<NonZeroUsize> for Concurrency {
    fn from(limit: NonZeroUsize) -> Self {
        Self::Limited(limit)
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Limited(limit) => write!(f, "{limit}"),
        }
    }
}

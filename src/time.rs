//! Clock abstraction for code generation.
//!
//! Production code reads the wall clock through [`SystemClock`]; tests and
//! replays inject a [`FixedClock`] so every code is reproducible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the current time as whole seconds since the Unix epoch.
///
/// Implementations must be cheap and safe to read from several threads at
/// once. Monotonicity is the caller's concern.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> u64 {
        // Clocks set before 1970 clamp to the epoch instead of wrapping.
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    epoch: AtomicU64,
}

impl FixedClock {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch: AtomicU64::new(epoch),
        }
    }

    pub fn set(&self, epoch: u64) {
        self.epoch.store(epoch, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.epoch.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

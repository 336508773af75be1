//! Clock abstraction for time-dependent components
//!
//! The admission controller counts requests against sliding windows ending
//! at "now". Taking the clock through a trait keeps the window arithmetic
//! testable without sleeping: tests inject a [`ManualClock`] and advance it
//! by hand.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of monotonic time.
pub trait Clock: Send + Sync {
    /// Current instant. Must be monotonically non-decreasing.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock (for testing).
///
/// Starts at the instant of construction and only moves when
/// [`advance`](ManualClock::advance) is called.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Duration) {
        *self.offset.lock() += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

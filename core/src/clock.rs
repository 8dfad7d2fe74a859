//! The clock seam.
//!
//! RULE: The engine never reads a wall clock. Hosts pass `now` in
//! explicitly, usually taken from a `Clock`. Tests and the batch runner
//! use `ManualClock` so no test ever waits on real time.

use crate::types::{Timestamp, MS_PER_PET_DAY};
use chrono::{Duration, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Milliseconds from `earlier` to now. Negative if the clock went backwards.
    fn elapsed_ms_since(&self, earlier: Timestamp) -> i64 {
        (self.now() - earlier).num_milliseconds()
    }
}

/// Reads the real UTC wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: Cell::new(start) }
    }

    pub fn set(&self, t: Timestamp) {
        self.now.set(t);
    }

    /// Move forward (or backward, for negative values) by `ms`.
    /// Returns the new reading.
    pub fn advance_ms(&self, ms: i64) -> Timestamp {
        let next = self.now.get() + Duration::milliseconds(ms);
        self.now.set(next);
        next
    }

    pub fn advance_minutes(&self, minutes: i64) -> Timestamp {
        self.advance_ms(minutes * MS_PER_PET_DAY)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

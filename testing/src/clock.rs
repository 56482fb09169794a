//! Deterministic clocks for tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deskline_core::clock::Clock;
use std::sync::Mutex;

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock that always reports `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A clock that advances by a fixed step on every reading.
///
/// Useful for asserting on wait-time arithmetic: each lifecycle timestamp
/// lands a known interval after the previous one.
#[derive(Debug)]
pub struct SteppingClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Create a clock starting at `start`, advancing by `step` per call.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    #[allow(clippy::missing_panics_doc)] // Poisoned lock is recovered, not propagated
    fn now(&self) -> DateTime<Utc> {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let reading = *current;
        *current += self.step;
        reading
    }
}

/// A fixed clock at 2024-05-01 09:00:00 UTC, the conventional test instant.
#[must_use]
#[allow(clippy::missing_panics_doc)] // The literal instant is always valid
pub fn test_clock() -> FixedClock {
    FixedClock::new(test_instant())
}

/// The conventional test instant: 2024-05-01 09:00:00 UTC.
#[must_use]
#[allow(clippy::missing_panics_doc)] // The literal instant is always valid
pub fn test_instant() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0) {
        chrono::LocalResult::Single(instant) => instant,
        _ => unreachable!("literal instant is unambiguous"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_never_advances() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn stepping_clock_advances_per_reading() {
        let clock = SteppingClock::new(test_instant(), Duration::minutes(3));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::minutes(3));
    }
}

//! Time abstraction.
//!
//! Transitions stamp tickets with times obtained through [`Clock`] so tests
//! can run against deterministic clocks (see `deskline-testing`).

use chrono::{DateTime, Utc};

/// Abstracts time for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//! Test support for the queue engine: deterministic clocks, fixture
//! builders, and event-collection helpers.
//!
//! Everything here is deterministic; no test using these utilities depends
//! on wall-clock time or channel timing.

pub mod builder;
pub mod clock;

pub use builder::{BookingBuilder, test_date, test_scope};
pub use clock::{FixedClock, SteppingClock, test_clock, test_instant};

use deskline_core::event::QueueEvent;
use tokio::sync::broadcast;

/// Drain every event currently buffered in a subscription.
///
/// Stops at the first empty read; never blocks. A lagged subscription skips
/// the overrun and keeps draining.
pub fn collect_events(rx: &mut broadcast::Receiver<QueueEvent>) -> Vec<QueueEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

//! Read-side projections over the queue engine.
//!
//! Pure, read-only derivations of queue state: live dashboard views,
//! per-day aggregate statistics, and an event-log fold for rebuilding
//! status indexes from the notifier stream. Nothing here mutates engine
//! state.

pub mod dashboard;
pub mod replay;
pub mod stats;

pub use dashboard::{count_by_service, count_by_status, list_waiting};
pub use replay::StatusIndex;
pub use stats::{DailyStats, daily_stats};

use deskline_core::event::QueueEvent;

/// Error surfaced by a projection fold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// An event arrived for a ticket the projection has never seen created.
    ///
    /// Means the subscription missed the creation event (e.g. it lagged and
    /// was not re-seeded from a store snapshot).
    #[error("event {event_type} for unknown ticket {ticket_id}")]
    UnknownTicket {
        /// The versioned event type string.
        event_type: &'static str,
        /// The ticket the event referred to.
        ticket_id: deskline_core::types::TicketId,
    },
}

/// An incremental fold over the domain-event stream.
///
/// Implementations consume events in the order a subscription delivers them
/// and must tolerate replays from the beginning after a [`reset`].
///
/// [`reset`]: Projection::reset
pub trait Projection {
    /// Stable name, for logging.
    fn name(&self) -> &'static str;

    /// Fold one event into the projection.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when the event cannot be applied; the
    /// projection's prior state is preserved.
    fn handle_event(&mut self, event: &QueueEvent) -> Result<(), ProjectionError>;

    /// Discard all derived state, ready for a full replay.
    fn reset(&mut self);
}

//! Domain events emitted by committed queue transitions.
//!
//! Events are immutable facts published *after* the authoritative state
//! change commits in the ticket store. They are the seam for push
//! notifications and live dashboards; the engine never delivers
//! notifications itself.
//!
//! # Ordering
//!
//! Within a single ticket's history, events follow commit order. Across
//! tickets, ordering is best-effort (timestamps, not a serialized log).
//!
//! # Serialization
//!
//! Events serialize to a compact bincode envelope via the [`Event`] trait for
//! storage and replay. Event type strings carry a version suffix so schemas
//! can evolve (`"TicketCreated.v1"`).

use crate::scope::Scope;
use crate::types::{CounterId, Priority, QueueNumber, ServiceType, TicketId, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Error types for event serialization.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize an event to bytes.
    #[error("Failed to serialize event: {0}")]
    Serialization(String),

    /// Failed to deserialize an event from bytes.
    #[error("Failed to deserialize event: {0}")]
    Deserialization(String),
}

/// An immutable domain fact with a versioned type identifier and a binary
/// wire form.
pub trait Event: Send + Sync + 'static {
    /// Stable, versioned type identifier (e.g. `"TicketCreated.v1"`). Used to
    /// label stored events and route deserialization.
    fn event_type(&self) -> &'static str;

    /// Serialize this event to bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Serialization`] if the event cannot be
    /// serialized.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        bincode::serialize(self).map_err(|e| EventError::Serialization(e.to_string()))
    }

    /// Deserialize an event from bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Deserialization`] if the bytes are corrupt or
    /// belong to an incompatible schema.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        bincode::deserialize(bytes).map_err(|e| EventError::Deserialization(e.to_string()))
    }
}

/// Everything that can happen to a ticket, as published to subscribers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum QueueEvent {
    /// A booking created a new `Waiting` ticket.
    TicketCreated {
        /// The new ticket.
        ticket_id: TicketId,
        /// Scope the ticket was booked under.
        scope: Scope,
        /// Number issued by the numbering authority.
        queue_number: QueueNumber,
        /// Requested service.
        service: ServiceType,
        /// Booking priority.
        priority: Priority,
        /// When the booking committed.
        at: DateTime<Utc>,
    },

    /// A staff member called the ticket to a counter.
    TicketCalled {
        /// The called ticket.
        ticket_id: TicketId,
        /// Scope the ticket belongs to.
        scope: Scope,
        /// Counter now serving the ticket.
        counter: CounterId,
        /// When the call committed.
        at: DateTime<Utc>,
    },

    /// Service completed.
    TicketServed {
        /// The served ticket.
        ticket_id: TicketId,
        /// Scope the ticket belongs to.
        scope: Scope,
        /// When the serve committed.
        at: DateTime<Utc>,
    },

    /// The caller never appeared at the counter.
    TicketNoShow {
        /// The ticket marked no-show.
        ticket_id: TicketId,
        /// Scope the ticket belongs to.
        scope: Scope,
        /// When the no-show committed.
        at: DateTime<Utc>,
    },

    /// The booking was withdrawn.
    TicketCancelled {
        /// The cancelled ticket.
        ticket_id: TicketId,
        /// Scope the ticket belongs to.
        scope: Scope,
        /// When the cancellation committed.
        at: DateTime<Utc>,
    },
}

impl QueueEvent {
    /// The ticket this event concerns.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        match self {
            Self::TicketCreated { ticket_id, .. }
            | Self::TicketCalled { ticket_id, .. }
            | Self::TicketServed { ticket_id, .. }
            | Self::TicketNoShow { ticket_id, .. }
            | Self::TicketCancelled { ticket_id, .. } => *ticket_id,
        }
    }

    /// The scope this event belongs to.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        match self {
            Self::TicketCreated { scope, .. }
            | Self::TicketCalled { scope, .. }
            | Self::TicketServed { scope, .. }
            | Self::TicketNoShow { scope, .. }
            | Self::TicketCancelled { scope, .. } => scope,
        }
    }

    /// The ticket status this event establishes.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        match self {
            Self::TicketCreated { .. } => TicketStatus::Waiting,
            Self::TicketCalled { .. } => TicketStatus::InProgress,
            Self::TicketServed { .. } => TicketStatus::Served,
            Self::TicketNoShow { .. } => TicketStatus::NoShow,
            Self::TicketCancelled { .. } => TicketStatus::Cancelled,
        }
    }

    /// When the underlying transition committed.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::TicketCreated { at, .. }
            | Self::TicketCalled { at, .. }
            | Self::TicketServed { at, .. }
            | Self::TicketNoShow { at, .. }
            | Self::TicketCancelled { at, .. } => *at,
        }
    }
}

impl Event for QueueEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::TicketCreated { .. } => "TicketCreated.v1",
            Self::TicketCalled { .. } => "TicketCalled.v1",
            Self::TicketServed { .. } => "TicketServed.v1",
            Self::TicketNoShow { .. } => "TicketNoShow.v1",
            Self::TicketCancelled { .. } => "TicketCancelled.v1",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scope() -> Scope {
        Scope::new("registrar", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn event_type_is_versioned() {
        let event = QueueEvent::TicketServed {
            ticket_id: TicketId::new(),
            scope: scope(),
            at: Utc::now(),
        };
        assert_eq!(event.event_type(), "TicketServed.v1");
    }

    #[test]
    fn event_establishes_status() {
        let id = TicketId::new();
        let at = Utc::now();
        let called = QueueEvent::TicketCalled {
            ticket_id: id,
            scope: scope(),
            counter: CounterId::default(),
            at,
        };
        assert_eq!(called.status(), TicketStatus::InProgress);
        assert_eq!(called.ticket_id(), id);
        assert_eq!(called.timestamp(), at);
    }

    #[test]
    fn event_serialization_round_trips() {
        let event = QueueEvent::TicketCreated {
            ticket_id: TicketId::new(),
            scope: scope(),
            queue_number: QueueNumber::new(1),
            service: ServiceType::DocumentRequest,
            priority: Priority::Urgent,
            at: Utc::now(),
        };

        let bytes = event.to_bytes().unwrap();
        let decoded = QueueEvent::from_bytes(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}

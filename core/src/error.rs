//! Error taxonomy for queue operations.
//!
//! Every fallible operation in the engine surfaces one of these variants; no
//! internal error is silently swallowed. The store guarantees all-or-nothing
//! updates, so a failed transition never leaves a ticket half-updated.

use crate::scope::{ParseScopeError, Scope};
use crate::types::{CounterId, TicketId, TicketStatus, Version};
use thiserror::Error;

/// Errors surfaced by the queue engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Ticket id unknown. Surfaced to the caller; not retryable.
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),

    /// The requested status change violates the state machine. The operation
    /// is aborted with no partial write.
    #[error("Illegal transition: cannot {action} a ticket that is {from}")]
    IllegalTransition {
        /// The ticket's current status.
        from: TicketStatus,
        /// The attempted action, in lowercase verb form (`call`, `serve`,
        /// `no-show`, `cancel`).
        action: &'static str,
    },

    /// Concurrent mutation collision on the same ticket. The caller should
    /// re-read and retry (local recovery).
    #[error("Conflict on ticket {ticket_id}: expected {expected}, found {actual}")]
    Conflict {
        /// The ticket that was mutated concurrently.
        ticket_id: TicketId,
        /// The version the caller expected.
        expected: Version,
        /// The version actually stored.
        actual: Version,
    },

    /// A ticket is already in progress at this counter. User-actionable, not
    /// fatal: finish or no-show the active ticket first.
    #[error("Counter {counter} is busy serving ticket {active}")]
    CounterBusy {
        /// The busy counter.
        counter: CounterId,
        /// The ticket currently being served there.
        active: TicketId,
    },

    /// No waiting tickets to call. A normal outcome, not a fault.
    #[error("No waiting tickets in scope {0}")]
    EmptyQueue(Scope),

    /// Malformed scope key. Fatal to the request, not to the process.
    #[error("Invalid scope: {0}")]
    InvalidScope(#[from] ParseScopeError),

    /// Position asked for a ticket in a terminal state; its position is
    /// undefined, not zero.
    #[error("Ticket {ticket_id} is {status}; it has no queue position")]
    NotWaiting {
        /// The ticket that was queried.
        ticket_id: TicketId,
        /// Its terminal status.
        status: TicketStatus,
    },

    /// A ticket with this id already exists in the store. Ids are random
    /// UUIDs, so this indicates a caller bug rather than bad input.
    #[error("Ticket {0} already exists")]
    DuplicateTicket(TicketId),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn illegal_transition_display() {
        let err = QueueError::IllegalTransition {
            from: TicketStatus::Served,
            action: "call",
        };
        let display = format!("{err}");
        assert!(display.contains("call"));
        assert!(display.contains("Served"));
    }

    #[test]
    fn conflict_display_names_versions() {
        let err = QueueError::Conflict {
            ticket_id: TicketId::new(),
            expected: Version::new(2),
            actual: Version::new(3),
        };
        let display = format!("{err}");
        assert!(display.contains("v2"));
        assert!(display.contains("v3"));
    }

    #[test]
    fn invalid_scope_converts_from_parse_error() {
        let parse_err = "no-date-here".parse::<Scope>().unwrap_err();
        let err: QueueError = parse_err.into();
        assert!(matches!(err, QueueError::InvalidScope(_)));
    }
}

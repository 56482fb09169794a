//! The ticket state machine.
//!
//! All mutation of a ticket after booking flows through [`Ticket::apply`].
//! The transition table:
//!
//! | From       | Action  | To         | Side effect                  |
//! |------------|---------|------------|------------------------------|
//! | Waiting    | call    | InProgress | sets `called_at`             |
//! | InProgress | serve   | Served     | sets `served_at`             |
//! | InProgress | no-show | NoShow     | sets `closed_at`             |
//! | Waiting    | cancel  | Cancelled  | sets `closed_at`             |
//! | InProgress | cancel  | Cancelled  | sets `closed_at`             |
//!
//! Anything else — serving a `Waiting` ticket, any action on a terminal
//! ticket — fails with [`QueueError::IllegalTransition`] and leaves the
//! ticket untouched. No-show is deliberately *not* reachable from `Waiting`:
//! a ticket must have been called before it can fail to appear; an abandoned
//! `Waiting` reservation is a cancellation.

use crate::error::QueueError;
use crate::event::QueueEvent;
use crate::types::{CounterId, Ticket, TicketStatus};
use chrono::{DateTime, Utc};

/// A requested status change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketAction {
    /// Call the ticket to a counter.
    Call(CounterId),
    /// Complete service.
    Serve,
    /// The caller never appeared.
    NoShow,
    /// Withdraw the booking.
    Cancel,
}

impl TicketAction {
    /// Lowercase verb form, used in error messages.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Call(_) => "call",
            Self::Serve => "serve",
            Self::NoShow => "no-show",
            Self::Cancel => "cancel",
        }
    }
}

/// Look up the transition table.
///
/// # Errors
///
/// Returns [`QueueError::IllegalTransition`] when `action` is not legal from
/// `from`.
pub const fn next_status(
    from: TicketStatus,
    action: &TicketAction,
) -> Result<TicketStatus, QueueError> {
    use TicketStatus::{Cancelled, InProgress, NoShow, Served, Waiting};

    match (from, action) {
        (Waiting, TicketAction::Call(_)) => Ok(InProgress),
        (InProgress, TicketAction::Serve) => Ok(Served),
        (InProgress, TicketAction::NoShow) => Ok(NoShow),
        (Waiting | InProgress, TicketAction::Cancel) => Ok(Cancelled),
        _ => Err(QueueError::IllegalTransition {
            from,
            action: action.verb(),
        }),
    }
}

impl Ticket {
    /// Apply a validated transition, returning the domain event it produced.
    ///
    /// Validation happens before any field is touched, so a rejected
    /// transition leaves the ticket exactly as it was. Each transition sets
    /// its timestamp exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::IllegalTransition`] when the action is not legal
    /// from the ticket's current status.
    pub fn apply(
        &mut self,
        action: TicketAction,
        now: DateTime<Utc>,
    ) -> Result<QueueEvent, QueueError> {
        let to = next_status(self.status, &action)?;
        self.status = to;

        let event = match action {
            TicketAction::Call(counter) => {
                self.called_at = Some(now);
                QueueEvent::TicketCalled {
                    ticket_id: self.id,
                    scope: self.scope.clone(),
                    counter,
                    at: now,
                }
            }
            TicketAction::Serve => {
                self.served_at = Some(now);
                QueueEvent::TicketServed {
                    ticket_id: self.id,
                    scope: self.scope.clone(),
                    at: now,
                }
            }
            TicketAction::NoShow => {
                self.closed_at = Some(now);
                QueueEvent::TicketNoShow {
                    ticket_id: self.id,
                    scope: self.scope.clone(),
                    at: now,
                }
            }
            TicketAction::Cancel => {
                self.closed_at = Some(now);
                QueueEvent::TicketCancelled {
                    ticket_id: self.id,
                    scope: self.scope.clone(),
                    at: now,
                }
            }
        };

        Ok(event)
    }
}

//! Event-log fold: rebuild a ticket status index from the event stream.

use crate::{Projection, ProjectionError};
use deskline_core::event::{Event, QueueEvent};
use deskline_core::types::{TicketId, TicketStatus};
use std::collections::HashMap;

/// A projection folding the event stream into current ticket statuses.
///
/// Feeding it a ticket's full event history in commit order reproduces the
/// status the store holds for that ticket. Applying an event that repeats the
/// ticket's current status is a no-op, so redelivery is harmless.
#[derive(Debug, Default)]
pub struct StatusIndex {
    statuses: HashMap<TicketId, TicketStatus>,
}

impl StatusIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The folded status of a ticket, if its creation has been seen.
    #[must_use]
    pub fn status_of(&self, id: TicketId) -> Option<TicketStatus> {
        self.statuses.get(&id).copied()
    }

    /// Number of tickets the index has seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether the index has seen no tickets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Count of tickets currently at a status.
    #[must_use]
    pub fn count_at(&self, status: TicketStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }
}

impl Projection for StatusIndex {
    fn name(&self) -> &'static str {
        "status-index"
    }

    fn handle_event(&mut self, event: &QueueEvent) -> Result<(), ProjectionError> {
        let id = event.ticket_id();
        match event {
            QueueEvent::TicketCreated { .. } => {
                self.statuses.insert(id, TicketStatus::Waiting);
                Ok(())
            }
            _ => {
                let Some(status) = self.statuses.get_mut(&id) else {
                    return Err(ProjectionError::UnknownTicket {
                        event_type: event.event_type(),
                        ticket_id: id,
                    });
                };
                *status = event.status();
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.statuses.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use deskline_core::scope::Scope;
    use deskline_core::types::{CounterId, Priority, QueueNumber, ServiceType};

    fn scope() -> Scope {
        Scope::new("registrar", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn created(id: TicketId, number: u32) -> QueueEvent {
        QueueEvent::TicketCreated {
            ticket_id: id,
            scope: scope(),
            queue_number: QueueNumber::new(number),
            service: ServiceType::GeneralInquiry,
            priority: Priority::Standard,
            at: Utc::now(),
        }
    }

    #[test]
    fn folds_a_lifecycle_to_its_final_status() {
        let id = TicketId::new();
        let mut index = StatusIndex::new();

        index.handle_event(&created(id, 1)).unwrap();
        assert_eq!(index.status_of(id), Some(TicketStatus::Waiting));

        index
            .handle_event(&QueueEvent::TicketCalled {
                ticket_id: id,
                scope: scope(),
                counter: CounterId::default(),
                at: Utc::now(),
            })
            .unwrap();
        assert_eq!(index.status_of(id), Some(TicketStatus::InProgress));

        index
            .handle_event(&QueueEvent::TicketServed {
                ticket_id: id,
                scope: scope(),
                at: Utc::now(),
            })
            .unwrap();
        assert_eq!(index.status_of(id), Some(TicketStatus::Served));
    }

    #[test]
    fn event_for_unseen_ticket_is_an_error() {
        let mut index = StatusIndex::new();
        let err = index
            .handle_event(&QueueEvent::TicketCancelled {
                ticket_id: TicketId::new(),
                scope: scope(),
                at: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownTicket { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn redelivery_is_a_no_op() {
        let id = TicketId::new();
        let mut index = StatusIndex::new();
        index.handle_event(&created(id, 1)).unwrap();

        let cancelled = QueueEvent::TicketCancelled {
            ticket_id: id,
            scope: scope(),
            at: Utc::now(),
        };
        index.handle_event(&cancelled).unwrap();
        index.handle_event(&cancelled).unwrap();
        assert_eq!(index.status_of(id), Some(TicketStatus::Cancelled));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn reset_allows_full_replay() {
        let id = TicketId::new();
        let mut index = StatusIndex::new();
        index.handle_event(&created(id, 1)).unwrap();
        assert_eq!(index.len(), 1);

        index.reset();
        assert!(index.is_empty());

        index.handle_event(&created(id, 1)).unwrap();
        assert_eq!(index.status_of(id), Some(TicketStatus::Waiting));
    }

    #[test]
    fn counts_by_status() {
        let mut index = StatusIndex::new();
        let a = TicketId::new();
        let b = TicketId::new();
        index.handle_event(&created(a, 1)).unwrap();
        index.handle_event(&created(b, 2)).unwrap();
        index
            .handle_event(&QueueEvent::TicketCancelled {
                ticket_id: b,
                scope: scope(),
                at: Utc::now(),
            })
            .unwrap();

        assert_eq!(index.count_at(TicketStatus::Waiting), 1);
        assert_eq!(index.count_at(TicketStatus::Cancelled), 1);
    }
}

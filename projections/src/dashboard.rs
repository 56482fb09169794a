//! Live dashboard views over the ticket store.
//!
//! Each view is a pure read: one stable store snapshot, aggregated in
//! memory. Staff dashboards poll these; nothing here observes the event
//! stream or holds state between calls.

use deskline_core::scope::Scope;
use deskline_core::types::{ServiceType, Ticket, TicketStatus};
use deskline_engine::{ListFilter, TicketStore, service_order};
use std::collections::HashMap;

/// Count a scope's tickets by status.
///
/// Statuses with no tickets are absent from the map.
pub async fn count_by_status(
    store: &TicketStore,
    scope: &Scope,
) -> HashMap<TicketStatus, usize> {
    let tickets = store
        .list(&ListFilter::new().with_scope(scope.clone()))
        .await;
    let mut counts = HashMap::new();
    for ticket in tickets {
        *counts.entry(ticket.status).or_insert(0) += 1;
    }
    counts
}

/// Count a scope's tickets by requested service.
pub async fn count_by_service(
    store: &TicketStore,
    scope: &Scope,
) -> HashMap<ServiceType, usize> {
    let tickets = store
        .list(&ListFilter::new().with_scope(scope.clone()))
        .await;
    let mut counts = HashMap::new();
    for ticket in tickets {
        *counts.entry(ticket.service).or_insert(0) += 1;
    }
    counts
}

/// A scope's waiting tickets in the order staff will call them.
pub async fn list_waiting(store: &TicketStore, scope: &Scope) -> Vec<Ticket> {
    let mut waiting = store
        .list(
            &ListFilter::new()
                .with_scope(scope.clone())
                .with_status(TicketStatus::Waiting),
        )
        .await;
    waiting.sort_by(service_order);
    waiting
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deskline_core::clock::SystemClock;
    use deskline_core::types::Priority;
    use deskline_engine::QueueEngine;
    use deskline_testing::{BookingBuilder, test_scope};
    use std::sync::Arc;

    #[tokio::test]
    async fn status_counts_track_transitions() {
        let engine = QueueEngine::new(Arc::new(SystemClock));
        engine.book(BookingBuilder::new().build()).await.unwrap();
        engine.book(BookingBuilder::new().build()).await.unwrap();
        engine.call_next(&test_scope()).await.unwrap();

        let counts = count_by_status(engine.store(), &test_scope()).await;
        assert_eq!(counts.get(&TicketStatus::Waiting), Some(&1));
        assert_eq!(counts.get(&TicketStatus::InProgress), Some(&1));
        assert_eq!(counts.get(&TicketStatus::Served), None);
    }

    #[tokio::test]
    async fn service_counts_partition_by_request() {
        let engine = QueueEngine::new(Arc::new(SystemClock));
        engine
            .book(
                BookingBuilder::new()
                    .service(ServiceType::PaymentProcessing)
                    .build(),
            )
            .await
            .unwrap();
        engine.book(BookingBuilder::new().build()).await.unwrap();

        let counts = count_by_service(engine.store(), &test_scope()).await;
        assert_eq!(counts.get(&ServiceType::PaymentProcessing), Some(&1));
        assert_eq!(counts.get(&ServiceType::DocumentRequest), Some(&1));
    }

    #[tokio::test]
    async fn waiting_list_is_in_call_order() {
        let engine = QueueEngine::new(Arc::new(SystemClock));
        let standard = engine.book(BookingBuilder::new().build()).await.unwrap();
        let urgent = engine
            .book(BookingBuilder::new().priority(Priority::Urgent).build())
            .await
            .unwrap();

        let waiting = list_waiting(engine.store(), &test_scope()).await;
        let ids: Vec<_> = waiting.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![urgent.id, standard.id]);
    }
}

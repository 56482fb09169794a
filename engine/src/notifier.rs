//! The event notifier: per-scope broadcast of committed transitions.
//!
//! Every committed transition publishes one [`QueueEvent`] to the scope's
//! broadcast channel. Publication happens *after* the authoritative state
//! change commits in the store, and a publish failure (no subscribers, a
//! dropped receiver) never rolls back or blocks the transition.
//!
//! Delivery is best-effort with a bounded buffer: a subscriber that falls
//! more than the channel capacity behind loses the overrun events and
//! receives a `Lagged` error in their place, and should re-snapshot the
//! store before resuming. Events for one ticket arrive in commit order;
//! cross-ticket ordering is best-effort.

use deskline_core::event::{Event, QueueEvent};
use deskline_core::scope::Scope;
use std::collections::HashMap;
use tokio::sync::{RwLock, broadcast};

/// Fans out domain events to per-scope subscribers.
///
/// External delivery mechanisms (push notifications, dashboard feeds)
/// subscribe here; the engine itself never delivers notifications.
#[derive(Debug)]
pub struct EventNotifier {
    capacity: usize,
    channels: RwLock<HashMap<Scope, broadcast::Sender<QueueEvent>>>,
}

impl EventNotifier {
    /// Create a notifier whose per-scope channels buffer `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to a scope's event sequence.
    ///
    /// Only events published after this call are delivered; consumers needing
    /// history snapshot the store first and then follow the stream.
    pub async fn subscribe(&self, scope: &Scope) -> broadcast::Receiver<QueueEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(scope.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish a committed event to its scope's subscribers.
    ///
    /// Best-effort: an error from the channel (no active subscribers) is
    /// recorded at trace level and otherwise ignored.
    pub async fn publish(&self, event: &QueueEvent) {
        let channels = self.channels.read().await;
        let Some(sender) = channels.get(event.scope()) else {
            tracing::trace!(
                event_type = event.event_type(),
                scope = %event.scope(),
                "no subscribers for scope; event dropped"
            );
            return;
        };

        match sender.send(event.clone()) {
            Ok(receivers) => {
                tracing::debug!(
                    event_type = event.event_type(),
                    ticket_id = %event.ticket_id(),
                    scope = %event.scope(),
                    receivers,
                    "event published"
                );
            }
            Err(_) => {
                // All receivers dropped since the channel was created.
                tracing::trace!(
                    event_type = event.event_type(),
                    scope = %event.scope(),
                    "no active subscribers; event dropped"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use deskline_core::types::TicketId;

    fn scope(office: &str) -> Scope {
        Scope::new(office, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn served(scope: Scope) -> QueueEvent {
        QueueEvent::TicketServed {
            ticket_id: TicketId::new(),
            scope,
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_scope_events() {
        let notifier = EventNotifier::new(16);
        let registrar = scope("registrar");
        let mut rx = notifier.subscribe(&registrar).await;

        let event = served(registrar);
        notifier.publish(&event).await;

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let notifier = EventNotifier::new(16);
        let mut registrar_rx = notifier.subscribe(&scope("registrar")).await;
        let mut cashier_rx = notifier.subscribe(&scope("cashier")).await;

        notifier.publish(&served(scope("cashier"))).await;

        assert!(registrar_rx.try_recv().is_err());
        assert!(cashier_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_harmless() {
        let notifier = EventNotifier::new(16);
        // No channel for the scope at all
        notifier.publish(&served(scope("registrar"))).await;

        // Channel exists but the only receiver is gone
        drop(notifier.subscribe(&scope("cashier")).await);
        notifier.publish(&served(scope("cashier"))).await;
    }

    #[tokio::test]
    async fn per_ticket_order_is_commit_order() {
        let notifier = EventNotifier::new(16);
        let registrar = scope("registrar");
        let mut rx = notifier.subscribe(&registrar).await;

        let id = TicketId::new();
        let first = QueueEvent::TicketCalled {
            ticket_id: id,
            scope: registrar.clone(),
            counter: deskline_core::types::CounterId::default(),
            at: Utc::now(),
        };
        let second = QueueEvent::TicketServed {
            ticket_id: id,
            scope: registrar.clone(),
            at: Utc::now(),
        };
        notifier.publish(&first).await;
        notifier.publish(&second).await;

        assert_eq!(rx.recv().await.unwrap(), first);
        assert_eq!(rx.recv().await.unwrap(), second);
    }

    #[tokio::test]
    async fn lagged_subscriber_sees_lag_not_corruption() {
        let notifier = EventNotifier::new(2);
        let registrar = scope("registrar");
        let mut rx = notifier.subscribe(&registrar).await;

        for _ in 0..5 {
            notifier.publish(&served(registrar.clone())).await;
        }

        // First recv reports the overrun; the stream then resumes.
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert!(rx.recv().await.is_ok());
    }
}

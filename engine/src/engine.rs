//! The queue engine facade.
//!
//! Wires the numbering authority, ticket store, notifier, and counter
//! assignments into the operation surface consumed by external layers:
//! booking intake, the staff action surface, student-facing reads, and
//! event subscription.
//!
//! # Concurrency
//!
//! The store serializes per-ticket mutation; the assignments lock serializes
//! call-next, so two concurrent `call_next` calls over one waiting ticket
//! resolve to exactly one winner. Staff transitions carry the version they
//! read, so a racing mutation of the same ticket surfaces
//! [`QueueError::Conflict`] to one caller instead of being lost.

use crate::config::EngineConfig;
use crate::notifier::EventNotifier;
use crate::numbering::NumberingAuthority;
use crate::ordering::service_order;
use crate::store::{ListFilter, TicketStore};
use chrono::NaiveTime;
use deskline_core::clock::Clock;
use deskline_core::event::QueueEvent;
use deskline_core::scope::Scope;
use deskline_core::transition::TicketAction;
use deskline_core::types::{
    CounterId, OwnerRef, Priority, QueueNumber, ServiceType, Ticket, TicketId, TicketStatus,
};
use deskline_core::QueueError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// A booking request entering the queue.
///
/// # Example
///
/// ```
/// use deskline_engine::BookingRequest;
/// use deskline_core::types::{OwnerRef, Priority, ServiceType};
/// use deskline_core::scope::Scope;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let scope = Scope::new("registrar", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
/// let request = BookingRequest::new(
///     scope,
///     ServiceType::DocumentRequest,
///     NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
///     OwnerRef::new("student-42"),
/// )
/// .with_priority(Priority::Urgent)
/// .with_purpose("transcript for transfer");
/// ```
#[derive(Clone, Debug)]
pub struct BookingRequest {
    /// Scope to book under.
    pub scope: Scope,
    /// Requested service.
    pub service: ServiceType,
    /// Advisory time-of-day slot; never affects ordering.
    pub requested_slot: NaiveTime,
    /// Booking priority.
    pub priority: Priority,
    /// Opaque identity of the booking caller.
    pub owner: OwnerRef,
    /// Optional free-text annotation.
    pub purpose: Option<String>,
}

impl BookingRequest {
    /// Create a standard-priority request with no purpose annotation.
    #[must_use]
    pub const fn new(
        scope: Scope,
        service: ServiceType,
        requested_slot: NaiveTime,
        owner: OwnerRef,
    ) -> Self {
        Self {
            scope,
            service,
            requested_slot,
            priority: Priority::Standard,
            owner,
            purpose: None,
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a free-text purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }
}

/// A ticket's queue position and estimated wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Estimate {
    /// Count of active tickets ordered ahead. A ticket being served is at
    /// position 0.
    pub position: usize,
    /// `position * average_service_minutes`.
    pub eta_minutes: u32,
}

/// The queue ordering & state engine.
///
/// One engine instance serves all scopes of an office deployment. All
/// mutation flows through the engine; reads are snapshots safe at arbitrary
/// concurrency.
pub struct QueueEngine {
    store: TicketStore,
    numbering: NumberingAuthority,
    notifier: EventNotifier,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    /// Which ticket each counter is currently serving.
    assignments: RwLock<HashMap<(Scope, CounterId), TicketId>>,
}

impl QueueEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            store: TicketStore::new(),
            numbering: NumberingAuthority::new(),
            notifier: EventNotifier::new(config.event_capacity()),
            clock,
            config,
            assignments: RwLock::new(HashMap::new()),
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the ticket store, for the query layer.
    #[must_use]
    pub const fn store(&self) -> &TicketStore {
        &self.store
    }

    // ========================================================================
    // Booking intake
    // ========================================================================

    /// Book a ticket: issue the next queue number, create the ticket in
    /// `Waiting`, and emit `TicketCreated`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::DuplicateTicket`] on the (practically
    /// impossible) collision of two random ticket ids.
    pub async fn book(&self, request: BookingRequest) -> Result<Ticket, QueueError> {
        let queue_number = self.numbering.issue(&request.scope);
        let now = self.clock.now();
        let ticket = Ticket::new(
            TicketId::new(),
            queue_number,
            request.scope,
            request.service,
            request.requested_slot,
            request.priority,
            request.owner,
            request.purpose,
            now,
        );

        self.store.insert(ticket.clone()).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            scope = %ticket.scope,
            number = %ticket.queue_number,
            service = %ticket.service,
            priority = %ticket.priority,
            "ticket booked"
        );

        self.notifier
            .publish(&QueueEvent::TicketCreated {
                ticket_id: ticket.id,
                scope: ticket.scope.clone(),
                queue_number: ticket.queue_number,
                service: ticket.service,
                priority: ticket.priority,
                at: now,
            })
            .await;

        Ok(ticket)
    }

    // ========================================================================
    // Staff action surface
    // ========================================================================

    /// Call the next waiting ticket to the default counter.
    ///
    /// # Errors
    ///
    /// - [`QueueError::CounterBusy`] — a ticket is already in progress there
    /// - [`QueueError::EmptyQueue`] — nothing is waiting
    pub async fn call_next(&self, scope: &Scope) -> Result<Ticket, QueueError> {
        self.call_next_at(scope, &CounterId::default()).await
    }

    /// Call the next waiting ticket to a specific counter.
    ///
    /// Selection follows the service order: urgent tickets first, FIFO by
    /// queue number within equal priority. At most one ticket is in progress
    /// per (scope, counter).
    ///
    /// # Errors
    ///
    /// - [`QueueError::CounterBusy`] — a ticket is already in progress there
    /// - [`QueueError::EmptyQueue`] — nothing is waiting
    pub async fn call_next_at(
        &self,
        scope: &Scope,
        counter: &CounterId,
    ) -> Result<Ticket, QueueError> {
        // The assignments lock is held across candidate selection and the
        // call commit, serializing concurrent call-next attempts.
        let mut assignments = self.assignments.write().await;

        let key = (scope.clone(), counter.clone());
        if let Some(active) = assignments.get(&key) {
            return Err(QueueError::CounterBusy {
                counter: counter.clone(),
                active: *active,
            });
        }

        let mut waiting = self
            .store
            .list(
                &ListFilter::new()
                    .with_scope(scope.clone())
                    .with_status(TicketStatus::Waiting),
            )
            .await;
        waiting.sort_by(service_order);

        for candidate in waiting {
            let action = TicketAction::Call(counter.clone());
            let now = self.clock.now();
            match self
                .store
                .update(candidate.id, None, |ticket| ticket.apply(action, now))
                .await
            {
                Ok((ticket, event)) => {
                    assignments.insert(key, ticket.id);
                    drop(assignments);
                    tracing::info!(
                        ticket_id = %ticket.id,
                        scope = %scope,
                        counter = %counter,
                        number = %ticket.queue_number,
                        "ticket called"
                    );
                    self.notifier.publish(&event).await;
                    return Ok(ticket);
                }
                // The candidate left Waiting between snapshot and commit
                // (e.g. a concurrent cancel); try the next one.
                Err(QueueError::IllegalTransition { .. }) => continue,
                Err(other) => return Err(other),
            }
        }

        Err(QueueError::EmptyQueue(scope.clone()))
    }

    /// Complete service for an in-progress ticket.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotFound`] — unknown ticket
    /// - [`QueueError::IllegalTransition`] — ticket is not in progress
    /// - [`QueueError::Conflict`] — lost a race with another mutation; re-read
    ///   and retry
    pub async fn mark_served(&self, id: TicketId) -> Result<Ticket, QueueError> {
        self.transition(id, TicketAction::Serve).await
    }

    /// Mark an in-progress ticket a no-show.
    ///
    /// Only a ticket that has been called can fail to appear; a `Waiting`
    /// ticket cannot be no-showed (cancel it instead).
    ///
    /// # Errors
    ///
    /// Same as [`QueueEngine::mark_served`].
    pub async fn mark_no_show(&self, id: TicketId) -> Result<Ticket, QueueError> {
        self.transition(id, TicketAction::NoShow).await
    }

    /// Cancel a waiting or in-progress ticket.
    ///
    /// # Errors
    ///
    /// Same as [`QueueEngine::mark_served`], with [`QueueError::IllegalTransition`]
    /// for tickets already terminal.
    pub async fn cancel(&self, id: TicketId) -> Result<Ticket, QueueError> {
        self.transition(id, TicketAction::Cancel).await
    }

    async fn transition(
        &self,
        id: TicketId,
        action: TicketAction,
    ) -> Result<Ticket, QueueError> {
        let (before, version) = self.store.get_versioned(id).await?;
        let now = self.clock.now();
        let (ticket, event) = self
            .store
            .update(id, Some(version), |ticket| ticket.apply(action, now))
            .await?;

        // A ticket leaving InProgress frees its counter.
        if before.status == TicketStatus::InProgress {
            self.release_counter(&before.scope, id).await;
        }

        tracing::info!(
            ticket_id = %ticket.id,
            scope = %ticket.scope,
            status = %ticket.status,
            "ticket transitioned"
        );
        self.notifier.publish(&event).await;
        Ok(ticket)
    }

    async fn release_counter(&self, scope: &Scope, id: TicketId) {
        let mut assignments = self.assignments.write().await;
        assignments.retain(|(s, _), active| !(s == scope && *active == id));
    }

    // ========================================================================
    // Student-facing reads
    // ========================================================================

    /// Get a snapshot of a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] for an unknown id.
    pub async fn get(&self, id: TicketId) -> Result<Ticket, QueueError> {
        self.store.get(id).await
    }

    /// Estimate a ticket's position and wait time.
    ///
    /// Position counts active tickets ordered ahead under the service order;
    /// a ticket being served is at position 0. The wait estimate multiplies
    /// the position by the configured average service time.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotFound`] — unknown ticket
    /// - [`QueueError::NotWaiting`] — the ticket is terminal; its position is
    ///   undefined, not zero
    pub async fn estimate(&self, id: TicketId) -> Result<Estimate, QueueError> {
        let ticket = self.store.get(id).await?;
        if ticket.status.is_terminal() {
            return Err(QueueError::NotWaiting {
                ticket_id: id,
                status: ticket.status,
            });
        }

        let position = if ticket.status == TicketStatus::InProgress {
            0
        } else {
            let active = self
                .store
                .list(&ListFilter::new().with_scope(ticket.scope.clone()))
                .await;
            active
                .iter()
                .filter(|other| other.status.is_active() && other.id != id)
                .filter(|other| service_order(other, &ticket) == std::cmp::Ordering::Less)
                .count()
        };

        let eta_minutes = u32::try_from(position)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config.average_service_minutes());

        Ok(Estimate {
            position,
            eta_minutes,
        })
    }

    /// List tickets matching a filter as one stable snapshot.
    pub async fn list(&self, filter: &ListFilter) -> Vec<Ticket> {
        self.store.list(filter).await
    }

    /// The last queue number issued for a scope, if any.
    #[must_use]
    pub fn last_issued_number(&self, scope: &Scope) -> Option<QueueNumber> {
        self.numbering.last_issued(scope)
    }

    // ========================================================================
    // Event subscription
    // ========================================================================

    /// Subscribe to a scope's domain events.
    ///
    /// Only events published after this call are delivered; snapshot the
    /// store first for history.
    pub async fn subscribe(&self, scope: &Scope) -> broadcast::Receiver<QueueEvent> {
        self.notifier.subscribe(scope).await
    }
}

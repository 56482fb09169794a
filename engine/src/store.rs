//! The ticket store: sole owner of canonical ticket state.
//!
//! All mutation passes through [`TicketStore::update`], which serializes
//! writes on a single lock and commits all-or-nothing: the mutation runs
//! against a clone and only a successful result is written back, so a failed
//! transition never leaves a ticket half-updated.
//!
//! # Concurrency
//!
//! Reads (`get`, `list`) take the read lock and return cloned snapshots —
//! callers never observe a torn ticket and never hold the lock beyond the
//! copy. Writers hold the exclusive lock only for the duration of one
//! validate-and-commit, never across awaits.
//!
//! An update may additionally name the [`Version`] it read; if another writer
//! committed in between, the update is rejected with
//! [`QueueError::Conflict`] instead of silently overwriting the concurrent
//! transition. Passing `None` opts into plain internal serialization.

use deskline_core::event::QueueEvent;
use deskline_core::scope::Scope;
use deskline_core::types::{
    OwnerRef, ServiceType, Ticket, TicketId, TicketStatus, Version,
};
use deskline_core::QueueError;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A ticket plus its optimistic-concurrency version.
#[derive(Clone, Debug)]
struct StoredTicket {
    ticket: Ticket,
    version: Version,
}

/// Filter for [`TicketStore::list`].
///
/// Unset fields match everything.
///
/// # Example
///
/// ```
/// use deskline_engine::ListFilter;
/// use deskline_core::types::TicketStatus;
///
/// let filter = ListFilter::new().with_status(TicketStatus::Waiting);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    scope: Option<Scope>,
    status: Option<TicketStatus>,
    service: Option<ServiceType>,
    owner: Option<OwnerRef>,
}

impl ListFilter {
    /// An empty filter matching every ticket.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scope: None,
            status: None,
            service: None,
            owner: None,
        }
    }

    /// Restrict to one scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Restrict to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to one service type.
    #[must_use]
    pub const fn with_service(mut self, service: ServiceType) -> Self {
        self.service = Some(service);
        self
    }

    /// Restrict to tickets booked by one caller.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerRef) -> Self {
        self.owner = Some(owner);
        self
    }

    fn matches(&self, ticket: &Ticket) -> bool {
        self.scope.as_ref().is_none_or(|s| &ticket.scope == s)
            && self.status.is_none_or(|s| ticket.status == s)
            && self.service.is_none_or(|s| ticket.service == s)
            && self.owner.as_ref().is_none_or(|o| &ticket.owner == o)
    }
}

/// Durable keyed collection of tickets.
///
/// Tickets are never removed; terminal tickets stay visible for the query
/// layer. An office-day boundary starts a fresh numbering scope but the
/// store keeps history across scopes.
#[derive(Debug, Default)]
pub struct TicketStore {
    inner: RwLock<HashMap<TicketId, StoredTicket>>,
}

impl TicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a freshly booked ticket.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::DuplicateTicket`] if the id is already present.
    pub async fn insert(&self, ticket: Ticket) -> Result<(), QueueError> {
        let mut inner = self.inner.write().await;
        if inner.contains_key(&ticket.id) {
            return Err(QueueError::DuplicateTicket(ticket.id));
        }
        tracing::debug!(ticket_id = %ticket.id, scope = %ticket.scope, number = %ticket.queue_number, "ticket stored");
        inner.insert(
            ticket.id,
            StoredTicket {
                ticket,
                version: Version::default(),
            },
        );
        Ok(())
    }

    /// Get a snapshot of a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] for an unknown id.
    pub async fn get(&self, id: TicketId) -> Result<Ticket, QueueError> {
        let inner = self.inner.read().await;
        inner
            .get(&id)
            .map(|stored| stored.ticket.clone())
            .ok_or(QueueError::NotFound(id))
    }

    /// Get a snapshot of a ticket together with its current version.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] for an unknown id.
    pub async fn get_versioned(&self, id: TicketId) -> Result<(Ticket, Version), QueueError> {
        let inner = self.inner.read().await;
        inner
            .get(&id)
            .map(|stored| (stored.ticket.clone(), stored.version))
            .ok_or(QueueError::NotFound(id))
    }

    /// Atomically mutate one ticket.
    ///
    /// The mutation runs on a clone; only a successful result commits, and
    /// commit bumps the version. With `expected = Some(v)`, a stored version
    /// other than `v` rejects the update before the mutation runs.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotFound`] — unknown id
    /// - [`QueueError::Conflict`] — `expected` names a stale version
    /// - whatever the mutation itself returns (e.g.
    ///   [`QueueError::IllegalTransition`]); state is untouched in that case
    pub async fn update<F>(
        &self,
        id: TicketId,
        expected: Option<Version>,
        mutation: F,
    ) -> Result<(Ticket, QueueEvent), QueueError>
    where
        F: FnOnce(&mut Ticket) -> Result<QueueEvent, QueueError>,
    {
        let mut inner = self.inner.write().await;
        let stored = inner.get_mut(&id).ok_or(QueueError::NotFound(id))?;

        if let Some(expected) = expected {
            if expected != stored.version {
                return Err(QueueError::Conflict {
                    ticket_id: id,
                    expected,
                    actual: stored.version,
                });
            }
        }

        let mut candidate = stored.ticket.clone();
        let event = mutation(&mut candidate)?;

        stored.ticket = candidate;
        stored.version = stored.version.next();
        tracing::debug!(
            ticket_id = %id,
            status = %stored.ticket.status,
            version = %stored.version,
            "ticket updated"
        );
        Ok((stored.ticket.clone(), event))
    }

    /// List tickets matching a filter as one stable snapshot.
    ///
    /// Taken under the read lock, so the result never interleaves with a
    /// concurrent write (no torn reads). Order is unspecified; callers sort.
    pub async fn list(&self, filter: &ListFilter) -> Vec<Ticket> {
        let inner = self.inner.read().await;
        inner
            .values()
            .filter(|stored| filter.matches(&stored.ticket))
            .map(|stored| stored.ticket.clone())
            .collect()
    }

    /// Number of tickets in the store, across all scopes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no tickets at all.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use deskline_core::transition::TicketAction;
    use deskline_core::types::{CounterId, Priority, QueueNumber};

    fn scope() -> Scope {
        Scope::new("registrar", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn ticket(number: u32) -> Ticket {
        Ticket::new(
            TicketId::new(),
            QueueNumber::new(number),
            scope(),
            ServiceType::DocumentRequest,
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            Priority::Standard,
            OwnerRef::new("student-1"),
            None,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = TicketStore::new();
        let t = ticket(1);
        let id = t.id;
        store.insert(t.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), t);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let store = TicketStore::new();
        let id = TicketId::new();
        assert_eq!(store.get(id).await.unwrap_err(), QueueError::NotFound(id));
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = TicketStore::new();
        let t = ticket(1);
        store.insert(t.clone()).await.unwrap();
        assert_eq!(
            store.insert(t.clone()).await.unwrap_err(),
            QueueError::DuplicateTicket(t.id)
        );
    }

    #[tokio::test]
    async fn update_commits_and_bumps_version() {
        let store = TicketStore::new();
        let t = ticket(1);
        let id = t.id;
        store.insert(t).await.unwrap();

        let (updated, event) = store
            .update(id, None, |ticket| {
                ticket.apply(TicketAction::Call(CounterId::default()), Utc::now())
            })
            .await
            .unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(event.status(), TicketStatus::InProgress);

        let (_, version) = store.get_versioned(id).await.unwrap();
        assert_eq!(version, Version::new(1));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_state_untouched() {
        let store = TicketStore::new();
        let t = ticket(1);
        let id = t.id;
        store.insert(t.clone()).await.unwrap();

        // serve on a Waiting ticket is illegal
        let err = store
            .update(id, None, |ticket| {
                ticket.apply(TicketAction::Serve, Utc::now())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::IllegalTransition { .. }));

        let (stored, version) = store.get_versioned(id).await.unwrap();
        assert_eq!(stored, t);
        assert_eq!(version, Version::default());
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let store = TicketStore::new();
        let t = ticket(1);
        let id = t.id;
        store.insert(t).await.unwrap();

        let (_, version) = store.get_versioned(id).await.unwrap();

        // First writer wins
        store
            .update(id, Some(version), |ticket| {
                ticket.apply(TicketAction::Call(CounterId::default()), Utc::now())
            })
            .await
            .unwrap();

        // Second writer raced with the same version
        let err = store
            .update(id, Some(version), |ticket| {
                ticket.apply(TicketAction::Cancel, Utc::now())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::Conflict { .. }));

        // The raced cancel did not commit
        let current = store.get(id).await.unwrap();
        assert_eq!(current.status, TicketStatus::InProgress);
    }

    #[tokio::test]
    async fn list_filters_by_scope_status_service_owner() {
        let store = TicketStore::new();
        let mut a = ticket(1);
        a.service = ServiceType::PaymentProcessing;
        let b = ticket(2);
        let mut c = ticket(3);
        c.scope = Scope::new("cashier", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        c.owner = OwnerRef::new("student-2");
        for t in [a.clone(), b.clone(), c.clone()] {
            store.insert(t).await.unwrap();
        }

        let in_scope = store
            .list(&ListFilter::new().with_scope(scope()))
            .await;
        assert_eq!(in_scope.len(), 2);

        let payments = store
            .list(&ListFilter::new().with_service(ServiceType::PaymentProcessing))
            .await;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, a.id);

        let by_owner = store
            .list(&ListFilter::new().with_owner(OwnerRef::new("student-2")))
            .await;
        assert_eq!(by_owner.len(), 1);
        assert_eq!(by_owner[0].id, c.id);

        let waiting = store
            .list(&ListFilter::new().with_status(TicketStatus::Waiting))
            .await;
        assert_eq!(waiting.len(), 3);
    }
}

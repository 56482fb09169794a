//! Fixture builders for queue tests.

use chrono::{NaiveDate, NaiveTime};
use deskline_core::scope::Scope;
use deskline_core::types::{OwnerRef, Priority, ServiceType};
use deskline_engine::BookingRequest;

/// The conventional test scope: `registrar/2024-05-01`.
#[must_use]
pub fn test_scope() -> Scope {
    Scope::new("registrar", test_date())
}

/// The conventional test date: 2024-05-01.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
}

/// Builder producing [`BookingRequest`] fixtures with sensible defaults.
///
/// # Example
///
/// ```
/// use deskline_testing::BookingBuilder;
/// use deskline_core::types::Priority;
///
/// let request = BookingBuilder::new().priority(Priority::Urgent).build();
/// assert_eq!(request.priority, Priority::Urgent);
/// ```
#[derive(Debug, Clone)]
pub struct BookingBuilder {
    scope: Scope,
    service: ServiceType,
    requested_slot: NaiveTime,
    priority: Priority,
    owner: OwnerRef,
    purpose: Option<String>,
}

impl Default for BookingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingBuilder {
    /// A standard document-request booking at `registrar/2024-05-01`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scope: test_scope(),
            service: ServiceType::DocumentRequest,
            requested_slot: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default(),
            priority: Priority::Standard,
            owner: OwnerRef::new("student-1"),
            purpose: None,
        }
    }

    /// Override the scope.
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Override the service type.
    #[must_use]
    pub const fn service(mut self, service: ServiceType) -> Self {
        self.service = service;
        self
    }

    /// Override the advisory time slot.
    #[must_use]
    pub const fn requested_slot(mut self, slot: NaiveTime) -> Self {
        self.requested_slot = slot;
        self
    }

    /// Override the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Override the owner.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = OwnerRef::new(owner);
        self
    }

    /// Attach a purpose annotation.
    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Build the request.
    #[must_use]
    pub fn build(self) -> BookingRequest {
        let mut request = BookingRequest::new(
            self.scope,
            self.service,
            self.requested_slot,
            self.owner,
        )
        .with_priority(self.priority);
        if let Some(purpose) = self.purpose {
            request = request.with_purpose(purpose);
        }
        request
    }
}

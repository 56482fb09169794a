//! Domain types for the Deskline queue engine.
//!
//! Value objects and the [`Ticket`] entity: the unit of queue membership. A
//! ticket is created in [`TicketStatus::Waiting`] by a booking request and is
//! only mutated afterwards through state-machine validated transitions (see
//! [`crate::transition`]). Tickets are never deleted; terminal tickets remain
//! visible to the query layer.

use crate::scope::Scope;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket.
///
/// Opaque, assigned at creation, immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque back-reference to the caller that booked a ticket.
///
/// The engine stores the identity but owns no caller data; authentication and
/// authorization are external collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef(String);

impl OwnerRef {
    /// Create a new `OwnerRef` from an opaque identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a service counter.
///
/// A counter is a single service point holding at most one
/// [`TicketStatus::InProgress`] ticket at a time. Single-counter offices use
/// [`CounterId::default`]; multi-counter offices name one per station.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterId(String);

impl CounterId {
    /// Create a new `CounterId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the counter id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CounterId {
    fn default() -> Self {
        Self("counter-1".to_string())
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Queue number and version
// ============================================================================

/// A sequential queue number, unique and strictly increasing within a scope.
///
/// Assigned exactly once by the numbering authority; never reused or
/// reassigned. Numbering starts at 1 for a fresh scope.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct QueueNumber(u32);

impl QueueNumber {
    /// Create a `QueueNumber` from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The number issued after this one. Saturates at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for QueueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optimistic-concurrency token for a stored ticket.
///
/// Every committed mutation bumps the version; an update that names a stale
/// expected version is rejected with a conflict instead of silently
/// overwriting a concurrent transition.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// Create a `Version` from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The version after one more committed mutation. Saturates at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// The closed set of services an office queue handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Help with enrollment and registration.
    EnrollmentAssistance,
    /// Transcript and certificate requests.
    DocumentRequest,
    /// Scholarship application processing.
    ScholarshipApplication,
    /// Fee and tuition payments.
    PaymentProcessing,
    /// Anything else.
    GeneralInquiry,
}

impl ServiceType {
    /// All service types, in display order.
    pub const ALL: [Self; 5] = [
        Self::EnrollmentAssistance,
        Self::DocumentRequest,
        Self::ScholarshipApplication,
        Self::PaymentProcessing,
        Self::GeneralInquiry,
    ];
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnrollmentAssistance => "Enrollment Assistance",
            Self::DocumentRequest => "Document Request",
            Self::ScholarshipApplication => "Scholarship Application",
            Self::PaymentProcessing => "Payment Processing",
            Self::GeneralInquiry => "General Inquiry",
        };
        write!(f, "{name}")
    }
}

/// Booking priority.
///
/// Priority never changes the issued queue number; it only affects the
/// service order used by call-next and the position estimator (`Urgent`
/// before `Standard`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Normal walk-up booking.
    #[default]
    Standard,
    /// Served ahead of standard bookings.
    Urgent,
}

impl Priority {
    /// Sort key for service order: lower ranks are served first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::Standard => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

/// Lifecycle state of a ticket.
///
/// `Served`, `NoShow`, and `Cancelled` are terminal: once reached, every
/// further transition attempt is rejected and the ticket is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Booked, not yet called.
    Waiting,
    /// Called to a counter, currently being served.
    InProgress,
    /// Service completed.
    Served,
    /// Called but never appeared.
    NoShow,
    /// Withdrawn before completion.
    Cancelled,
}

impl TicketStatus {
    /// Whether this status permits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Served | Self::NoShow | Self::Cancelled)
    }

    /// Whether a ticket in this status still occupies the queue
    /// (`Waiting` or `InProgress`).
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Waiting | Self::InProgress)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "Waiting",
            Self::InProgress => "In Progress",
            Self::Served => "Served",
            Self::NoShow => "No Show",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// A single booking's queue membership record.
///
/// Timestamps are set exactly once, each by the transition that owns it:
/// `created_at` at booking, `called_at` by *call*, `served_at` by *serve*,
/// `closed_at` by *cancel* or *no-show*.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique opaque identifier, immutable.
    pub id: TicketId,
    /// Sequential number within the scope, assigned once.
    pub queue_number: QueueNumber,
    /// The (office, date) partition this ticket belongs to.
    pub scope: Scope,
    /// Requested service.
    pub service: ServiceType,
    /// Time-of-day chosen at booking. Advisory only; never affects ordering.
    pub requested_slot: NaiveTime,
    /// Booking priority.
    pub priority: Priority,
    /// Current lifecycle state.
    pub status: TicketStatus,
    /// Opaque identity of the booking caller.
    pub owner: OwnerRef,
    /// Optional free-text annotation. No semantic effect.
    pub purpose: Option<String>,
    /// When the ticket was booked.
    pub created_at: DateTime<Utc>,
    /// When the ticket was called to a counter, if ever.
    pub called_at: Option<DateTime<Utc>>,
    /// When service completed, if it did.
    pub served_at: Option<DateTime<Utc>>,
    /// When the ticket was cancelled or marked a no-show, if it was.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Create a fresh `Waiting` ticket.
    ///
    /// This is the only constructor; every later change goes through
    /// [`Ticket::apply`](crate::transition) so the transition table is the
    /// single source of mutation.
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Booking carries exactly these fields
    pub const fn new(
        id: TicketId,
        queue_number: QueueNumber,
        scope: Scope,
        service: ServiceType,
        requested_slot: NaiveTime,
        priority: Priority,
        owner: OwnerRef,
        purpose: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            queue_number,
            scope,
            service,
            requested_slot,
            priority,
            status: TicketStatus::Waiting,
            owner,
            purpose,
            created_at,
            called_at: None,
            served_at: None,
            closed_at: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn queue_number_ordering() {
        assert!(QueueNumber::new(1) < QueueNumber::new(2));
        assert_eq!(QueueNumber::new(1).next(), QueueNumber::new(2));
        assert_eq!(QueueNumber::new(7).to_string(), "#7");
    }

    #[test]
    fn version_increments() {
        let v = Version::default();
        assert_eq!(v.value(), 0);
        assert_eq!(v.next(), Version::new(1));
    }

    #[test]
    fn next_saturates_instead_of_overflowing() {
        assert_eq!(
            QueueNumber::new(u32::MAX).next(),
            QueueNumber::new(u32::MAX)
        );
        assert_eq!(Version::new(u64::MAX).next(), Version::new(u64::MAX));
    }

    #[test]
    fn urgent_ranks_before_standard() {
        assert!(Priority::Urgent.rank() < Priority::Standard.rank());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TicketStatus::Served.is_terminal());
        assert!(TicketStatus::NoShow.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
        assert!(!TicketStatus::Waiting.is_terminal());
        assert!(!TicketStatus::InProgress.is_terminal());
    }

    #[test]
    fn active_statuses() {
        assert!(TicketStatus::Waiting.is_active());
        assert!(TicketStatus::InProgress.is_active());
        assert!(!TicketStatus::Served.is_active());
    }

    #[test]
    fn service_type_display_matches_office_signage() {
        assert_eq!(
            ServiceType::EnrollmentAssistance.to_string(),
            "Enrollment Assistance"
        );
        assert_eq!(ServiceType::GeneralInquiry.to_string(), "General Inquiry");
    }

    #[test]
    fn status_display() {
        assert_eq!(TicketStatus::InProgress.to_string(), "In Progress");
        assert_eq!(TicketStatus::NoShow.to_string(), "No Show");
    }

    #[test]
    fn default_counter_is_stable() {
        assert_eq!(CounterId::default().as_str(), "counter-1");
    }
}

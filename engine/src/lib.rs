//! Queue ordering & state engine.
//!
//! The authoritative in-process engine behind a walk-up office queue:
//! booking intake with strictly increasing per-scope queue numbers, the
//! ticket lifecycle state machine, position and wait estimation, and
//! per-scope domain-event broadcast.
//!
//! # Architecture
//!
//! - [`TicketStore`] — sole owner of canonical ticket state; serialized,
//!   all-or-nothing mutation with optimistic version checks
//! - [`NumberingAuthority`] — atomic per-scope queue number issuance
//! - [`EventNotifier`] — post-commit, best-effort per-scope broadcast
//! - [`service_order`] — the one comparator shared by call-next and the
//!   estimator, so the calling order always matches displayed positions
//! - [`QueueEngine`] — the facade wiring these together
//!
//! # Example
//!
//! ```
//! use deskline_engine::{BookingRequest, QueueEngine};
//! use deskline_core::scope::Scope;
//! use deskline_core::types::{OwnerRef, ServiceType};
//! use deskline_core::clock::SystemClock;
//! use chrono::{NaiveDate, NaiveTime};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), deskline_core::QueueError> {
//! let engine = QueueEngine::new(Arc::new(SystemClock));
//! let scope = Scope::new("registrar", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//!
//! let ticket = engine
//!     .book(BookingRequest::new(
//!         scope.clone(),
//!         ServiceType::DocumentRequest,
//!         NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
//!         OwnerRef::new("student-42"),
//!     ))
//!     .await?;
//!
//! let called = engine.call_next(&scope).await?;
//! assert_eq!(called.id, ticket.id);
//! engine.mark_served(ticket.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod notifier;
pub mod numbering;
pub mod ordering;
pub mod store;

pub use config::EngineConfig;
pub use engine::{BookingRequest, Estimate, QueueEngine};
pub use notifier::EventNotifier;
pub use numbering::NumberingAuthority;
pub use ordering::service_order;
pub use store::{ListFilter, TicketStore};

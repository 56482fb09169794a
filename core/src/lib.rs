//! # Deskline Core
//!
//! Domain types, state machine, and events for the Deskline queue ordering &
//! state engine.
//!
//! The engine models a walk-up service queue for an office handling a fixed
//! set of service types. Students book a ticket and receive a sequential
//! queue number; staff advance the queue by calling, serving, or marking
//! no-shows; read-only projections aggregate live counts and daily
//! statistics.
//!
//! ## What lives here
//!
//! - [`scope`] — the (office, date) partition within which numbering and
//!   ordering are independent
//! - [`types`] — the [`Ticket`](types::Ticket) record and its value objects
//! - [`transition`] — the closed state machine (`Waiting → InProgress →
//!   Served`, with cancel and no-show paths)
//! - [`event`] — domain events published after each committed transition
//! - [`error`] — the full error taxonomy
//! - [`clock`] — injected time
//!
//! The mutable machinery (ticket store, numbering authority, notifier,
//! engine facade) lives in `deskline-engine`; read-only aggregation in
//! `deskline-projections`.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod clock;
pub mod error;
pub mod event;
pub mod scope;
pub mod transition;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::QueueError;
pub use event::{Event, QueueEvent};
pub use scope::Scope;
pub use transition::TicketAction;
pub use types::{
    CounterId, OwnerRef, Priority, QueueNumber, ServiceType, Ticket, TicketId, TicketStatus,
    Version,
};

//! The service order: the one definition of "who is ahead".
//!
//! Call-next and the position estimator share this comparator so the order
//! staff call tickets in always matches the positions students are shown.
//!
//! Among active tickets: `InProgress` first (already being served), then
//! `Waiting` tickets with `Urgent` priority before `Standard`, and within
//! equal priority ascending queue number (FIFO). The queue number itself is
//! never affected by priority.

use deskline_core::types::{Ticket, TicketStatus};
use std::cmp::Ordering;

const fn status_rank(status: TicketStatus) -> u8 {
    match status {
        TicketStatus::InProgress => 0,
        TicketStatus::Waiting => 1,
        // Terminal tickets never participate; rank them last for totality.
        TicketStatus::Served | TicketStatus::NoShow | TicketStatus::Cancelled => 2,
    }
}

/// Compare two tickets by service order.
#[must_use]
pub fn service_order(a: &Ticket, b: &Ticket) -> Ordering {
    status_rank(a.status)
        .cmp(&status_rank(b.status))
        .then(a.priority.rank().cmp(&b.priority.rank()))
        .then(a.queue_number.cmp(&b.queue_number))
}

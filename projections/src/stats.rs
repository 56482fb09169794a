//! Per-day aggregate statistics for an office scope.

use deskline_core::scope::Scope;
use deskline_core::types::TicketStatus;
use deskline_engine::{ListFilter, TicketStore};

/// Aggregate figures for one (office, date) scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct DailyStats {
    /// Tickets booked, regardless of outcome.
    pub booked: usize,
    /// Tickets that completed service.
    pub served: usize,
    /// Tickets marked no-show.
    pub no_shows: usize,
    /// Tickets cancelled by their owner.
    pub cancellations: usize,
    /// Mean minutes from booking to being called, across every ticket that
    /// was called. `None` when no ticket has been called yet.
    pub average_wait_minutes: Option<f64>,
    /// `served / booked`; zero for an empty day.
    pub completion_rate: f64,
}

/// Compute a scope's aggregate statistics from one store snapshot.
#[allow(clippy::cast_precision_loss)]
pub async fn daily_stats(store: &TicketStore, scope: &Scope) -> DailyStats {
    let tickets = store
        .list(&ListFilter::new().with_scope(scope.clone()))
        .await;

    let booked = tickets.len();
    let served = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Served)
        .count();
    let no_shows = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::NoShow)
        .count();
    let cancellations = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Cancelled)
        .count();

    let waits: Vec<f64> = tickets
        .iter()
        .filter_map(|t| {
            t.called_at
                .map(|called| (called - t.created_at).num_seconds() as f64 / 60.0)
        })
        .collect();
    let average_wait_minutes = if waits.is_empty() {
        None
    } else {
        Some(waits.iter().sum::<f64>() / waits.len() as f64)
    };

    let completion_rate = if booked == 0 {
        0.0
    } else {
        served as f64 / booked as f64
    };

    tracing::debug!(scope = %scope, booked, served, "daily stats computed");

    DailyStats {
        booked,
        served,
        no_shows,
        cancellations,
        average_wait_minutes,
        completion_rate,
    }
}

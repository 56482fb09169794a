//! Engine configuration.

use std::time::Duration;

/// Configuration for a [`QueueEngine`](crate::QueueEngine).
///
/// # Example
///
/// ```
/// use deskline_engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_average_service_minutes(7)
///     .with_event_capacity(256);
/// assert_eq!(config.average_service_minutes(), 7);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Minutes of service time assumed per ticket when estimating waits.
    average_service_minutes: u32,
    /// Capacity of each scope's event broadcast channel. Subscribers that lag
    /// beyond this see a `Lagged` error and should re-snapshot.
    event_capacity: usize,
}

impl EngineConfig {
    /// Observed per-ticket service time used for wait estimates.
    pub const DEFAULT_AVERAGE_SERVICE_MINUTES: u32 = 5;

    /// Default broadcast capacity per scope.
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    /// Create a config with the defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            average_service_minutes: Self::DEFAULT_AVERAGE_SERVICE_MINUTES,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Set the per-ticket average service time, in minutes.
    #[must_use]
    pub const fn with_average_service_minutes(mut self, minutes: u32) -> Self {
        self.average_service_minutes = minutes;
        self
    }

    /// Set the per-scope event broadcast capacity.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// The per-ticket average service time, in minutes.
    #[must_use]
    pub const fn average_service_minutes(&self) -> u32 {
        self.average_service_minutes
    }

    /// The per-ticket average service time, as a [`Duration`].
    #[must_use]
    pub const fn average_service_time(&self) -> Duration {
        Duration::from_secs(self.average_service_minutes as u64 * 60)
    }

    /// The per-scope event broadcast capacity.
    #[must_use]
    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_service_time() {
        let config = EngineConfig::default();
        assert_eq!(config.average_service_minutes(), 5);
        assert_eq!(config.event_capacity(), 64);
    }

    #[test]
    fn builder_overrides() {
        let config = EngineConfig::new()
            .with_average_service_minutes(10)
            .with_event_capacity(8);
        assert_eq!(config.average_service_minutes(), 10);
        assert_eq!(config.average_service_time(), Duration::from_secs(600));
        assert_eq!(config.event_capacity(), 8);
    }
}

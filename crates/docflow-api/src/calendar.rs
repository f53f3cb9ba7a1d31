//! Stand-in calendar for deployments without a calendar integration.

use async_trait::async_trait;
use chrono::NaiveDate;
use docflow_core::availability::{Availability, AvailabilityCalendar};
use rand::Rng;
use tracing::debug;

/// Share of slots a simulated calendar reports as free.
pub const DEFAULT_AVAILABLE_RATIO: f64 = 0.7;

/// Reports a slot as available with a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedCalendar {
    available_ratio: f64,
}

impl SimulatedCalendar {
    /// Creates a calendar that reports `available_ratio` of slots as free.
    /// The ratio is clamped to `0.0..=1.0`; NaN counts as `0.0`.
    #[must_use]
    pub fn new(available_ratio: f64) -> Self {
        let available_ratio = if available_ratio.is_nan() {
            0.0
        } else {
            available_ratio.clamp(0.0, 1.0)
        };
        Self { available_ratio }
    }
}

impl Default for SimulatedCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_AVAILABLE_RATIO)
    }
}

#[async_trait]
impl AvailabilityCalendar for SimulatedCalendar {
    async fn check_availability(&self, date: NaiveDate, time: &str) -> Availability {
        let free = rand::rng().random_bool(self.available_ratio);
        debug!(%date, time, free, "simulated availability check");
        if free {
            Availability::Available
        } else {
            Availability::Busy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[tokio::test]
    async fn test_ratio_bounds_are_deterministic() {
        let always = SimulatedCalendar::new(1.0);
        let never = SimulatedCalendar::new(0.0);

        for _ in 0..20 {
            assert_eq!(always.check_availability(date(), "09:00").await, Availability::Available);
            assert_eq!(never.check_availability(date(), "09:00").await, Availability::Busy);
        }
    }

    #[tokio::test]
    async fn test_out_of_range_ratio_is_clamped() {
        let calendar = SimulatedCalendar::new(7.0);

        assert_eq!(calendar.check_availability(date(), "09:00").await, Availability::Available);
        assert_eq!(SimulatedCalendar::new(f64::NAN).available_ratio, 0.0);
    }
}

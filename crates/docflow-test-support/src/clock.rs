//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, NaiveDate, Utc};
use docflow_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock fixed at 10:00 UTC on `date`.
    ///
    /// # Panics
    ///
    /// Never panics for a valid `NaiveDate`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(10, 0, 0).unwrap().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

//! Calendar availability port.
//!
//! Booking checks go through this trait so the workflow never decides
//! availability itself. Production wires a calendar integration (or a
//! simulation of one); tests inject a fixed or scripted calendar.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of an availability check for one time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// The slot is free and has been tentatively held.
    Available,
    /// The slot clashes with an existing booking.
    Busy,
}

/// Abstraction over an external calendar.
#[async_trait]
pub trait AvailabilityCalendar: Send + Sync {
    /// Checks whether the slot at `date` / `time` is free.
    async fn check_availability(&self, date: NaiveDate, time: &str) -> Availability;
}

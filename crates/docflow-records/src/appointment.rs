//! Appointment records.

use chrono::{NaiveDate, NaiveTime};
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::Record;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::status::{AppointmentStatus, MeetingType};

/// A client meeting, the first stage of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Client contact person.
    #[serde(default)]
    pub client_name: String,
    /// Client organisation.
    #[serde(default)]
    pub company_name: String,
    /// Client postal address.
    #[serde(default)]
    pub address: String,
    /// Client phone or email.
    #[serde(default)]
    pub contact: String,
    /// Service category the meeting is about.
    pub title: String,
    /// Meeting date.
    pub date: NaiveDate,
    /// Meeting time as `HH:MM`; blank when not yet fixed.
    #[serde(default)]
    pub time: String,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// In person or online.
    pub meeting_type: MeetingType,
}

impl Appointment {
    /// Returns a blank appointment with the creation defaults for `today`.
    #[must_use]
    pub fn template(today: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            company_name: String::new(),
            address: String::new(),
            contact: String::new(),
            title: catalog::DEFAULT_TITLE.to_owned(),
            date: today,
            time: String::new(),
            status: AppointmentStatus::Scheduled,
            meeting_type: MeetingType::InPerson,
        }
    }
}

impl Record for Appointment {
    const COLLECTION: CollectionName = CollectionName::Appointments;

    fn validate(&self) -> Result<(), DomainError> {
        if !self.time.is_empty() && NaiveTime::parse_from_str(&self.time, "%H:%M").is_err() {
            return Err(DomainError::Validation(format!(
                "appointment time must be HH:MM, got {:?}",
                self.time
            )));
        }
        Ok(())
    }
}

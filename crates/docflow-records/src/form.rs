//! Presentation model for editing an appointment.
//!
//! The confirmation flag records the outcome of a calendar availability
//! check. It lives only here; [`AppointmentForm::into_record`] drops it and
//! the persisted [`Appointment`] has no such field.

use docflow_core::availability::Availability;
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::status::MeetingType;

/// An appointment being edited, plus UI-only state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentForm {
    /// The record being edited.
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(default)]
    is_confirmed: bool,
}

impl AppointmentForm {
    /// Starts editing `appointment` with no confirmed slot.
    #[must_use]
    pub fn new(appointment: Appointment) -> Self {
        Self {
            appointment,
            is_confirmed: false,
        }
    }

    /// Whether the current date/time slot was confirmed by the calendar.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }

    /// Changes the meeting type. Any earlier confirmation is discarded.
    pub fn set_meeting_type(&mut self, meeting_type: MeetingType) {
        self.appointment.meeting_type = meeting_type;
        self.is_confirmed = false;
    }

    /// Records the outcome of an availability check.
    pub fn apply_availability(&mut self, availability: Availability) {
        self.is_confirmed = availability == Availability::Available;
    }

    /// Returns the persistable record, dropping UI-only state.
    #[must_use]
    pub fn into_record(self) -> Appointment {
        self.appointment
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn form() -> AppointmentForm {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        AppointmentForm::new(Appointment::template(today))
    }

    #[test]
    fn test_changing_meeting_type_resets_confirmation() {
        // Arrange
        let mut form = form();
        form.apply_availability(Availability::Available);
        assert!(form.is_confirmed());

        // Act
        form.set_meeting_type(MeetingType::Online);

        // Assert
        assert!(!form.is_confirmed());
        assert_eq!(form.appointment.meeting_type, MeetingType::Online);
    }

    #[test]
    fn test_busy_clears_confirmation() {
        let mut form = form();
        form.apply_availability(Availability::Available);

        form.apply_availability(Availability::Busy);

        assert!(!form.is_confirmed());
    }

    #[test]
    fn test_flag_serializes_on_form_but_not_on_record() {
        let mut form = form();
        form.apply_availability(Availability::Available);

        let form_json = serde_json::to_value(&form).unwrap();
        let record_json = serde_json::to_value(form.into_record()).unwrap();

        assert_eq!(form_json["isConfirmed"], true);
        assert_eq!(form_json["clientName"], "");
        assert!(record_json.get("isConfirmed").is_none());
    }
}

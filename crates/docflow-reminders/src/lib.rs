//! Docflow — follow-up reminders.
//!
//! [`derive_reminders`] is a pure function over the current appointment
//! and invoice snapshots. It is cheap enough to call on every read.

use chrono::{Days, NaiveDate};
use docflow_core::record::Stored;
use docflow_records::{Appointment, AppointmentStatus, Invoice, InvoiceStatus};
use serde::Serialize;
use uuid::Uuid;

/// What a reminder is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// A scheduled appointment happening today.
    AppointmentToday,
    /// A scheduled appointment happening tomorrow.
    AppointmentTomorrow,
    /// An invoice still awaiting payment.
    InvoiceFollowUp,
}

/// One due follow-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// What the reminder is about.
    pub kind: ReminderKind,
    /// Client the follow-up concerns.
    pub client: String,
    /// Human-readable summary.
    pub details: String,
    /// The appointment or invoice the reminder was derived from.
    pub source_id: Uuid,
}

/// Computes the due reminders for `today`.
///
/// Appointment reminders come first, then invoice reminders, each in
/// snapshot order. Only `Scheduled` appointments dated today or tomorrow
/// and `Pending` invoices of any age produce a reminder.
#[must_use]
pub fn derive_reminders(
    appointments: &[Stored<Appointment>],
    invoices: &[Stored<Invoice>],
    today: NaiveDate,
) -> Vec<Reminder> {
    let tomorrow = today.checked_add_days(Days::new(1));

    let from_appointments = appointments
        .iter()
        .filter(|stored| stored.record.status == AppointmentStatus::Scheduled)
        .filter_map(|stored| {
            let appointment = &stored.record;
            let (kind, day) = if appointment.date == today {
                (ReminderKind::AppointmentToday, "Today")
            } else if Some(appointment.date) == tomorrow {
                (ReminderKind::AppointmentTomorrow, "Tomorrow")
            } else {
                return None;
            };
            Some(Reminder {
                kind,
                client: appointment.client_name.clone(),
                details: format!("{day} at {} for {}", appointment.time, appointment.title),
                source_id: stored.id,
            })
        });

    let from_invoices = invoices
        .iter()
        .filter(|stored| stored.record.status == InvoiceStatus::Pending)
        .map(|stored| {
            let invoice = &stored.record;
            Reminder {
                kind: ReminderKind::InvoiceFollowUp,
                client: invoice.client_name.clone(),
                details: format!(
                    "Pending payment of ${} (Issued: {})",
                    invoice.total, invoice.date
                ),
                source_id: stored.id,
            }
        });

    from_appointments.chain(from_invoices).collect()
}

//! Command handlers for the lifecycle engine.
//!
//! Drafting handlers read the latest [`Ledger`]. Handlers that write check
//! the lifecycle rules against the record as committed in the
//! [`EntityStore`] and only then write. A rejected command makes no write.

use std::fmt;

use docflow_core::availability::AvailabilityCalendar;
use docflow_core::backend::Fields;
use docflow_core::clock::Clock;
use docflow_core::command::Command;
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored};
use docflow_records::{
    Appointment, AppointmentForm, Invoice, InvoiceStatus, Ledger, LedgerEntry, MeetingType,
    Quotation,
};
use docflow_store::EntityStore;
use docflow_store::codec;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{
    ChangeStatus, CheckAvailability, CreateRecord, DeleteRecord, DraftInvoice, DraftQuotation,
    RecordPayment, SaveAppointmentForm, UpdateFields,
};
use crate::domain::derivations::{
    PaymentIntent, invoice_from_quotation, payment_for_invoice, quotation_from_appointment,
};
use crate::domain::links::protected_fields;
use crate::domain::transitions::{Lifecycle, invalid, parse_transition};

fn log_command(command: &dyn Command) {
    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        collection = %command.collection(),
        "handling command"
    );
}

fn lookup<R: LedgerEntry>(ledger: &Ledger, id: Uuid) -> Result<&Stored<R>, DomainError> {
    ledger.get::<R>(id).ok_or(DomainError::RecordNotFound {
        collection: R::COLLECTION,
        id,
    })
}

fn check_collection<R: Record>(command: &dyn Command) -> Result<(), DomainError> {
    if command.collection() == R::COLLECTION {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "{} command addressed to {}",
            R::COLLECTION.singular(),
            command.collection()
        )))
    }
}

fn status_patch(status: impl fmt::Display) -> Fields {
    let mut patch = Fields::new();
    patch.insert("status".to_owned(), Value::String(status.to_string()));
    patch
}

/// Handles `CreateRecord`: validates and persists the record.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a malformed record, or the store's
/// error.
pub async fn handle_create<R: Record + fmt::Debug>(
    command: &CreateRecord<R>,
    store: &EntityStore,
) -> Result<Uuid, DomainError> {
    log_command(command);
    store.create(&command.record).await
}

/// Handles `SaveAppointmentForm`. An online meeting must have a confirmed
/// slot before it can be saved.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an unconfirmed online meeting or
/// a malformed record, or the store's error.
pub async fn handle_save_appointment_form(
    command: &SaveAppointmentForm,
    store: &EntityStore,
) -> Result<Uuid, DomainError> {
    log_command(command);
    let form = &command.form;
    if form.appointment.meeting_type == MeetingType::Online && !form.is_confirmed() {
        return Err(DomainError::Validation(
            "Check availability before saving".to_owned(),
        ));
    }
    store.create(&form.clone().into_record()).await
}

/// Handles `UpdateFields`: rejects protected fields, then lets the store
/// merge the patch into the committed record and re-validate it.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the patch touches a protected field
/// or the merged record is malformed, `DomainError::RecordNotFound` if the
/// record does not exist, or the store's error.
pub async fn handle_update_fields<R: Record>(
    command: &UpdateFields,
    store: &EntityStore,
) -> Result<(), DomainError> {
    log_command(command);
    check_collection::<R>(command)?;

    let patch = codec::strip_transient(command.patch.clone());
    if let Some(field) = protected_fields(R::COLLECTION)
        .iter()
        .find(|field| patch.contains_key(**field))
    {
        return Err(DomainError::Validation(format!(
            "{field} of a {} cannot be changed by a field update",
            R::COLLECTION.singular()
        )));
    }

    store.update::<R>(command.id, patch).await
}

/// Handles `DeleteRecord`. Linked records elsewhere are left untouched.
///
/// # Errors
///
/// Returns the store's error.
pub async fn handle_delete<R: Record>(
    command: &DeleteRecord,
    store: &EntityStore,
) -> Result<(), DomainError> {
    log_command(command);
    check_collection::<R>(command)?;
    store.delete::<R>(command.id).await
}

/// Handles `ChangeStatus` for a record kind with a status set.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` if the record does not exist,
/// `DomainError::InvalidTransition` if the transition is not allowed or
/// cannot be requested directly, or the store's error.
pub async fn handle_change_status<R: Lifecycle>(
    command: &ChangeStatus,
    store: &EntityStore,
) -> Result<R::Status, DomainError> {
    log_command(command);
    check_collection::<R>(command)?;

    let current = store.get::<R>(command.id).await?.record.status();
    let target = parse_transition::<R>(current, &command.status)?;
    if !R::settable(target) {
        return Err(invalid(R::COLLECTION, current, target));
    }

    store
        .update::<R>(command.id, status_patch(target))
        .await?;
    Ok(target)
}

/// Handles `DraftQuotation`: drafts a quotation from a scheduled
/// appointment in the ledger.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` if the appointment is not in the
/// ledger, or `DomainError::InvalidTransition` if it is not `Scheduled`.
pub fn handle_draft_quotation(
    command: &DraftQuotation,
    ledger: &Ledger,
    clock: &dyn Clock,
) -> Result<Quotation, DomainError> {
    log_command(command);
    let source = lookup::<Appointment>(ledger, command.appointment_id)?;
    quotation_from_appointment(source, clock.today())
}

/// Handles `DraftInvoice`: drafts an invoice from an accepted quotation in
/// the ledger.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` if the quotation is not in the
/// ledger, or `DomainError::InvalidTransition` if it is not `Accepted`.
pub fn handle_draft_invoice(
    command: &DraftInvoice,
    ledger: &Ledger,
    clock: &dyn Clock,
) -> Result<Invoice, DomainError> {
    log_command(command);
    let source = lookup::<Quotation>(ledger, command.quotation_id)?;
    invoice_from_quotation(source, clock.today())
}

/// Handles `RecordPayment`: marks the pending invoice `Paid` and returns
/// the receipt draft for confirmation.
///
/// # Errors
///
/// Returns `DomainError::RecordNotFound` if the invoice does not exist,
/// `DomainError::InvalidTransition` if it is not `Pending`, or the store's
/// error. On any error the invoice is left unchanged.
pub async fn handle_record_payment(
    command: &RecordPayment,
    ledger: &Ledger,
    clock: &dyn Clock,
    store: &EntityStore,
) -> Result<PaymentIntent, DomainError> {
    log_command(command);
    let source = store.get::<Invoice>(command.invoice_id).await?;
    let intent = payment_for_invoice(&source, ledger.snapshot::<Quotation>(), clock.today())?;

    store
        .update::<Invoice>(intent.invoice_id, status_patch(InvoiceStatus::Paid))
        .await?;
    info!(invoice_id = %intent.invoice_id, amount = %intent.receipt.amount, "payment recorded");
    Ok(intent)
}

/// Handles `CheckAvailability`: asks the calendar about the form's slot and
/// returns the form with its confirmation updated.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the meeting is not online or the
/// time is blank.
pub async fn handle_check_availability(
    command: &CheckAvailability,
    calendar: &dyn AvailabilityCalendar,
) -> Result<AppointmentForm, DomainError> {
    log_command(command);
    let mut form = command.form.clone();
    let appointment = &form.appointment;
    if appointment.meeting_type != MeetingType::Online {
        return Err(DomainError::Validation(
            "Availability can only be checked for online meetings.".to_owned(),
        ));
    }
    if appointment.time.trim().is_empty() {
        return Err(DomainError::Validation(
            "Please select both a date and a time before checking availability.".to_owned(),
        ));
    }

    let availability = calendar
        .check_availability(appointment.date, &appointment.time)
        .await;
    info!(
        date = %appointment.date,
        time = %appointment.time,
        ?availability,
        "availability checked"
    );
    form.apply_availability(availability);
    Ok(form)
}

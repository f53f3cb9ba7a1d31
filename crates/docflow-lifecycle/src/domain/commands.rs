//! Commands for the lifecycle engine.

use docflow_core::backend::Fields;
use docflow_core::collection::CollectionName;
use docflow_core::command::Command;
use docflow_core::record::Record;
use docflow_records::{Appointment, AppointmentForm, Invoice, Quotation};
use uuid::Uuid;

/// Command to persist a new record, free-standing or confirmed from a draft.
#[derive(Debug, Clone)]
pub struct CreateRecord<R> {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The record to create.
    pub record: R,
}

impl<R: Record + std::fmt::Debug> Command for CreateRecord<R> {
    fn command_type(&self) -> &'static str {
        "lifecycle.create_record"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        R::COLLECTION
    }
}

/// Command to change non-status, non-link fields of a record.
#[derive(Debug, Clone)]
pub struct UpdateFields {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The collection holding the record.
    pub collection: CollectionName,
    /// The record to update.
    pub id: Uuid,
    /// Partial record with the new field values.
    pub patch: Fields,
}

impl Command for UpdateFields {
    fn command_type(&self) -> &'static str {
        "lifecycle.update_fields"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        self.collection
    }
}

/// Command to delete a record. Never cascades.
#[derive(Debug, Clone)]
pub struct DeleteRecord {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The collection holding the record.
    pub collection: CollectionName,
    /// The record to delete.
    pub id: Uuid,
}

impl Command for DeleteRecord {
    fn command_type(&self) -> &'static str {
        "lifecycle.delete_record"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        self.collection
    }
}

/// Command to move a record to another status.
#[derive(Debug, Clone)]
pub struct ChangeStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The collection holding the record.
    pub collection: CollectionName,
    /// The record to transition.
    pub id: Uuid,
    /// Requested status, as spelled in storage.
    pub status: String,
}

impl Command for ChangeStatus {
    fn command_type(&self) -> &'static str {
        "lifecycle.change_status"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        self.collection
    }
}

/// Command to draft a quotation from a scheduled appointment.
#[derive(Debug, Clone)]
pub struct DraftQuotation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The source appointment.
    pub appointment_id: Uuid,
}

impl Command for DraftQuotation {
    fn command_type(&self) -> &'static str {
        "lifecycle.draft_quotation"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        Appointment::COLLECTION
    }
}

/// Command to draft an invoice from an accepted quotation.
#[derive(Debug, Clone)]
pub struct DraftInvoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The source quotation.
    pub quotation_id: Uuid,
}

impl Command for DraftInvoice {
    fn command_type(&self) -> &'static str {
        "lifecycle.draft_invoice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        Quotation::COLLECTION
    }
}

/// Command to record payment of a pending invoice.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The invoice being paid.
    pub invoice_id: Uuid,
}

impl Command for RecordPayment {
    fn command_type(&self) -> &'static str {
        "lifecycle.record_payment"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        Invoice::COLLECTION
    }
}

/// Command to check the calendar for an appointment form's slot.
#[derive(Debug, Clone)]
pub struct CheckAvailability {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form being edited.
    pub form: AppointmentForm,
}

impl Command for CheckAvailability {
    fn command_type(&self) -> &'static str {
        "lifecycle.check_availability"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        Appointment::COLLECTION
    }
}

/// Command to persist an edited appointment form.
#[derive(Debug, Clone)]
pub struct SaveAppointmentForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form to save.
    pub form: AppointmentForm,
}

impl Command for SaveAppointmentForm {
    fn command_type(&self) -> &'static str {
        "lifecycle.save_appointment_form"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn collection(&self) -> CollectionName {
        Appointment::COLLECTION
    }
}

//! Back-references between collections.
//!
//! A downstream record may name the upstream record it was drafted from.
//! The link is set once at creation and never reassigned, and deleting the
//! upstream record leaves it in place, dangling.

use docflow_core::collection::CollectionName;
use docflow_records::{Appointment, Invoice, LedgerEntry, Quotation, Receipt};
use uuid::Uuid;

/// Record kinds that carry a back-reference to an upstream record.
pub trait Linked: LedgerEntry {
    /// The upstream record kind.
    type Source: LedgerEntry;

    /// Persisted name of the back-reference field.
    const BACK_REFERENCE_FIELD: &'static str;

    /// The upstream record id, if this record was drafted from one.
    fn back_reference(&self) -> Option<Uuid>;
}

impl Linked for Quotation {
    type Source = Appointment;
    const BACK_REFERENCE_FIELD: &'static str = "appointmentId";

    fn back_reference(&self) -> Option<Uuid> {
        self.appointment_id
    }
}

impl Linked for Invoice {
    type Source = Quotation;
    const BACK_REFERENCE_FIELD: &'static str = "quoteId";

    fn back_reference(&self) -> Option<Uuid> {
        self.quote_id
    }
}

impl Linked for Receipt {
    type Source = Invoice;
    const BACK_REFERENCE_FIELD: &'static str = "invoiceId";

    fn back_reference(&self) -> Option<Uuid> {
        self.invoice_id
    }
}

/// Fields a field update may never touch in `collection`: the identifier,
/// the status (changed only through a transition) and the back-reference.
#[must_use]
pub fn protected_fields(collection: CollectionName) -> &'static [&'static str] {
    match collection {
        CollectionName::Appointments => &["id", "status"],
        CollectionName::Quotations => &["id", "status", Quotation::BACK_REFERENCE_FIELD],
        CollectionName::Invoices => &["id", "status", Invoice::BACK_REFERENCE_FIELD],
        CollectionName::Receipts => &["id", Receipt::BACK_REFERENCE_FIELD],
    }
}

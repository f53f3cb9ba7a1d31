//! Status state machines.
//!
//! | Collection   | Allowed transitions                                   |
//! |--------------|-------------------------------------------------------|
//! | appointments | Scheduled → Completed, Scheduled → Cancelled          |
//! | quotations   | Draft/Sent → Accepted, Draft/Sent → Rejected          |
//! | invoices     | Pending → Paid                                        |
//! | receipts     | none (receipts carry no status)                       |
//!
//! Everything else, including staying in the same status, is an
//! `InvalidTransition`.

use std::fmt::Display;
use std::str::FromStr;

use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_records::{
    Appointment, AppointmentStatus, Invoice, InvoiceStatus, LedgerEntry, Quotation,
    QuotationStatus,
};

/// Placeholder used as the source status for records without one.
pub const NO_STATUS: &str = "(none)";

/// Record kinds that move through a status state machine.
pub trait Lifecycle: LedgerEntry {
    /// The closed status set.
    type Status: Copy + Eq + Display + FromStr<Err = DomainError> + Send + Sync;

    /// The record's current status.
    fn status(&self) -> Self::Status;

    /// Overwrites the record's status without checking the table.
    fn set_status(&mut self, status: Self::Status);

    /// Whether `from → to` is in the transition table.
    fn allows(from: Self::Status, to: Self::Status) -> bool;

    /// Whether a plain status-change request may target `to`. Targets
    /// reached only as a side effect of another operation return `false`.
    fn settable(_to: Self::Status) -> bool {
        true
    }
}

impl Lifecycle for Appointment {
    type Status = AppointmentStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn set_status(&mut self, status: Self::Status) {
        self.status = status;
    }

    fn allows(from: Self::Status, to: Self::Status) -> bool {
        use AppointmentStatus::{Cancelled, Completed, Scheduled};
        matches!((from, to), (Scheduled, Completed | Cancelled))
    }
}

impl Lifecycle for Quotation {
    type Status = QuotationStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn set_status(&mut self, status: Self::Status) {
        self.status = status;
    }

    fn allows(from: Self::Status, to: Self::Status) -> bool {
        use QuotationStatus::{Accepted, Draft, Rejected, Sent};
        matches!((from, to), (Draft | Sent, Accepted | Rejected))
    }
}

impl Lifecycle for Invoice {
    type Status = InvoiceStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn set_status(&mut self, status: Self::Status) {
        self.status = status;
    }

    fn allows(from: Self::Status, to: Self::Status) -> bool {
        matches!((from, to), (InvoiceStatus::Pending, InvoiceStatus::Paid))
    }

    // Paid is reached only by recording a payment.
    fn settable(to: Self::Status) -> bool {
        to != InvoiceStatus::Paid
    }
}

/// Checks a typed transition.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if `from → to` is not allowed.
pub fn check_transition<R: Lifecycle>(
    from: R::Status,
    to: R::Status,
) -> Result<(), DomainError> {
    if R::allows(from, to) {
        Ok(())
    } else {
        Err(invalid(R::COLLECTION, from, to))
    }
}

/// Parses `to` as a status of `R` and checks the transition from `from`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if `to` is outside the status
/// set or the transition is not allowed.
pub fn parse_transition<R: Lifecycle>(
    from: R::Status,
    to: &str,
) -> Result<R::Status, DomainError> {
    let target = to
        .parse::<R::Status>()
        .map_err(|_| invalid(R::COLLECTION, from, to))?;
    check_transition::<R>(from, target)?;
    Ok(target)
}

/// Checks a transition given only the collection and status spellings.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if either status is outside the
/// collection's set, the collection has no statuses, or the transition is
/// not in the table.
pub fn check_transition_by_name(
    collection: CollectionName,
    from: &str,
    to: &str,
) -> Result<(), DomainError> {
    fn typed<R: Lifecycle>(from: &str, to: &str) -> Result<(), DomainError> {
        let source = from
            .parse::<R::Status>()
            .map_err(|_| invalid(R::COLLECTION, from, to))?;
        parse_transition::<R>(source, to).map(|_| ())
    }

    match collection {
        CollectionName::Appointments => typed::<Appointment>(from, to),
        CollectionName::Quotations => typed::<Quotation>(from, to),
        CollectionName::Invoices => typed::<Invoice>(from, to),
        CollectionName::Receipts => Err(invalid(collection, from, to)),
    }
}

pub(crate) fn invalid(
    collection: CollectionName,
    from: impl Display,
    to: impl Display,
) -> DomainError {
    DomainError::InvalidTransition {
        collection,
        from: from.to_string(),
        to: to.to_string(),
    }
}

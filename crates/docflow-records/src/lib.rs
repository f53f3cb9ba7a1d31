//! Docflow — entity records.
//!
//! The four persisted entity kinds (appointments, quotations, invoices and
//! receipts), their status sets, the presentation-only appointment form,
//! and the [`Ledger`] holding the latest snapshot of every collection.

pub mod appointment;
pub mod catalog;
pub mod form;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod quotation;
pub mod receipt;
pub mod status;

mod serde_util;

pub use appointment::Appointment;
pub use form::AppointmentForm;
pub use invoice::Invoice;
pub use ledger::{Ledger, LedgerEntry};
pub use money::Money;
pub use quotation::Quotation;
pub use receipt::Receipt;
pub use status::{AppointmentStatus, InvoiceStatus, MeetingType, QuotationStatus};

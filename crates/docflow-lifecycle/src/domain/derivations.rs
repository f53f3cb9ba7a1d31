//! Drafting downstream records from upstream ones.
//!
//! Each derivation borrows its source and returns a new draft. A draft is
//! not persisted; the caller confirms it through the entity store.
//!
//! A source in the wrong status is an `InvalidTransition` on the source
//! collection whose target names the collection that was to be drafted
//! (or `Paid` for payments).

use chrono::NaiveDate;
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored, find};
use docflow_records::{
    Appointment, AppointmentStatus, Invoice, InvoiceStatus, Quotation, QuotationStatus, Receipt,
};
use serde::Serialize;
use uuid::Uuid;

use super::transitions::invalid;

/// Description used when neither the quotation nor the invoice says what
/// was paid for.
pub const GENERIC_PAYMENT_DESCRIPTION: &str = "Service payment against invoice.";

/// Drafts a quotation from a scheduled appointment.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the appointment is
/// `Scheduled`.
pub fn quotation_from_appointment(
    source: &Stored<Appointment>,
    today: NaiveDate,
) -> Result<Quotation, DomainError> {
    let appointment = &source.record;
    if appointment.status != AppointmentStatus::Scheduled {
        return Err(invalid(
            Appointment::COLLECTION,
            appointment.status,
            Quotation::COLLECTION,
        ));
    }

    Ok(Quotation {
        client_name: appointment.client_name.clone(),
        company_name: appointment.company_name.clone(),
        address: appointment.address.clone(),
        contact: appointment.contact.clone(),
        items: format!(
            "Proposal for {} services, following the meeting on {}.",
            appointment.title, appointment.date
        ),
        service_type: appointment.title.clone(),
        appointment_id: Some(source.id),
        ..Quotation::template(today)
    })
}

/// Drafts an invoice from an accepted quotation. The total is copied
/// exactly.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the quotation is
/// `Accepted`.
pub fn invoice_from_quotation(
    source: &Stored<Quotation>,
    today: NaiveDate,
) -> Result<Invoice, DomainError> {
    let quotation = &source.record;
    if quotation.status != QuotationStatus::Accepted {
        return Err(invalid(
            Quotation::COLLECTION,
            quotation.status,
            Invoice::COLLECTION,
        ));
    }

    Ok(Invoice {
        client_name: quotation.client_name.clone(),
        company_name: quotation.company_name.clone(),
        address: quotation.address.clone(),
        contact: quotation.contact.clone(),
        items: quotation.items.clone(),
        total: quotation.total,
        date: today,
        status: InvoiceStatus::Pending,
        quote_id: Some(source.id),
    })
}

/// The two halves of recording a payment: the invoice to mark `Paid` and
/// the receipt to offer for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Invoice that moves to `Paid`.
    pub invoice_id: Uuid,
    /// Receipt draft settling the invoice.
    pub receipt: Receipt,
}

/// Plans the payment of a pending invoice.
///
/// `quotations` is searched for the invoice's originating quotation to
/// describe the payment.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the invoice is `Pending`.
pub fn payment_for_invoice(
    source: &Stored<Invoice>,
    quotations: &[Stored<Quotation>],
    today: NaiveDate,
) -> Result<PaymentIntent, DomainError> {
    let invoice = &source.record;
    if invoice.status != InvoiceStatus::Pending {
        return Err(invalid(Invoice::COLLECTION, invoice.status, InvoiceStatus::Paid));
    }

    let receipt = Receipt {
        client_name: invoice.client_name.clone(),
        amount: invoice.total,
        date_paid: today,
        invoice_id: Some(source.id),
        company_name: invoice.company_name.clone(),
        address: invoice.address.clone(),
        contact: invoice.contact.clone(),
        description: receipt_description(invoice, quotations),
    };

    Ok(PaymentIntent {
        invoice_id: source.id,
        receipt,
    })
}

/// Describes what an invoice paid for: the linked quotation's service if it
/// still exists, else the invoice items, else a generic text.
#[must_use]
pub fn receipt_description(invoice: &Invoice, quotations: &[Stored<Quotation>]) -> String {
    let linked = invoice.quote_id.and_then(|id| find(quotations, id));
    if let Some(quotation) = linked {
        let id = quotation.id.to_string();
        return format!(
            "{} services for the period outlined in Quotation {}...",
            quotation.record.service_type,
            &id[..4]
        );
    }
    if invoice.items.trim().is_empty() {
        GENERIC_PAYMENT_DESCRIPTION.to_owned()
    } else {
        invoice.items.clone()
    }
}

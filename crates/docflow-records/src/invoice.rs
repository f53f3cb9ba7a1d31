//! Invoice records.

use chrono::NaiveDate;
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::serde_util::blank_as_none;
use crate::status::InvoiceStatus;

/// A request for payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
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
    /// Free-text line items.
    #[serde(default)]
    pub items: String,
    /// Amount due.
    pub total: Money,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment status.
    pub status: InvoiceStatus,
    /// Quotation this invoice was drafted from.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub quote_id: Option<Uuid>,
}

impl Invoice {
    /// Returns a free-standing invoice with the creation defaults for `today`.
    #[must_use]
    pub fn template(today: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            company_name: String::new(),
            address: String::new(),
            contact: String::new(),
            items: String::new(),
            total: Money::ZERO,
            date: today,
            status: InvoiceStatus::Pending,
            quote_id: None,
        }
    }
}

impl Record for Invoice {
    const COLLECTION: CollectionName = CollectionName::Invoices;

    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

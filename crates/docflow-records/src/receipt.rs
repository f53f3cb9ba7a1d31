//! Receipt records.

use chrono::NaiveDate;
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::serde_util::blank_as_none;

/// Proof of a payment. Receipts carry no status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Paying client.
    #[serde(default)]
    pub client_name: String,
    /// Amount received.
    pub amount: Money,
    /// Payment date.
    pub date_paid: NaiveDate,
    /// Invoice this receipt settles.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub invoice_id: Option<Uuid>,
    /// Client organisation.
    #[serde(default)]
    pub company_name: String,
    /// Client postal address.
    #[serde(default)]
    pub address: String,
    /// Client phone or email.
    #[serde(default)]
    pub contact: String,
    /// What the payment was for.
    #[serde(default)]
    pub description: String,
}

impl Receipt {
    /// Returns a free-standing receipt with the creation defaults for `today`.
    #[must_use]
    pub fn template(today: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            amount: Money::ZERO,
            date_paid: today,
            invoice_id: None,
            company_name: String::new(),
            address: String::new(),
            contact: String::new(),
            description: String::new(),
        }
    }
}

impl Record for Receipt {
    const COLLECTION: CollectionName = CollectionName::Receipts;

    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

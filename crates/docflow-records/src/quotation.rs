//! Quotation records.

use chrono::NaiveDate;
use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::money::Money;
use crate::serde_util::blank_as_none;
use crate::status::QuotationStatus;

/// A priced proposal for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
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
    /// Quoted total.
    pub total: Money,
    /// Issue date.
    pub date: NaiveDate,
    /// Lifecycle status.
    pub status: QuotationStatus,
    /// Service category being quoted.
    pub service_type: String,
    /// Contract period.
    pub period: String,
    /// Payment term.
    pub payment_term: String,
    /// Appointment this quotation was drafted from.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub appointment_id: Option<Uuid>,
}

impl Quotation {
    /// Returns a free-standing quotation with the creation defaults for `today`.
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
            status: QuotationStatus::Draft,
            service_type: catalog::DEFAULT_SERVICE_TYPE.to_owned(),
            period: catalog::DEFAULT_PERIOD.to_owned(),
            payment_term: catalog::DEFAULT_PAYMENT_TERM.to_owned(),
            appointment_id: None,
        }
    }
}

impl Record for Quotation {
    const COLLECTION: CollectionName = CollectionName::Quotations;

    fn validate(&self) -> Result<(), DomainError> {
        if self.service_type.trim().is_empty() {
            return Err(DomainError::Validation(
                "quotation service type must not be blank".to_owned(),
            ));
        }
        Ok(())
    }
}

//! The four named document collections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A named set of entity records, partitioned per actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    /// Client meetings.
    Appointments,
    /// Priced proposals.
    Quotations,
    /// Requests for payment.
    Invoices,
    /// Proofs of payment.
    Receipts,
}

impl CollectionName {
    /// Every collection, in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Appointments,
        Self::Quotations,
        Self::Invoices,
        Self::Receipts,
    ];

    /// Returns the storage name of the collection.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appointments => "appointments",
            Self::Quotations => "quotations",
            Self::Invoices => "invoices",
            Self::Receipts => "receipts",
        }
    }

    /// Returns the singular noun used in user-facing messages.
    #[must_use]
    pub fn singular(self) -> &'static str {
        match self {
            Self::Appointments => "appointment",
            Self::Quotations => "quotation",
            Self::Invoices => "invoice",
            Self::Receipts => "receipt",
        }
    }

    /// Returns the capitalised collection name, e.g. `Invoices`.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Appointments => "Appointments",
            Self::Quotations => "Quotations",
            Self::Invoices => "Invoices",
            Self::Receipts => "Receipts",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown collection: {s}")))
    }
}

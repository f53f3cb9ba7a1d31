//! Enumerated status and category values.
//!
//! Every value set is closed: decoding or parsing anything outside it fails.

use std::fmt;
use std::str::FromStr;

use docflow_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked and not yet held.
    Scheduled,
    /// Held. Terminal.
    Completed,
    /// Called off. Terminal.
    Cancelled,
}

impl AppointmentStatus {
    /// All values.
    pub const ALL: [Self; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    /// Returns the persisted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Lifecycle status of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuotationStatus {
    /// Being prepared.
    Draft,
    /// Handed to the client.
    Sent,
    /// Agreed by the client; may be invoiced. Terminal.
    Accepted,
    /// Declined by the client. Terminal.
    Rejected,
}

impl QuotationStatus {
    /// All values.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Sent, Self::Accepted, Self::Rejected];

    /// Returns the persisted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Settled by a receipt. Terminal.
    Paid,
}

impl InvoiceStatus {
    /// All values.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Paid];

    /// Returns the persisted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }
}

/// How an appointment is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingType {
    /// Face to face.
    #[serde(rename = "In-Person", alias = "In-Person meeting")]
    InPerson,
    /// Video or phone call; eligible for a calendar availability check.
    #[serde(rename = "Online", alias = "Online meeting")]
    Online,
}

impl MeetingType {
    /// Returns the persisted spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPerson => "In-Person",
            Self::Online => "Online",
        }
    }
}

fn parse_closed<T: Copy>(
    raw: &str,
    kind: &str,
    values: &[T],
    name: fn(T) -> &'static str,
) -> Result<T, DomainError> {
    values
        .iter()
        .copied()
        .find(|v| name(*v) == raw)
        .ok_or_else(|| DomainError::Validation(format!("unknown {kind}: {raw}")))
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(s, "appointment status", &Self::ALL, Self::as_str)
    }
}

impl FromStr for QuotationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(s, "quotation status", &Self::ALL, Self::as_str)
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(s, "invoice status", &Self::ALL, Self::as_str)
    }
}

impl FromStr for MeetingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In-Person meeting" => Ok(Self::InPerson),
            "Online meeting" => Ok(Self::Online),
            other => parse_closed(
                other,
                "meeting type",
                &[Self::InPerson, Self::Online],
                Self::as_str,
            ),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Non-negative currency amounts.

use std::fmt;

use docflow_core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, de};

/// A currency amount that is always finite and `>= 0`.
///
/// The stored value is kept exactly as entered; only [`fmt::Display`]
/// rounds to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0.0);

    /// Creates an amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is negative or not finite.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::Validation(format!(
                "amount must be a finite number, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(DomainError::Validation(format!(
                "amount must not be negative, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the exact stored value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

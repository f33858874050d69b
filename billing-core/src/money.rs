//! Monetary amounts with exact minor/major unit conversion.
//!
//! The billing backend stores money in minor units (integer cents); the
//! client holds and displays major units. **Never use f64 for financial
//! calculations** - the conversion here is fixed-point and round-trips
//! exactly for integer-cent inputs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PortalError, Result};

/// A premium amount in major currency units.
///
/// # Examples
///
/// ```rust
/// use billing_core::Premium;
///
/// let premium = Premium::from_minor(1234);
/// assert_eq!(premium.to_string(), "12.34");
/// assert_eq!(premium.as_minor(), 1234);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Premium {
    // Decimal serializes as string with the serde feature, preserving precision
    value: Decimal,
}

impl Premium {
    /// Create from minor units (integer cents). Exact.
    pub fn from_minor(minor: i64) -> Self {
        Self {
            value: Decimal::new(minor, 2),
        }
    }

    /// Create from a major-unit decimal string (e.g., "123.45").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid decimal amount.
    pub fn from_major_str(s: &str) -> Result<Self> {
        let value = s
            .parse::<Decimal>()
            .map_err(|e| PortalError::invalid_data("premium", e.to_string()))?;
        Ok(Self { value })
    }

    /// Get the value in minor units (integer cents).
    ///
    /// Rounds to the nearest cent; saturates at `i64::MAX` for values that
    /// cannot be represented.
    pub fn as_minor(&self) -> i64 {
        (self.value * dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Get the major-unit decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Get zero amount.
    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Premium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

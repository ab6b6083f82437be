//! Monetary amount type.
//!
//! GatherLove amounts are whole rupiah, so an integer representation is exact.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating an [`Amount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The amount is not strictly positive.
    #[error("amount must be positive, got {0}")]
    NotPositive(i64),
    /// The amount is outside the allowed donation range.
    #[error("donation amount must be between {min} and {max}, got {got}")]
    OutOfDonationRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
        /// The rejected value.
        got: i64,
    },
}

/// A monetary amount in whole rupiah.
///
/// ## Examples
///
/// ```
/// use gatherlove_core::Amount;
///
/// let amount = Amount::new(50_000);
/// assert_eq!(amount.as_i64(), 50_000);
///
/// // Donation bounds are inclusive on both ends.
/// assert!(Amount::new(1_000).validate_donation().is_ok());
/// assert!(Amount::new(10_000_000).validate_donation().is_ok());
/// assert!(Amount::new(999).validate_donation().is_err());
/// assert!(Amount::new(10_000_001).validate_donation().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Minimum accepted donation, inclusive.
    pub const MIN_DONATION: i64 = 1_000;
    /// Maximum accepted donation, inclusive.
    pub const MAX_DONATION: i64 = 10_000_000;

    /// Create a new amount from a rupiah value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the underlying rupiah value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Validate this amount as a top-up: any strictly positive value.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] for zero or negative values.
    pub const fn validate_top_up(&self) -> Result<(), AmountError> {
        if self.0 <= 0 {
            return Err(AmountError::NotPositive(self.0));
        }
        Ok(())
    }

    /// Validate this amount as a donation.
    ///
    /// Both bounds are inclusive: 1_000 and 10_000_000 are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::OutOfDonationRange`] for values outside the range.
    pub const fn validate_donation(&self) -> Result<(), AmountError> {
        if self.0 < Self::MIN_DONATION || self.0 > Self::MAX_DONATION {
            return Err(AmountError::OutOfDonationRange {
                min: Self::MIN_DONATION,
                max: Self::MAX_DONATION,
                got: self.0,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp {}", self.0)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_bounds_inclusive() {
        assert!(Amount::new(1_000).validate_donation().is_ok());
        assert!(Amount::new(10_000_000).validate_donation().is_ok());
        assert!(Amount::new(5_000).validate_donation().is_ok());
    }

    #[test]
    fn test_donation_bounds_rejected() {
        assert!(matches!(
            Amount::new(999).validate_donation(),
            Err(AmountError::OutOfDonationRange { got: 999, .. })
        ));
        assert!(matches!(
            Amount::new(10_000_001).validate_donation(),
            Err(AmountError::OutOfDonationRange { got: 10_000_001, .. })
        ));
        assert!(Amount::new(0).validate_donation().is_err());
        assert!(Amount::new(-1_000).validate_donation().is_err());
    }

    #[test]
    fn test_top_up_positive_only() {
        assert!(Amount::new(1).validate_top_up().is_ok());
        assert!(Amount::new(50_000).validate_top_up().is_ok());
        assert!(matches!(
            Amount::new(0).validate_top_up(),
            Err(AmountError::NotPositive(0))
        ));
        assert!(Amount::new(-5).validate_top_up().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(50_000).to_string(), "Rp 50000");
    }
}

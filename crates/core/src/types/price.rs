//! Catalog price type using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is outside the accepted catalog range.
    #[error("price must be between {min} and {max}")]
    OutOfRange {
        /// Lowest accepted amount.
        min: Decimal,
        /// Highest accepted amount.
        max: Decimal,
    },
}

/// The current sales price of a product, within `[0, 10000]` inclusive.
///
/// Stored with whatever scale it was entered with, so `9.99` reads back as
/// `9.99`.
///
/// ```
/// use ecommerce_core::Price;
/// use rust_decimal::Decimal;
///
/// assert!(Price::new(Decimal::new(999, 2)).is_ok());
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Lowest accepted price.
    pub const MIN: Decimal = Decimal::ZERO;
    /// Highest accepted price.
    pub const MAX: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

    /// Create a price, checking the catalog range.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] outside `[0, 10000]`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Self::MIN || amount > Self::MAX {
            return Err(PriceError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(Decimal::from(10_000)).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(Price::new(Decimal::new(-1, 2)).is_err());
        assert!(Price::new(Decimal::new(1_000_001, 2)).is_err());
    }

    #[test]
    fn test_max_constant() {
        assert_eq!(Price::MAX, Decimal::from(10_000));
    }

    #[test]
    fn test_scale_is_preserved() {
        let price = Price::new("9.99".parse().unwrap()).unwrap();
        assert_eq!(price.to_string(), "9.99");
    }
}

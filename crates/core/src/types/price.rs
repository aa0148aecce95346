//! Decimal price as returned by the target API's cart listing.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price.
///
/// The target API has no currency field, so neither does this type. On the
/// wire it is a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from an exact decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a count of cents, e.g. `1999` for `19.99`.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), Decimal::new(1999, 2));
        assert_eq!(Price::from_cents(-5).amount(), Decimal::new(-5, 2));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(1999)).unwrap();
        assert_eq!(json, serde_json::json!(19.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(500).to_string(), "5.00");
    }
}

//! Exact-decimal price type
//!
//! Uses rust_decimal so that equal prices compare bit-equal and ladder
//! keys sort deterministically. No rounding is ever applied during
//! matching; a price is stored exactly as submitted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strictly positive exact-decimal price.
///
/// Serialized as a string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price from a Decimal.
    ///
    /// # Panics
    /// Panics if the price is zero or negative.
    pub fn new(value: Decimal) -> Self {
        assert!(value > Decimal::ZERO, "Price must be positive");
        Self(value)
    }

    /// Try to create a Price, returning None if non-positive.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create from an integer, mostly for tests.
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Get the inner decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must be positive"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_creation() {
        let price = Price::from_u64(100);
        assert_eq!(price.as_decimal(), Decimal::from(100));
    }

    #[test]
    #[should_panic(expected = "Price must be positive")]
    fn test_price_zero_panics() {
        Price::new(Decimal::ZERO);
    }

    #[test]
    fn test_price_try_new_rejects_negative() {
        assert!(Price::try_new(Decimal::from(-5)).is_none());
        assert!(Price::try_new(Decimal::from(5)).is_some());
    }

    #[test]
    fn test_price_exact_comparison() {
        let a: Price = "99.50".parse().unwrap();
        let b: Price = "99.5".parse().unwrap();
        assert_eq!(a, b);
        assert!(a < "99.51".parse().unwrap());
    }

    #[test]
    fn test_price_serialization() {
        let price: Price = "100.25".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"100.25\"");

        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    #[test]
    fn test_price_display() {
        let price: Price = "101".parse().unwrap();
        assert_eq!(price.to_string(), "101");
    }
}

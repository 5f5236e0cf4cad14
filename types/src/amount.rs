//! Monetary amount type.
//!
//! Amounts are fixed-point integers (u128) denominated in the raw base unit
//! of the marketplace currency (wei for ETH). All aggregation happens on the
//! raw integers, never floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A monetary amount in raw base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Parse a decimal string of raw units.
    ///
    /// Only plain unsigned digit strings are accepted; signs, separators and
    /// fractional parts are rejected so wire input cannot smuggle in a
    /// negative or non-integral value.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u128>().ok().map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_digits_only() {
        assert_eq!(
            Amount::parse("1500000000000000000"),
            Some(Amount::new(1_500_000_000_000_000_000))
        );
        assert_eq!(Amount::parse("0"), Some(Amount::ZERO));
        assert!(Amount::parse("-5").is_none());
        assert!(Amount::parse("+5").is_none());
        assert!(Amount::parse("1.5").is_none());
        assert!(Amount::parse("").is_none());
        assert!(Amount::parse("1_000").is_none());
    }

    #[test]
    fn parse_rejects_overflow() {
        // One more digit than u128::MAX can hold.
        let too_big = format!("{}0", u128::MAX);
        assert!(Amount::parse(&too_big).is_none());
    }
}

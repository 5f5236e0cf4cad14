//! Contract and party address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An EVM-style address: `0x` followed by 40 hex characters.
///
/// Normalized to lowercase at construction so equality and index prefix
/// scans behave consistently regardless of how the watcher cased the input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Total string length: prefix plus 40 hex characters.
    pub const LEN: usize = 42;

    /// Create an address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not `0x` plus 40 hex characters. Wire input
    /// must go through [`Address::parse`] instead.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(
            Self::is_well_formed(&s),
            "address must be 0x followed by 40 hex characters"
        );
        Self(s.to_ascii_lowercase())
    }

    /// Parse and normalize an address, returning `None` if malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        if Self::is_well_formed(raw) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Return the raw (lowercase) address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(s: &str) -> bool {
        s.len() == Self::LEN
            && s.starts_with(Self::PREFIX)
            && s.as_bytes()[2..].iter().all(u8::is_ascii_hexdigit)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let a = Address::parse("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap();
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Address::parse("abcdef0123456789abcdef0123456789abcdef01").is_none());
        assert!(Address::parse("0xabcd").is_none());
        assert!(Address::parse("0xgggggggggggggggggggggggggggggggggggggggg").is_none());
    }

    #[test]
    fn normalized_addresses_compare_equal() {
        let upper = Address::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = Address::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(upper, lower);
    }
}

//! Chain transaction hash type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte chain transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return None;
        }
        let raw = s.as_bytes();
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex::nibble(raw[2 * i])?;
            let lo = hex::nibble(raw[2 * i + 1])?;
            *byte = (hi << 4) | lo;
        }
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_prefixed_and_bare() {
        let bare = "ab".repeat(32);
        let prefixed = format!("0x{bare}");
        assert_eq!(TxHash::from_hex(&bare), TxHash::from_hex(&prefixed));
        assert_eq!(TxHash::from_hex(&bare), Some(TxHash::new([0xab; 32])));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(TxHash::from_hex("0x1234").is_none());
        assert!(TxHash::from_hex(&"zz".repeat(32)).is_none());
        assert!(TxHash::from_hex("").is_none());
    }

    #[test]
    fn display_round_trips() {
        let hash = TxHash::new([0x5c; 32]);
        assert_eq!(TxHash::from_hex(&hash.to_string()), Some(hash));
    }
}

//! Marketplace event kinds and their party-requirement rule table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of on-chain marketplace activity a record mirrors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// An item was minted by its creator.
    Mint,
    /// A listed item was bought.
    Purchase,
    /// An item changed hands outside a sale.
    Transfer,
    /// An item was put up for sale.
    Listing,
}

/// A party role an address can occupy on a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartyRole {
    Buyer,
    Seller,
    Creator,
}

impl PartyRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Creator => "creator",
        }
    }
}

impl TxKind {
    /// Party fields that must be present on an event of this kind.
    ///
    /// This is the single rule table consulted at ingestion; party
    /// requirements are never re-checked anywhere else.
    pub fn required_parties(self) -> &'static [PartyRole] {
        match self {
            Self::Mint => &[PartyRole::Creator],
            Self::Purchase => &[PartyRole::Buyer, PartyRole::Seller],
            Self::Listing => &[PartyRole::Seller],
            Self::Transfer => &[],
        }
    }

    /// Whether a price is required (sale-like kinds).
    pub fn requires_price(self) -> bool {
        matches!(self, Self::Purchase | Self::Listing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Purchase => "purchase",
            Self::Transfer => "transfer",
            Self::Listing => "listing",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_requires_both_sides_and_price() {
        assert_eq!(
            TxKind::Purchase.required_parties(),
            &[PartyRole::Buyer, PartyRole::Seller]
        );
        assert!(TxKind::Purchase.requires_price());
    }

    #[test]
    fn mint_requires_creator_without_price() {
        assert_eq!(TxKind::Mint.required_parties(), &[PartyRole::Creator]);
        assert!(!TxKind::Mint.requires_price());
    }

    #[test]
    fn listing_requires_seller_and_price() {
        assert_eq!(TxKind::Listing.required_parties(), &[PartyRole::Seller]);
        assert!(TxKind::Listing.requires_price());
    }

    #[test]
    fn transfer_has_no_requirements() {
        assert!(TxKind::Transfer.required_parties().is_empty());
        assert!(!TxKind::Transfer.requires_price());
    }
}

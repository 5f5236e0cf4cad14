//! The transaction record entity mirrored from on-chain activity.

use crate::{Address, Amount, Timestamp, TxHash, TxKind, TxStatus};
use serde::{Deserialize, Serialize};

/// Descriptive item payload carried for the front end.
///
/// Opaque to every ledger invariant; stored and returned verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub animation_url: Option<String>,
}

/// One mirrored on-chain marketplace transaction.
///
/// `tx_hash` is the primary dedup key; `kind`, `token_id` and `contract`
/// are structural and immutable across re-ingestion of the same hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub token_id: u64,
    pub contract: Address,
    pub kind: TxKind,
    pub price: Option<Amount>,
    pub currency: String,
    pub buyer: Option<Address>,
    pub seller: Option<Address>,
    pub creator: Option<Address>,
    pub gas_used: u64,
    pub gas_price: Option<Amount>,
    pub platform_fee: Amount,
    pub royalty_fee: Amount,
    pub metadata: Option<ItemMetadata>,
    pub status: TxStatus,
    /// Blocks observed on top of the containing block. Non-decreasing while
    /// Pending; frozen once the record leaves Pending.
    pub confirmations: u64,
    pub created_at: Timestamp,
    /// Set exactly once, on the transition to Confirmed.
    pub confirmed_at: Option<Timestamp>,
}

impl TransactionRecord {
    /// All party addresses present on this record, deduplicated.
    pub fn parties(&self) -> Vec<&Address> {
        let mut out: Vec<&Address> = Vec::new();
        for addr in [&self.buyer, &self.seller, &self.creator]
            .into_iter()
            .flatten()
        {
            if !out.contains(&addr) {
                out.push(addr);
            }
        }
        out
    }

    /// Whether the structural identity fields agree with `other`.
    pub fn matches_structure(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.token_id == other.token_id
            && self.contract == other.contract
    }

    /// Combined platform and royalty fees.
    pub fn total_fees(&self) -> Amount {
        self.platform_fee.saturating_add(self.royalty_fee)
    }
}

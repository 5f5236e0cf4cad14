//! Chain-watcher event types and their ingestion validation.
//!
//! The watcher delivers events at least once, with no ordering guarantee
//! across distinct hashes. Amount-like fields arrive as decimal strings
//! (the watcher side works in arbitrary-precision chain units) and are
//! parsed into typed values during validation.

pub mod error;
pub mod validation;

pub use error::EventError;
pub use validation::{validate_event, ValidatedEvent};

use curio_types::{ItemMetadata, TxKind};
use serde::{Deserialize, Serialize};

/// One observed on-chain event, as delivered by the chain watcher.
///
/// The shape mirrors [`curio_types::TransactionRecord`] plus the two
/// delivery directives: `confirmation_increment` and `failed`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainEvent {
    pub tx_hash: String,
    pub block_number: u64,
    pub token_id: u64,
    pub contract: String,
    pub kind: TxKind,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    pub gas_used: String,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub platform_fee: Option<String>,
    #[serde(default)]
    pub royalty_fee: Option<String>,
    #[serde(default)]
    pub metadata: Option<ItemMetadata>,
    /// Additional confirmations observed since the last delivery.
    #[serde(default)]
    pub confirmation_increment: Option<u64>,
    /// The watcher reports the transaction reverted or dropped.
    #[serde(default)]
    pub failed: bool,
}

//! Ledger parameters.

use serde::{Deserialize, Serialize};

/// Process-wide ledger configuration shared by the ingestion gateway and
/// the store backends. Constructed once at startup; never per-record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Confirmation count at which a Pending transaction is treated as
    /// irreversibly committed.
    pub confirmation_threshold: u64,

    /// Currency recorded when an event does not name one.
    pub base_currency: String,
}

impl LedgerParams {
    /// Reference defaults: 3 confirmations, prices in ETH raw units (wei).
    pub fn mainnet_defaults() -> Self {
        Self {
            confirmation_threshold: 3,
            base_currency: "ETH".to_string(),
        }
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self::mainnet_defaults()
    }
}

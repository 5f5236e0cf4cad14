//! Confirmation life cycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The confirmation status of a transaction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Observed on chain, not yet buried under enough blocks.
    Pending,
    /// Reached the finality threshold; treated as irreversibly committed.
    Confirmed,
    /// Reported reverted or dropped by the chain watcher.
    Failed,
}

impl TxStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

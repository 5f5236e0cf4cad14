//! Ledger error taxonomy.
//!
//! This is the error surface the application layer sees. Validation errors
//! are terminal for the event; `Unavailable` is the only retryable class,
//! and retries are driven by the watcher's at-least-once delivery, never by
//! the ledger itself.

use curio_events::EventError;
use curio_store::StoreError;
use curio_types::TxStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Structurally malformed or missing required fields; never persisted.
    #[error(transparent)]
    InvalidEvent(#[from] EventError),

    /// A hash was re-ingested with different immutable fields.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Query against an unknown hash.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// A signal tried to transition a record out of a terminal state.
    #[error("transaction {hash} is already {status}")]
    TerminalState { hash: String, status: TxStatus },

    /// Transient storage failure; safe to retry via re-delivery.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => LedgerError::NotFound(key),
            StoreError::Duplicate(msg) => LedgerError::DuplicateKey(msg),
            StoreError::Terminal { hash, status } => LedgerError::TerminalState { hash, status },
            StoreError::Backend(msg) | StoreError::Serialization(msg) => {
                LedgerError::Unavailable(msg)
            }
            StoreError::Corruption(msg) => LedgerError::Unavailable(format!("corruption: {msg}")),
        }
    }
}

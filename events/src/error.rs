//! Event validation errors.

use curio_types::TxKind;
use thiserror::Error;

/// Why an inbound event was rejected at ingestion.
///
/// Validation failures are terminal for the event: the watcher re-delivering
/// the same malformed payload can never succeed, so these are reported and
/// never retried.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{kind} event requires {field}")]
    MissingField { kind: TxKind, field: &'static str },

    #[error("invalid numeric value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("confirmation increment must be at least 1")]
    ZeroIncrement,
}

//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use curio_ledger::LedgerError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl RpcError {
    /// Stable machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Ledger(LedgerError::InvalidEvent(_)) => "invalid_event",
            Self::Ledger(LedgerError::NotFound(_)) => "not_found",
            Self::Ledger(LedgerError::DuplicateKey(_)) => "duplicate_key",
            Self::Ledger(LedgerError::TerminalState { .. }) => "terminal_state",
            Self::Ledger(LedgerError::Unavailable(_)) => "unavailable",
            Self::Server(_) => "server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Ledger(LedgerError::InvalidEvent(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Ledger(LedgerError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Ledger(LedgerError::DuplicateKey(_))
            | Self::Ledger(LedgerError::TerminalState { .. }) => StatusCode::CONFLICT,
            Self::Ledger(LedgerError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_types::TxStatus;

    #[test]
    fn status_codes_match_taxonomy() {
        let cases = [
            (
                RpcError::InvalidRequest("bad hash".into()),
                StatusCode::BAD_REQUEST,
                "invalid_request",
            ),
            (
                RpcError::Ledger(LedgerError::NotFound("0xabc".into())),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                RpcError::Ledger(LedgerError::DuplicateKey("0xabc".into())),
                StatusCode::CONFLICT,
                "duplicate_key",
            ),
            (
                RpcError::Ledger(LedgerError::TerminalState {
                    hash: "0xabc".into(),
                    status: TxStatus::Confirmed,
                }),
                StatusCode::CONFLICT,
                "terminal_state",
            ),
            (
                RpcError::Ledger(LedgerError::Unavailable("backend down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.code(), code);
        }
    }
}

//! Node error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] curio_store::StoreError),

    #[error("rpc error: {0}")]
    Rpc(#[from] curio_rpc::RpcError),
}

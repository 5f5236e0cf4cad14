//! HTTP API for the curio ledger.
//!
//! Read endpoints serve the web front end; the ingestion endpoint is called
//! by the chain watcher; the admin endpoints carry operator corrections.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};

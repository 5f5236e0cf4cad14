//! Curio ledger node.
//!
//! Wires the durable store, the ledger, and the RPC server together from a
//! single configuration.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::init_tracing;
pub use node::CurioNode;

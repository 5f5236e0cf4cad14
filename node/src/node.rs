//! The node object: store + ledger + RPC lifecycle.

use std::sync::Arc;

use curio_ledger::Ledger;
use curio_rpc::RpcServer;
use curio_store_lmdb::{LmdbEnvironment, LmdbRecordStore};

use crate::{NodeConfig, NodeError};

/// A running curio ledger node.
///
/// Owns the shared ledger handle; the RPC server and any embedding code
/// borrow it through `Arc`.
pub struct CurioNode {
    config: NodeConfig,
    ledger: Arc<Ledger<LmdbRecordStore>>,
}

impl CurioNode {
    /// Open the durable store and build the ledger.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, config.map_size())?;
        let store = LmdbRecordStore::new(Arc::new(env));
        let ledger = Arc::new(Ledger::new(store, config.ledger_params()));
        tracing::info!(
            data_dir = %config.data_dir.display(),
            threshold = config.confirmation_threshold,
            "ledger opened"
        );
        Ok(Self { config, ledger })
    }

    /// Shared handle to the ledger, for embedding alongside the server.
    pub fn ledger(&self) -> Arc<Ledger<LmdbRecordStore>> {
        Arc::clone(&self.ledger)
    }

    /// Run until interrupted (ctrl-c / SIGTERM via ctrl_c signal).
    pub async fn run(&self) -> Result<(), NodeError> {
        if !self.config.enable_rpc {
            tracing::info!("RPC disabled; waiting for shutdown signal");
            wait_for_shutdown().await;
            return Ok(());
        }

        let server = RpcServer::new(self.config.rpc_port);
        server.serve(self.ledger(), wait_for_shutdown()).await?;
        Ok(())
    }
}

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_types::TxHash;
    use tempfile::TempDir;

    #[test]
    fn node_opens_store_and_serves_ledger_reads() {
        let dir = TempDir::new().unwrap();
        let config = NodeConfig {
            data_dir: dir.path().to_path_buf(),
            map_size_mb: 16,
            ..Default::default()
        };

        let node = CurioNode::new(config).unwrap();
        let ledger = node.ledger();
        assert_eq!(ledger.record_count().unwrap(), 0);
        assert!(ledger.record(&TxHash::new([1u8; 32])).is_err());
    }
}

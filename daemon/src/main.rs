//! Curio daemon: entry point for running a marketplace ledger node.

use clap::Parser;
use std::path::PathBuf;

use curio_node::{init_tracing, CurioNode, NodeConfig};

#[derive(Parser)]
#[command(name = "curio-daemon", about = "Curio marketplace ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "CURIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Disable the RPC server.
    #[arg(long, env = "CURIO_DISABLE_RPC")]
    disable_rpc: bool,

    /// RPC server port.
    #[arg(long, env = "CURIO_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Confirmation threshold for treating transactions as final.
    #[arg(long, env = "CURIO_CONFIRMATION_THRESHOLD")]
    confirmation_threshold: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "CURIO_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "CURIO_LOG_FORMAT")]
    log_format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, &cli.log_format);

    let file_config: Option<NodeConfig> = if let Some(ref config_path) = cli.config {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<NodeConfig>(&contents) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}, using CLI defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {e}, using CLI defaults",
                    config_path.display()
                );
                None
            }
        }
    } else {
        None
    };

    let base = file_config.unwrap_or_default();
    let config = NodeConfig {
        data_dir: cli.data_dir.unwrap_or(base.data_dir),
        enable_rpc: base.enable_rpc && !cli.disable_rpc,
        rpc_port: cli.rpc_port.unwrap_or(base.rpc_port),
        confirmation_threshold: cli
            .confirmation_threshold
            .unwrap_or(base.confirmation_threshold),
        log_level: cli.log_level,
        log_format: cli.log_format,
        ..base
    };

    tracing::info!(
        "Starting curio ledger node (data: {}, RPC: {}, threshold: {})",
        config.data_dir.display(),
        if config.enable_rpc {
            config.rpc_port.to_string()
        } else {
            "off".into()
        },
        config.confirmation_threshold,
    );

    let node = CurioNode::new(config)?;
    node.run().await?;

    tracing::info!("Curio daemon exited cleanly");
    Ok(())
}

//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use curio_ledger::Ledger;
use curio_store::RecordStore;

use crate::handlers;
use crate::RpcError;

/// Build the full API router over a shared ledger.
///
/// CORS is permissive: the read surface exists for the browser front end.
pub fn router<S: RecordStore + 'static>(ledger: Arc<Ledger<S>>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/v1/transactions", post(handlers::ingest_event::<S>))
        .route("/v1/transactions/:hash", get(handlers::get_transaction::<S>))
        .route("/v1/transactions/:hash/fail", post(handlers::mark_failed::<S>))
        .route(
            "/v1/transactions/:hash/confirm",
            post(handlers::force_confirm::<S>),
        )
        .route(
            "/v1/accounts/:address/transactions",
            get(handlers::account_transactions::<S>),
        )
        .route(
            "/v1/tokens/:token_id/transactions",
            get(handlers::token_transactions::<S>),
        )
        .route(
            "/v1/tokens/:token_id/purchases",
            get(handlers::token_purchases::<S>),
        )
        .route("/v1/stats", get(handlers::market_stats::<S>))
        .layer(CorsLayer::permissive())
        .with_state(ledger)
}

pub struct RpcServer {
    port: u16,
}

impl RpcServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Serve the API until the shutdown future resolves.
    pub async fn serve<S: RecordStore + 'static>(
        &self,
        ledger: Arc<Ledger<S>>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        tracing::info!(%addr, "RPC server listening");
        axum::serve(listener, router(ledger))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        Ok(())
    }
}

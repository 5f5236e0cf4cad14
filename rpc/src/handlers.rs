//! RPC request handlers and wire DTOs.
//!
//! Amounts cross the wire as decimal strings: the raw units are u128 and
//! JSON consumers cannot be trusted with integers that wide.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use curio_events::ChainEvent;
use curio_ledger::{IngestOutcome, Ledger, MarketStats};
use curio_store::RecordStore;
use curio_types::{Address, ItemMetadata, TransactionRecord, TxHash, TxKind};

use crate::RpcError;

// ── Transaction ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TransactionResponse {
    pub tx_hash: String,
    pub block_number: u64,
    pub token_id: u64,
    pub contract: String,
    pub kind: String,
    pub price: Option<String>,
    pub currency: String,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub creator: Option<String>,
    pub gas_used: u64,
    pub gas_price: Option<String>,
    pub platform_fee: String,
    pub royalty_fee: String,
    pub metadata: Option<ItemMetadata>,
    pub status: String,
    pub confirmations: u64,
    pub created_at: u64,
    pub confirmed_at: Option<u64>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(r: TransactionRecord) -> Self {
        Self {
            tx_hash: r.tx_hash.to_string(),
            block_number: r.block_number,
            token_id: r.token_id,
            contract: r.contract.to_string(),
            kind: r.kind.as_str().to_string(),
            price: r.price.map(|p| p.to_string()),
            currency: r.currency,
            buyer: r.buyer.map(|a| a.to_string()),
            seller: r.seller.map(|a| a.to_string()),
            creator: r.creator.map(|a| a.to_string()),
            gas_used: r.gas_used,
            gas_price: r.gas_price.map(|p| p.to_string()),
            platform_fee: r.platform_fee.to_string(),
            royalty_fee: r.royalty_fee.to_string(),
            metadata: r.metadata,
            status: r.status.as_str().to_string(),
            confirmations: r.confirmations,
            created_at: r.created_at.as_secs(),
            confirmed_at: r.confirmed_at.map(|t| t.as_secs()),
        }
    }
}

#[derive(Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
}

impl TransactionListResponse {
    fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self {
            transactions: records.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Ingestion ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IngestResponse {
    pub tx_hash: String,
    pub outcome: &'static str,
    pub status: String,
    pub confirmations: u64,
}

impl IngestResponse {
    fn from_outcome(outcome: &IngestOutcome) -> Self {
        let record = outcome.record();
        Self {
            tx_hash: record.tx_hash.to_string(),
            outcome: match outcome {
                IngestOutcome::Created(_) => "created",
                IngestOutcome::Updated(_) => "updated",
                IngestOutcome::Confirmed(_) => "confirmed",
                IngestOutcome::Failed(_) => "failed",
            },
            status: record.status.as_str().to_string(),
            confirmations: record.confirmations,
        }
    }
}

// ── Statistics ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_sales: u64,
    pub total_volume: String,
    pub average_price: String,
    pub total_fees: String,
}

impl From<MarketStats> for StatsResponse {
    fn from(s: MarketStats) -> Self {
        Self {
            total_sales: s.total_sales,
            total_volume: s.total_volume.to_string(),
            average_price: s.average_price.to_string(),
            total_fees: s.total_fees.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct KindFilter {
    pub kind: Option<TxKind>,
}

// ── Handlers ─────────────────────────────────────────────────────────────

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn ingest_event<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Json(event): Json<ChainEvent>,
) -> Result<Json<IngestResponse>, RpcError> {
    let outcome = ledger.ingest(&event)?;
    Ok(Json(IngestResponse::from_outcome(&outcome)))
}

pub async fn get_transaction<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionResponse>, RpcError> {
    let hash = parse_hash(&hash)?;
    Ok(Json(ledger.record(&hash)?.into()))
}

pub async fn mark_failed<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionResponse>, RpcError> {
    let hash = parse_hash(&hash)?;
    Ok(Json(ledger.mark_failed(&hash)?.into()))
}

pub async fn force_confirm<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionResponse>, RpcError> {
    let hash = parse_hash(&hash)?;
    Ok(Json(ledger.force_confirm(&hash)?.into()))
}

pub async fn account_transactions<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(address): Path<String>,
) -> Result<Json<TransactionListResponse>, RpcError> {
    let address = parse_address(&address)?;
    let records = ledger.user_activity(&address)?;
    Ok(Json(TransactionListResponse::from_records(records)))
}

pub async fn token_transactions<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(token_id): Path<u64>,
    Query(filter): Query<KindFilter>,
) -> Result<Json<TransactionListResponse>, RpcError> {
    let records = ledger.token_activity(token_id, filter.kind)?;
    Ok(Json(TransactionListResponse::from_records(records)))
}

pub async fn token_purchases<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
    Path(token_id): Path<u64>,
) -> Result<Json<TransactionListResponse>, RpcError> {
    let records = ledger.purchase_history(token_id)?;
    Ok(Json(TransactionListResponse::from_records(records)))
}

pub async fn market_stats<S: RecordStore>(
    State(ledger): State<Arc<Ledger<S>>>,
) -> Result<Json<StatsResponse>, RpcError> {
    Ok(Json(ledger.stats_snapshot()?.into()))
}

fn parse_hash(raw: &str) -> Result<TxHash, RpcError> {
    TxHash::from_hex(raw)
        .ok_or_else(|| RpcError::InvalidRequest(format!("malformed transaction hash: {raw}")))
}

fn parse_address(raw: &str) -> Result<Address, RpcError> {
    Address::parse(raw)
        .ok_or_else(|| RpcError::InvalidRequest(format!("malformed address: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_types::{Amount, Timestamp, TxStatus};

    fn confirmed_record() -> TransactionRecord {
        TransactionRecord {
            tx_hash: TxHash::new([0xab; 32]),
            block_number: 100,
            token_id: 42,
            contract: Address::new("0x1111111111111111111111111111111111111111"),
            kind: TxKind::Purchase,
            price: Some(Amount::new(1_500_000_000_000_000_000)),
            currency: "ETH".to_string(),
            buyer: Some(Address::new("0x2222222222222222222222222222222222222222")),
            seller: Some(Address::new("0x3333333333333333333333333333333333333333")),
            creator: None,
            gas_used: 21_000,
            gas_price: Some(Amount::new(30_000_000_000)),
            platform_fee: Amount::new(25),
            royalty_fee: Amount::new(50),
            metadata: None,
            status: TxStatus::Confirmed,
            confirmations: 3,
            created_at: Timestamp::new(1_700_000_000),
            confirmed_at: Some(Timestamp::new(1_700_000_100)),
        }
    }

    #[test]
    fn transaction_response_stringifies_wide_integers() {
        let response = TransactionResponse::from(confirmed_record());
        assert_eq!(response.tx_hash, format!("0x{}", "ab".repeat(32)));
        assert_eq!(response.price.as_deref(), Some("1500000000000000000"));
        assert_eq!(response.kind, "purchase");
        assert_eq!(response.status, "confirmed");
        assert_eq!(response.confirmed_at, Some(1_700_000_100));
    }

    #[test]
    fn ingest_response_names_the_outcome() {
        let outcome = IngestOutcome::Confirmed(confirmed_record());
        let response = IngestResponse::from_outcome(&outcome);
        assert_eq!(response.outcome, "confirmed");
        assert_eq!(response.confirmations, 3);
    }

    #[test]
    fn stats_response_is_all_strings() {
        let stats = MarketStats {
            total_sales: 2,
            total_volume: Amount::new(3_000),
            average_price: Amount::new(1_500),
            total_fees: Amount::new(90),
        };
        let response = StatsResponse::from(stats);
        assert_eq!(response.total_volume, "3000");
        assert_eq!(response.average_price, "1500");
        assert_eq!(response.total_fees, "90");
    }

    #[test]
    fn hash_and_address_path_params_are_validated() {
        assert!(parse_hash("0x1234").is_err());
        assert!(parse_hash(&format!("0x{}", "cd".repeat(32))).is_ok());
        assert!(parse_address("nope").is_err());
        assert!(parse_address("0x2222222222222222222222222222222222222222").is_ok());
    }
}

//! The marketplace transaction ledger.
//!
//! Coordinates the ingestion gateway and the query engine over an abstract
//! [`curio_store::RecordStore`]. Constructed once per process and shared by
//! reference; tests instantiate isolated ledgers over the in-memory store.

pub mod error;
pub mod ingest;
pub mod query;

pub use error::LedgerError;
pub use ingest::{IngestOutcome, Ledger};
pub use query::MarketStats;

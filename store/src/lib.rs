//! Abstract record storage for the curio ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`RecordStore`]. The rest of the workspace depends only on the trait.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryRecordStore;

use curio_types::{Address, Timestamp, TransactionRecord, TxHash, TxKind};

/// Outcome of an upsert.
#[derive(Clone, Debug)]
pub enum UpsertOutcome {
    /// The hash was unseen; the record was created.
    Created(TransactionRecord),
    /// The hash was known with matching structural fields; the stored record
    /// is returned unchanged.
    Existing(TransactionRecord),
}

impl UpsertOutcome {
    pub fn record(&self) -> &TransactionRecord {
        match self {
            Self::Created(r) | Self::Existing(r) => r,
        }
    }

    pub fn into_record(self) -> TransactionRecord {
        match self {
            Self::Created(r) | Self::Existing(r) => r,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Outcome of a confirmation delta application.
#[derive(Clone, Debug)]
pub enum DeltaOutcome {
    /// Still Pending with the new count.
    Advanced(TransactionRecord),
    /// Crossed the threshold in this call; `confirmed_at` is now set.
    Confirmed(TransactionRecord),
    /// The record was already Confirmed; nothing changed. Routine under
    /// at-least-once delivery, since the watcher keeps counting past the
    /// threshold.
    AlreadyConfirmed(TransactionRecord),
}

impl DeltaOutcome {
    pub fn record(&self) -> &TransactionRecord {
        match self {
            Self::Advanced(r) | Self::Confirmed(r) | Self::AlreadyConfirmed(r) => r,
        }
    }

    pub fn into_record(self) -> TransactionRecord {
        match self {
            Self::Advanced(r) | Self::Confirmed(r) | Self::AlreadyConfirmed(r) => r,
        }
    }
}

/// Trait for transaction record storage.
///
/// Contract shared by all backends:
/// - every mutation is durable before the call returns;
/// - mutations to the same hash are linearizable: exactly one concurrent
///   creation wins, deltas never lose updates, and the Confirmed transition
///   fires exactly once;
/// - each mutation is a single atomic operation, so a caller canceling
///   mid-flight can never observe a partially-applied record.
pub trait RecordStore: Send + Sync {
    /// Insert a record for an unseen hash, or return the existing record if
    /// the hash is known and the structural fields (`kind`, `token_id`,
    /// `contract`) match. A structural mismatch is a `Duplicate` error.
    fn upsert(&self, record: &TransactionRecord) -> Result<UpsertOutcome, StoreError>;

    /// Fetch a record by hash.
    fn get(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError>;

    /// All records where the address appears as buyer, seller, or creator,
    /// ordered by `created_at` descending.
    fn list_by_party(&self, address: &Address) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Records for a token, optionally filtered by kind, ordered by
    /// `created_at` descending.
    fn list_by_token(
        &self,
        token_id: u64,
        kind: Option<TxKind>,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Atomically add `delta` confirmations (callers guarantee `delta >= 1`)
    /// and flip to Confirmed with `confirmed_at = now` if the count crosses
    /// `threshold` while Pending. A Failed record is a `Terminal` error.
    fn apply_confirmation_delta(
        &self,
        hash: &TxHash,
        delta: u64,
        threshold: u64,
        now: Timestamp,
    ) -> Result<DeltaOutcome, StoreError>;

    /// Transition Pending to Failed. Idempotent on an already-Failed record;
    /// a Confirmed record is a `Terminal` error.
    fn mark_failed(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError>;

    /// Operator correction: transition Pending to Confirmed immediately,
    /// leaving the confirmation count as observed. Any terminal record is a
    /// `Terminal` error.
    fn force_confirm(&self, hash: &TxHash, now: Timestamp)
        -> Result<TransactionRecord, StoreError>;

    /// Consistent snapshot of all Confirmed Purchase records, newest first.
    /// Feeds marketplace aggregation; the snapshot never exposes a record in
    /// a partially-applied state.
    fn confirmed_purchases(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Total number of records.
    fn record_count(&self) -> Result<u64, StoreError>;
}

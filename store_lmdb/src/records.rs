//! LMDB implementation of RecordStore.
//!
//! Layout (all values bincode unless noted):
//! - `records`:     `hash(32) -> TransactionRecord`
//! - `party_index`: `address(42 ascii) ++ inv_ts(8 BE) ++ hash(32) -> ()`
//! - `token_index`: `token_id(8 BE) ++ inv_ts(8 BE) ++ hash(32) -> ()`
//! - `state_index`: `kind(1) ++ status(1) ++ inv_ts(8 BE) ++ hash(32) -> ()`
//!
//! Addresses all have identical length, so prefix scans for a given party
//! are exact. `inv_ts` is `u64::MAX - created_at`, which makes a forward
//! range scan yield newest-first ordering.
//!
//! Every mutation is a single LMDB write transaction: the record update and
//! any index moves commit together, and LMDB's single-writer lock serializes
//! conflicting mutations, which gives the per-hash linearizability the
//! store contract requires.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, RoTxn};

use curio_store::{DeltaOutcome, RecordStore, StoreError, UpsertOutcome};
use curio_types::{
    apply_delta, Address, Timestamp, Transition, TransactionRecord, TxHash, TxKind, TxStatus,
};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

pub struct LmdbRecordStore {
    env: Arc<LmdbEnvironment>,
}

impl LmdbRecordStore {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

// ── Index key construction ──────────────────────────────────────────────

fn kind_tag(kind: TxKind) -> u8 {
    match kind {
        TxKind::Mint => 0,
        TxKind::Purchase => 1,
        TxKind::Transfer => 2,
        TxKind::Listing => 3,
    }
}

fn status_tag(status: TxStatus) -> u8 {
    match status {
        TxStatus::Pending => 0,
        TxStatus::Confirmed => 1,
        TxStatus::Failed => 2,
    }
}

fn inv_ts(ts: Timestamp) -> [u8; 8] {
    (u64::MAX - ts.as_secs()).to_be_bytes()
}

fn party_key(address: &Address, created_at: Timestamp, hash: &TxHash) -> Vec<u8> {
    let addr = address.as_str().as_bytes();
    let mut key = Vec::with_capacity(addr.len() + 8 + 32);
    key.extend_from_slice(addr);
    key.extend_from_slice(&inv_ts(created_at));
    key.extend_from_slice(hash.as_bytes());
    key
}

fn token_key(token_id: u64, created_at: Timestamp, hash: &TxHash) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 8 + 32);
    key.extend_from_slice(&token_id.to_be_bytes());
    key.extend_from_slice(&inv_ts(created_at));
    key.extend_from_slice(hash.as_bytes());
    key
}

fn state_key(kind: TxKind, status: TxStatus, created_at: Timestamp, hash: &TxHash) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 1 + 8 + 32);
    key.push(kind_tag(kind));
    key.push(status_tag(status));
    key.extend_from_slice(&inv_ts(created_at));
    key.extend_from_slice(hash.as_bytes());
    key
}

/// Compute the exclusive upper bound for a prefix scan.
///
/// Returns `None` when the prefix is all 0xff bytes, in which case the scan
/// runs unbounded to the end of the database.
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.last_mut() {
        if *last < 0xff {
            *last += 1;
            return Some(upper);
        }
        upper.pop();
    }
    None
}

impl LmdbRecordStore {
    fn load_record(
        &self,
        rtxn: &RoTxn<'_>,
        hash_bytes: &[u8],
    ) -> Result<TransactionRecord, StoreError> {
        let bytes = self
            .env
            .records_db
            .get(rtxn, hash_bytes)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!(
                    "index entry points at missing record {}",
                    hash_bytes
                        .iter()
                        .map(|b| format!("{b:02x}"))
                        .collect::<String>()
                ))
            })?;
        let record: TransactionRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;
        Ok(record)
    }

    /// Scan an index for keys starting with `prefix` and load the records
    /// they point at, all within one read transaction (snapshot isolation).
    fn scan_index(
        &self,
        db: &Database<Bytes, Bytes>,
        prefix: &[u8],
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let upper = prefix_upper_bound(prefix);
        let bounds: (Bound<&[u8]>, Bound<&[u8]>) = match upper.as_deref() {
            Some(u) => (Bound::Included(prefix), Bound::Excluded(u)),
            None => (Bound::Included(prefix), Bound::Unbounded),
        };
        let iter = db.range(&rtxn, &bounds).map_err(LmdbError::from)?;

        let mut hashes: Vec<Vec<u8>> = Vec::new();
        for result in iter {
            let (key, _value) = result.map_err(LmdbError::from)?;
            // The trailing 32 bytes of every index key are the record hash.
            let offset = key.len().saturating_sub(32);
            hashes.push(key[offset..].to_vec());
        }

        let mut records = Vec::with_capacity(hashes.len());
        for hash_bytes in &hashes {
            records.push(self.load_record(&rtxn, hash_bytes)?);
        }
        Ok(records)
    }
}

impl RecordStore for LmdbRecordStore {
    fn upsert(&self, record: &TransactionRecord) -> Result<UpsertOutcome, StoreError> {
        let env = &self.env;
        let mut wtxn = env.env().write_txn().map_err(LmdbError::from)?;
        let key = record.tx_hash.as_bytes();

        if let Some(bytes) = env.records_db.get(&wtxn, key).map_err(LmdbError::from)? {
            let existing: TransactionRecord =
                bincode::deserialize(bytes).map_err(LmdbError::from)?;
            if !existing.matches_structure(record) {
                return Err(StoreError::Duplicate(format!(
                    "{} re-ingested with different structural fields",
                    record.tx_hash
                )));
            }
            // Re-observation of a known event; the open txn is discarded.
            return Ok(UpsertOutcome::Existing(existing));
        }

        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        env.records_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        for party in record.parties() {
            env.party_db
                .put(
                    &mut wtxn,
                    &party_key(party, record.created_at, &record.tx_hash),
                    &[],
                )
                .map_err(LmdbError::from)?;
        }
        env.token_db
            .put(
                &mut wtxn,
                &token_key(record.token_id, record.created_at, &record.tx_hash),
                &[],
            )
            .map_err(LmdbError::from)?;
        env.state_db
            .put(
                &mut wtxn,
                &state_key(record.kind, record.status, record.created_at, &record.tx_hash),
                &[],
            )
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(hash = %record.tx_hash, kind = %record.kind, "record created");
        Ok(UpsertOutcome::Created(record.clone()))
    }

    fn get(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .env
            .records_db
            .get(&rtxn, hash.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        let record: TransactionRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn list_by_party(&self, address: &Address) -> Result<Vec<TransactionRecord>, StoreError> {
        self.scan_index(&self.env.party_db, address.as_str().as_bytes())
    }

    fn list_by_token(
        &self,
        token_id: u64,
        kind: Option<TxKind>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let records = self.scan_index(&self.env.token_db, &token_id.to_be_bytes())?;
        Ok(match kind {
            Some(k) => records.into_iter().filter(|r| r.kind == k).collect(),
            None => records,
        })
    }

    fn apply_confirmation_delta(
        &self,
        hash: &TxHash,
        delta: u64,
        threshold: u64,
        now: Timestamp,
    ) -> Result<DeltaOutcome, StoreError> {
        let env = &self.env;
        let mut wtxn = env.env().write_txn().map_err(LmdbError::from)?;
        let key = hash.as_bytes();
        let bytes = env
            .records_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        let mut record: TransactionRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;

        match apply_delta(record.status, record.confirmations, delta, threshold) {
            Transition::Advanced { confirmations } => {
                record.confirmations = confirmations;
                let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                env.records_db
                    .put(&mut wtxn, key, &bytes)
                    .map_err(LmdbError::from)?;
                wtxn.commit().map_err(LmdbError::from)?;
                Ok(DeltaOutcome::Advanced(record))
            }
            Transition::Confirmed { confirmations } => {
                let old_key = state_key(record.kind, record.status, record.created_at, hash);
                record.confirmations = confirmations;
                record.status = TxStatus::Confirmed;
                record.confirmed_at = Some(now);
                let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                env.records_db
                    .put(&mut wtxn, key, &bytes)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .delete(&mut wtxn, &old_key)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .put(
                        &mut wtxn,
                        &state_key(record.kind, record.status, record.created_at, hash),
                        &[],
                    )
                    .map_err(LmdbError::from)?;
                wtxn.commit().map_err(LmdbError::from)?;
                tracing::info!(hash = %hash, confirmations, "record confirmed");
                Ok(DeltaOutcome::Confirmed(record))
            }
            Transition::Terminal => match record.status {
                TxStatus::Confirmed => Ok(DeltaOutcome::AlreadyConfirmed(record)),
                status => Err(StoreError::Terminal {
                    hash: hash.to_string(),
                    status,
                }),
            },
        }
    }

    fn mark_failed(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError> {
        let env = &self.env;
        let mut wtxn = env.env().write_txn().map_err(LmdbError::from)?;
        let key = hash.as_bytes();
        let bytes = env
            .records_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        let mut record: TransactionRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;

        match record.status {
            TxStatus::Pending => {
                let old_key = state_key(record.kind, record.status, record.created_at, hash);
                record.status = TxStatus::Failed;
                let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                env.records_db
                    .put(&mut wtxn, key, &bytes)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .delete(&mut wtxn, &old_key)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .put(
                        &mut wtxn,
                        &state_key(record.kind, record.status, record.created_at, hash),
                        &[],
                    )
                    .map_err(LmdbError::from)?;
                wtxn.commit().map_err(LmdbError::from)?;
                tracing::info!(hash = %hash, "record marked failed");
                Ok(record)
            }
            TxStatus::Failed => Ok(record),
            TxStatus::Confirmed => Err(StoreError::Terminal {
                hash: hash.to_string(),
                status: TxStatus::Confirmed,
            }),
        }
    }

    fn force_confirm(
        &self,
        hash: &TxHash,
        now: Timestamp,
    ) -> Result<TransactionRecord, StoreError> {
        let env = &self.env;
        let mut wtxn = env.env().write_txn().map_err(LmdbError::from)?;
        let key = hash.as_bytes();
        let bytes = env
            .records_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        let mut record: TransactionRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;

        match record.status {
            TxStatus::Pending => {
                let old_key = state_key(record.kind, record.status, record.created_at, hash);
                record.status = TxStatus::Confirmed;
                record.confirmed_at = Some(now);
                let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                env.records_db
                    .put(&mut wtxn, key, &bytes)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .delete(&mut wtxn, &old_key)
                    .map_err(LmdbError::from)?;
                env.state_db
                    .put(
                        &mut wtxn,
                        &state_key(record.kind, record.status, record.created_at, hash),
                        &[],
                    )
                    .map_err(LmdbError::from)?;
                wtxn.commit().map_err(LmdbError::from)?;
                tracing::info!(hash = %hash, "record force-confirmed");
                Ok(record)
            }
            status => Err(StoreError::Terminal {
                hash: hash.to_string(),
                status,
            }),
        }
    }

    fn confirmed_purchases(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let prefix = [kind_tag(TxKind::Purchase), status_tag(TxStatus::Confirmed)];
        self.scan_index(&self.env.state_db, &prefix)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let count = self.env.records_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}

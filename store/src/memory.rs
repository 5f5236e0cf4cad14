//! In-memory implementation of RecordStore.
//!
//! Backs unit tests across the workspace and small embedded deployments.
//! A single mutex serializes all mutations, a strict superset of the
//! per-hash linearizability the contract requires.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use curio_types::{
    apply_delta, Address, Timestamp, Transition, TransactionRecord, TxHash, TxKind, TxStatus,
};

use crate::{DeltaOutcome, RecordStore, StoreError, UpsertOutcome};

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<TxHash, TransactionRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TxHash, TransactionRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("record map mutex poisoned".to_string()))
    }
}

/// Order newest first, tie-broken by hash bytes so results are stable.
fn sort_newest_first(records: &mut [TransactionRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.tx_hash.as_bytes().cmp(b.tx_hash.as_bytes()))
    });
}

impl RecordStore for MemoryRecordStore {
    fn upsert(&self, record: &TransactionRecord) -> Result<UpsertOutcome, StoreError> {
        let mut map = self.lock()?;
        match map.get(&record.tx_hash) {
            Some(existing) => {
                if !existing.matches_structure(record) {
                    return Err(StoreError::Duplicate(format!(
                        "{} re-ingested with different structural fields",
                        record.tx_hash
                    )));
                }
                Ok(UpsertOutcome::Existing(existing.clone()))
            }
            None => {
                map.insert(record.tx_hash, record.clone());
                Ok(UpsertOutcome::Created(record.clone()))
            }
        }
    }

    fn get(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError> {
        self.lock()?
            .get(hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))
    }

    fn list_by_party(&self, address: &Address) -> Result<Vec<TransactionRecord>, StoreError> {
        let map = self.lock()?;
        let mut out: Vec<TransactionRecord> = map
            .values()
            .filter(|r| r.parties().iter().any(|a| *a == address))
            .cloned()
            .collect();
        drop(map);
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn list_by_token(
        &self,
        token_id: u64,
        kind: Option<TxKind>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let map = self.lock()?;
        let mut out: Vec<TransactionRecord> = map
            .values()
            .filter(|r| r.token_id == token_id && kind.map_or(true, |k| r.kind == k))
            .cloned()
            .collect();
        drop(map);
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn apply_confirmation_delta(
        &self,
        hash: &TxHash,
        delta: u64,
        threshold: u64,
        now: Timestamp,
    ) -> Result<DeltaOutcome, StoreError> {
        let mut map = self.lock()?;
        let record = map
            .get_mut(hash)
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        match apply_delta(record.status, record.confirmations, delta, threshold) {
            Transition::Advanced { confirmations } => {
                record.confirmations = confirmations;
                Ok(DeltaOutcome::Advanced(record.clone()))
            }
            Transition::Confirmed { confirmations } => {
                record.confirmations = confirmations;
                record.status = TxStatus::Confirmed;
                record.confirmed_at = Some(now);
                Ok(DeltaOutcome::Confirmed(record.clone()))
            }
            Transition::Terminal => match record.status {
                TxStatus::Confirmed => Ok(DeltaOutcome::AlreadyConfirmed(record.clone())),
                status => Err(StoreError::Terminal {
                    hash: hash.to_string(),
                    status,
                }),
            },
        }
    }

    fn mark_failed(&self, hash: &TxHash) -> Result<TransactionRecord, StoreError> {
        let mut map = self.lock()?;
        let record = map
            .get_mut(hash)
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        match record.status {
            TxStatus::Pending => {
                record.status = TxStatus::Failed;
                Ok(record.clone())
            }
            TxStatus::Failed => Ok(record.clone()),
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
        let mut map = self.lock()?;
        let record = map
            .get_mut(hash)
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))?;
        match record.status {
            TxStatus::Pending => {
                record.status = TxStatus::Confirmed;
                record.confirmed_at = Some(now);
                Ok(record.clone())
            }
            status => Err(StoreError::Terminal {
                hash: hash.to_string(),
                status,
            }),
        }
    }

    fn confirmed_purchases(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let map = self.lock()?;
        let mut out: Vec<TransactionRecord> = map
            .values()
            .filter(|r| r.kind == TxKind::Purchase && r.status == TxStatus::Confirmed)
            .cloned()
            .collect();
        drop(map);
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.len() as u64)
    }
}

//! Ingestion gateway.
//!
//! Accepts chain-watcher events, validates them against the kind rule table,
//! and drives the record store: create on first sight, accumulate
//! confirmations, apply failure signals. Built for at-least-once delivery:
//! re-ingesting an already-processed event is a no-op, not an error.

use curio_events::{validate_event, ChainEvent};
use curio_store::{DeltaOutcome, RecordStore, UpsertOutcome};
use curio_types::{LedgerParams, Timestamp, TransactionRecord, TxHash};

use crate::LedgerError;

/// What an ingestion call did to the ledger.
#[derive(Clone, Debug)]
pub enum IngestOutcome {
    /// First sight of this hash; a Pending record was created.
    Created(TransactionRecord),
    /// The record advanced (or was merely re-observed) without leaving
    /// Pending, or was already Confirmed.
    Updated(TransactionRecord),
    /// This ingestion crossed the confirmation threshold.
    Confirmed(TransactionRecord),
    /// This ingestion applied a failure signal.
    Failed(TransactionRecord),
}

impl IngestOutcome {
    pub fn record(&self) -> &TransactionRecord {
        match self {
            Self::Created(r) | Self::Updated(r) | Self::Confirmed(r) | Self::Failed(r) => r,
        }
    }
}

/// The transaction ledger: a record store plus process-wide parameters.
///
/// The store is the single owner of persisted state; the ledger never caches
/// records across calls.
pub struct Ledger<S> {
    store: S,
    params: LedgerParams,
}

impl<S: RecordStore> Ledger<S> {
    pub fn new(store: S, params: LedgerParams) -> Self {
        Self { store, params }
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Ingest one chain-watcher event.
    pub fn ingest(&self, event: &ChainEvent) -> Result<IngestOutcome, LedgerError> {
        self.ingest_at(event, Timestamp::now())
    }

    /// Ingest with an explicit clock, so tests can pin `created_at`.
    pub fn ingest_at(
        &self,
        event: &ChainEvent,
        now: Timestamp,
    ) -> Result<IngestOutcome, LedgerError> {
        let validated = match validate_event(event, &self.params, now) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(hash = %event.tx_hash, error = %e, "event rejected");
                return Err(e.into());
            }
        };
        let hash = validated.record.tx_hash;

        // Record the observation before anything else; a failure signal for
        // an unseen hash is still a ledgered on-chain fact.
        let upsert = self.store.upsert(&validated.record)?;

        if validated.failed {
            let record = self.store.mark_failed(&hash)?;
            tracing::info!(hash = %hash, "failure signal applied");
            return Ok(IngestOutcome::Failed(record));
        }

        if validated.confirmation_increment == 0 {
            return Ok(match upsert {
                UpsertOutcome::Created(r) => {
                    tracing::debug!(hash = %hash, kind = %r.kind, "event ingested");
                    IngestOutcome::Created(r)
                }
                UpsertOutcome::Existing(r) => IngestOutcome::Updated(r),
            });
        }

        let created = upsert.is_created();
        let outcome = self.store.apply_confirmation_delta(
            &hash,
            validated.confirmation_increment,
            self.params.confirmation_threshold,
            now,
        )?;
        Ok(match outcome {
            DeltaOutcome::Confirmed(r) => IngestOutcome::Confirmed(r),
            DeltaOutcome::Advanced(r) if created => IngestOutcome::Created(r),
            DeltaOutcome::Advanced(r) | DeltaOutcome::AlreadyConfirmed(r) => {
                IngestOutcome::Updated(r)
            }
        })
    }

    /// Administrative signal: mark a transaction failed.
    pub fn mark_failed(&self, hash: &TxHash) -> Result<TransactionRecord, LedgerError> {
        let record = self.store.mark_failed(hash)?;
        tracing::info!(hash = %hash, "transaction marked failed by operator");
        Ok(record)
    }

    /// Administrative signal: confirm a transaction regardless of its
    /// confirmation count.
    pub fn force_confirm(&self, hash: &TxHash) -> Result<TransactionRecord, LedgerError> {
        let record = self.store.force_confirm(hash, Timestamp::now())?;
        tracing::info!(hash = %hash, "transaction force-confirmed by operator");
        Ok(record)
    }
}

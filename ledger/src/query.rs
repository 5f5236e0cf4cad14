//! Query and aggregation engine.
//!
//! All aggregation runs on u128 raw units; the snapshot comes from a single
//! consistent store scan, so a record is never observed with its
//! confirmation count and status out of step.

use serde::Serialize;

use curio_store::RecordStore;
use curio_types::{Address, Amount, TransactionRecord, TxHash, TxKind, TxStatus};

use crate::{ingest::Ledger, LedgerError};

/// Marketplace-wide statistics over Confirmed Purchase records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketStats {
    pub total_sales: u64,
    pub total_volume: Amount,
    /// Arithmetic mean of sale prices, floor-divided in raw units.
    /// Zero when there are no sales.
    pub average_price: Amount,
    /// Sum of platform and royalty fees across all sales.
    pub total_fees: Amount,
}

impl MarketStats {
    fn empty() -> Self {
        Self {
            total_sales: 0,
            total_volume: Amount::ZERO,
            average_price: Amount::ZERO,
            total_fees: Amount::ZERO,
        }
    }
}

impl<S: RecordStore> Ledger<S> {
    /// Fetch a record by hash.
    pub fn record(&self, hash: &TxHash) -> Result<TransactionRecord, LedgerError> {
        Ok(self.store().get(hash)?)
    }

    /// All activity where the address appears as buyer, seller, or creator,
    /// newest first.
    pub fn user_activity(&self, address: &Address) -> Result<Vec<TransactionRecord>, LedgerError> {
        Ok(self.store().list_by_party(address)?)
    }

    /// Records for a token, optionally filtered by kind, newest first.
    pub fn token_activity(
        &self,
        token_id: u64,
        kind: Option<TxKind>,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        Ok(self.store().list_by_token(token_id, kind)?)
    }

    /// Confirmed purchases of a token, newest first.
    pub fn purchase_history(&self, token_id: u64) -> Result<Vec<TransactionRecord>, LedgerError> {
        let purchases = self
            .store()
            .list_by_token(token_id, Some(TxKind::Purchase))?;
        Ok(purchases
            .into_iter()
            .filter(|r| r.status == TxStatus::Confirmed)
            .collect())
    }

    /// Point-in-time marketplace statistics over confirmed sales.
    pub fn stats_snapshot(&self) -> Result<MarketStats, LedgerError> {
        let sales = self.store().confirmed_purchases()?;
        if sales.is_empty() {
            return Ok(MarketStats::empty());
        }

        let mut volume: u128 = 0;
        let mut fees: u128 = 0;
        for sale in &sales {
            // Confirmed purchases always carry a price (enforced at
            // ingestion); a missing one here is stored-data corruption.
            let price = sale.price.ok_or_else(|| {
                LedgerError::Unavailable(format!(
                    "corruption: confirmed purchase {} has no price",
                    sale.tx_hash
                ))
            })?;
            volume = volume.saturating_add(price.raw());
            fees = fees.saturating_add(sale.total_fees().raw());
        }

        let count = sales.len() as u64;
        Ok(MarketStats {
            total_sales: count,
            total_volume: Amount::new(volume),
            average_price: Amount::new(volume / count as u128),
            total_fees: Amount::new(fees),
        })
    }

    /// Total number of records in the ledger (telemetry).
    pub fn record_count(&self) -> Result<u64, LedgerError> {
        Ok(self.store().record_count()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_events::ChainEvent;
    use curio_store::MemoryRecordStore;
    use curio_types::{LedgerParams, Timestamp};

    fn hash_hex(byte: u8) -> String {
        format!("0x{}", format!("{byte:02x}").repeat(32))
    }

    fn buyer() -> String {
        "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string()
    }

    fn purchase_event(byte: u8, token_id: u64, price: u128, fee: u128) -> ChainEvent {
        ChainEvent {
            tx_hash: hash_hex(byte),
            block_number: 600,
            token_id,
            contract: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            kind: TxKind::Purchase,
            price: Some(price.to_string()),
            currency: None,
            buyer: Some(buyer()),
            seller: Some("0xcccccccccccccccccccccccccccccccccccccccc".to_string()),
            creator: None,
            gas_used: "21000".to_string(),
            gas_price: None,
            platform_fee: Some(fee.to_string()),
            royalty_fee: Some((fee / 2).to_string()),
            metadata: None,
            confirmation_increment: Some(3),
            failed: false,
        }
    }

    fn test_ledger() -> Ledger<MemoryRecordStore> {
        Ledger::new(MemoryRecordStore::new(), LedgerParams::default())
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn stats_over_known_fixture() {
        let ledger = test_ledger();
        let prices = [1_000u128, 2_000, 3_000, 4_000];
        for (i, price) in prices.iter().enumerate() {
            let event = purchase_event(i as u8 + 1, 42, *price, 100);
            ledger.ingest_at(&event, at(1_000 + i as u64)).unwrap();
        }

        let stats = ledger.stats_snapshot().unwrap();
        assert_eq!(stats.total_sales, 4);
        assert_eq!(stats.total_volume, Amount::new(10_000));
        assert_eq!(stats.average_price, Amount::new(2_500));
        // Each sale carries platform_fee 100 + royalty_fee 50.
        assert_eq!(stats.total_fees, Amount::new(600));
    }

    #[test]
    fn stats_ignore_unconfirmed_and_failed_sales() {
        let ledger = test_ledger();
        ledger
            .ingest_at(&purchase_event(1, 42, 5_000, 0), at(1_000))
            .unwrap();

        // Pending purchase: one confirmation short of the threshold.
        let mut pending = purchase_event(2, 42, 7_000, 0);
        pending.confirmation_increment = Some(2);
        ledger.ingest_at(&pending, at(1_001)).unwrap();

        // Failed purchase.
        let mut failed = purchase_event(3, 42, 9_000, 0);
        failed.confirmation_increment = None;
        failed.failed = true;
        ledger.ingest_at(&failed, at(1_002)).unwrap();

        let stats = ledger.stats_snapshot().unwrap();
        assert_eq!(stats.total_sales, 1);
        assert_eq!(stats.total_volume, Amount::new(5_000));
    }

    #[test]
    fn empty_ledger_yields_zero_stats() {
        let stats = test_ledger().stats_snapshot().unwrap();
        assert_eq!(stats.total_sales, 0);
        assert_eq!(stats.total_volume, Amount::ZERO);
        assert_eq!(stats.average_price, Amount::ZERO);
        assert_eq!(stats.total_fees, Amount::ZERO);
    }

    #[test]
    fn average_uses_floor_division() {
        let ledger = test_ledger();
        ledger
            .ingest_at(&purchase_event(1, 42, 10, 0), at(1_000))
            .unwrap();
        ledger
            .ingest_at(&purchase_event(2, 42, 11, 0), at(1_001))
            .unwrap();

        let stats = ledger.stats_snapshot().unwrap();
        assert_eq!(stats.average_price, Amount::new(10));
    }

    #[test]
    fn purchase_history_is_confirmed_only_newest_first() {
        let ledger = test_ledger();
        ledger
            .ingest_at(&purchase_event(1, 42, 1_000, 0), at(1_000))
            .unwrap();
        ledger
            .ingest_at(&purchase_event(2, 42, 2_000, 0), at(2_000))
            .unwrap();

        // Pending purchase for the same token must not appear.
        let mut pending = purchase_event(3, 42, 3_000, 0);
        pending.confirmation_increment = None;
        ledger.ingest_at(&pending, at(3_000)).unwrap();

        // Confirmed purchase of a different token must not appear.
        ledger
            .ingest_at(&purchase_event(4, 7, 4_000, 0), at(4_000))
            .unwrap();

        let history = ledger.purchase_history(42).unwrap();
        let hashes: Vec<String> = history.iter().map(|r| r.tx_hash.to_string()).collect();
        assert_eq!(hashes, vec![hash_hex(2), hash_hex(1)]);
    }

    #[test]
    fn user_activity_delegates_to_party_listing() {
        let ledger = test_ledger();
        ledger
            .ingest_at(&purchase_event(1, 42, 1_000, 0), at(1_000))
            .unwrap();
        ledger
            .ingest_at(&purchase_event(2, 43, 2_000, 0), at(2_000))
            .unwrap();

        let address = Address::parse(&buyer()).unwrap();
        let activity = ledger.user_activity(&address).unwrap();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].token_id, 43);
    }

    #[test]
    fn record_lookup_maps_not_found() {
        let ledger = test_ledger();
        let err = ledger.record(&TxHash::new([9u8; 32])).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}

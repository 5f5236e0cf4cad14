//! Stateless event validation.
//!
//! Checks the rule table for the event kind once, parses wire strings into
//! typed values, and builds the initial Pending record. Stateful outcomes
//! (dedup, confirmation advancement, failure) are decided by the store.

use crate::{ChainEvent, EventError};
use curio_types::{
    Address, Amount, LedgerParams, PartyRole, Timestamp, TransactionRecord, TxHash, TxStatus,
};

/// A validated event: the initial record plus its ingestion directives.
#[derive(Clone, Debug)]
pub struct ValidatedEvent {
    /// The record as it would be created on first ingestion: Pending, zero
    /// confirmations, `created_at = now`.
    pub record: TransactionRecord,
    /// Confirmations to apply after the upsert; zero when the event carried
    /// none.
    pub confirmation_increment: u64,
    /// Whether this event is a reversal/failure signal.
    pub failed: bool,
}

/// Validate an inbound event against the party and price rules for its kind.
///
/// `now` becomes the record's `created_at` when the hash turns out to be
/// unseen; callers pass the ingestion time so tests can pin the clock.
pub fn validate_event(
    event: &ChainEvent,
    params: &LedgerParams,
    now: Timestamp,
) -> Result<ValidatedEvent, EventError> {
    let tx_hash = TxHash::from_hex(&event.tx_hash)
        .ok_or_else(|| EventError::InvalidHash(event.tx_hash.clone()))?;
    let contract = parse_address("contract", &event.contract)?;
    let buyer = parse_party("buyer", event.buyer.as_deref())?;
    let seller = parse_party("seller", event.seller.as_deref())?;
    let creator = parse_party("creator", event.creator.as_deref())?;

    for role in event.kind.required_parties() {
        let present = match role {
            PartyRole::Buyer => buyer.is_some(),
            PartyRole::Seller => seller.is_some(),
            PartyRole::Creator => creator.is_some(),
        };
        if !present {
            return Err(EventError::MissingField {
                kind: event.kind,
                field: role.as_str(),
            });
        }
    }

    let price = match event.price.as_deref() {
        Some(raw) => Some(parse_amount("price", raw)?),
        None => None,
    };
    if event.kind.requires_price() && price.is_none() {
        return Err(EventError::MissingField {
            kind: event.kind,
            field: "price",
        });
    }

    let gas_used = parse_u64("gas_used", &event.gas_used)?;
    let gas_price = match event.gas_price.as_deref() {
        Some(raw) => Some(parse_amount("gas_price", raw)?),
        None => None,
    };
    let platform_fee = match event.platform_fee.as_deref() {
        Some(raw) => parse_amount("platform_fee", raw)?,
        None => Amount::ZERO,
    };
    let royalty_fee = match event.royalty_fee.as_deref() {
        Some(raw) => parse_amount("royalty_fee", raw)?,
        None => Amount::ZERO,
    };

    let confirmation_increment = match event.confirmation_increment {
        Some(0) => return Err(EventError::ZeroIncrement),
        Some(n) => n,
        None => 0,
    };

    let currency = event
        .currency
        .clone()
        .unwrap_or_else(|| params.base_currency.clone());

    Ok(ValidatedEvent {
        record: TransactionRecord {
            tx_hash,
            block_number: event.block_number,
            token_id: event.token_id,
            contract,
            kind: event.kind,
            price,
            currency,
            buyer,
            seller,
            creator,
            gas_used,
            gas_price,
            platform_fee,
            royalty_fee,
            metadata: event.metadata.clone(),
            status: TxStatus::Pending,
            confirmations: 0,
            created_at: now,
            confirmed_at: None,
        },
        confirmation_increment,
        failed: event.failed,
    })
}

fn parse_address(field: &'static str, raw: &str) -> Result<Address, EventError> {
    Address::parse(raw).ok_or_else(|| EventError::InvalidAddress {
        field,
        value: raw.to_string(),
    })
}

fn parse_party(field: &'static str, raw: Option<&str>) -> Result<Option<Address>, EventError> {
    raw.map(|s| parse_address(field, s)).transpose()
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Amount, EventError> {
    Amount::parse(raw).ok_or_else(|| EventError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_u64(field: &'static str, raw: &str) -> Result<u64, EventError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EventError::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    raw.parse::<u64>().map_err(|_| EventError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

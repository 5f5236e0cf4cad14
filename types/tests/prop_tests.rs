use proptest::prelude::*;

use curio_types::{apply_delta, Amount, Transition, TxHash, TxStatus};

proptest! {
    /// TxHash roundtrip: new -> as_bytes -> new produces identical hash.
    #[test]
    fn tx_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// TxHash hex display parses back to the same hash.
    #[test]
    fn tx_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(TxHash::from_hex(&hash.to_string()), Some(hash));
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// TxHash bincode serialization roundtrip.
    #[test]
    fn tx_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: TxHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.as_bytes(), hash.as_bytes());
    }

    /// Amount decimal-string parse roundtrip.
    #[test]
    fn amount_parse_roundtrip(raw in 0u128..u128::MAX) {
        let amount = Amount::new(raw);
        prop_assert_eq!(Amount::parse(&amount.to_string()), Some(amount));
    }

    /// Amount: checked_add(a, b) == Some(a + b) when no overflow.
    #[test]
    fn amount_checked_add(a in 0u128..u128::MAX / 2, b in 0u128..u128::MAX / 2) {
        let sum = Amount::new(a).checked_add(Amount::new(b));
        prop_assert_eq!(sum, Some(Amount::new(a + b)));
    }

    /// Amount: saturating_sub never panics and returns ZERO on underflow.
    #[test]
    fn amount_saturating_sub(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = Amount::new(a).saturating_sub(Amount::new(b));
        if b > a {
            prop_assert_eq!(result, Amount::ZERO);
        } else {
            prop_assert_eq!(result, Amount::new(a - b));
        }
    }

    /// A Pending record's confirmation count after a delta is exactly the
    /// saturating sum, and the transition fires iff the sum crosses the
    /// threshold.
    #[test]
    fn delta_crosses_iff_threshold_reached(
        confirmations in 0u64..10_000,
        delta in 1u64..10_000,
        threshold in 1u64..10_000,
    ) {
        let expected = confirmations + delta;
        match apply_delta(TxStatus::Pending, confirmations, delta, threshold) {
            Transition::Confirmed { confirmations: got } => {
                prop_assert_eq!(got, expected);
                prop_assert!(expected >= threshold);
            }
            Transition::Advanced { confirmations: got } => {
                prop_assert_eq!(got, expected);
                prop_assert!(expected < threshold);
            }
            Transition::Terminal => prop_assert!(false, "Pending is never terminal"),
        }
    }

    /// Terminal states never transition, for any delta and threshold.
    #[test]
    fn terminal_states_never_transition(
        confirmations in 0u64..10_000,
        delta in 1u64..10_000,
        threshold in 1u64..10_000,
    ) {
        prop_assert_eq!(
            apply_delta(TxStatus::Confirmed, confirmations, delta, threshold),
            Transition::Terminal
        );
        prop_assert_eq!(
            apply_delta(TxStatus::Failed, confirmations, delta, threshold),
            Transition::Terminal
        );
    }

    /// Splitting a delta into two deliveries reaches the same count as one
    /// batch, as long as neither partial delivery crosses the threshold.
    #[test]
    fn split_deliveries_accumulate(
        first in 1u64..100,
        second in 1u64..100,
    ) {
        let threshold = first + second;
        match apply_delta(TxStatus::Pending, 0, first, threshold) {
            Transition::Advanced { confirmations } => {
                prop_assert_eq!(confirmations, first);
                prop_assert_eq!(
                    apply_delta(TxStatus::Pending, confirmations, second, threshold),
                    Transition::Confirmed { confirmations: first + second }
                );
            }
            other => prop_assert!(false, "first delivery cannot cross: {:?}", other),
        }
    }
}

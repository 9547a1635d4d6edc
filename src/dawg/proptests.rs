use std::collections::BTreeSet;

use proptest::prelude::*;

use super::owned::{build, PackedDawg};
use super::varint::{decode_signed, decode_unsigned, encode_signed, encode_unsigned};

/// Sorted distinct keys over a small alphabet, so keys share many prefixes
/// and suffixes. Values are a bijection of the rank, hence distinct.
fn keyed_values() -> impl Strategy<Value = Vec<(Vec<u8>, i64)>> {
    (
        prop::collection::btree_set(prop::collection::vec(b'a'..=b'd', 0..8), 0..64),
        any::<i64>(),
        any::<i64>(),
    )
        .prop_map(|(keys, multiplier, offset)| {
            let multiplier = multiplier | 1;
            keys.into_iter()
                .enumerate()
                .map(|(i, key)| (key, (i as i64).wrapping_mul(multiplier).wrapping_add(offset)))
                .collect()
        })
}

fn build_pairs(pairs: &[(Vec<u8>, i64)]) -> PackedDawg {
    build(pairs.iter().map(|(k, v)| (k, *v))).unwrap()
}

proptest! {
    #[test]
    fn unsigned_varint_round_trip(prefix in prop::collection::vec(any::<u8>(), 0..4), value in any::<u64>()) {
        let mut buf = prefix.clone();
        encode_unsigned(value, &mut buf);
        prop_assert_eq!(decode_unsigned(&buf, prefix.len()).unwrap(), (value, buf.len()));
    }

    #[test]
    fn signed_varint_round_trip(prefix in prop::collection::vec(any::<u8>(), 0..4), value in any::<i64>()) {
        let mut buf = prefix.clone();
        encode_signed(value, &mut buf);
        prop_assert_eq!(decode_signed(&buf, prefix.len()).unwrap(), (value, buf.len()));
    }

    #[test]
    fn every_key_round_trips(pairs in keyed_values()) {
        let dawg = build_pairs(&pairs);
        prop_assert_eq!(dawg.len(), pairs.len());
        for (key, value) in &pairs {
            prop_assert_eq!(dawg.lookup(key).unwrap(), Some(*value));
            let found = dawg.inverse_lookup(*value).unwrap();
            prop_assert_eq!(found.as_ref(), Some(key));
        }
    }

    #[test]
    fn absent_keys_are_not_found(
        pairs in keyed_values(),
        candidates in prop::collection::vec(prop::collection::vec(b'a'..=b'e', 0..9), 0..32),
    ) {
        let dawg = build_pairs(&pairs);
        let keys: BTreeSet<&Vec<u8>> = pairs.iter().map(|(k, _)| k).collect();
        for candidate in candidates.iter().filter(|c| !keys.contains(c)) {
            prop_assert_eq!(dawg.lookup(candidate).unwrap(), None);
        }
    }

    #[test]
    fn packing_is_deterministic(pairs in keyed_values()) {
        prop_assert_eq!(build_pairs(&pairs), build_pairs(&pairs));
    }

    #[test]
    fn iter_matches_input(pairs in keyed_values()) {
        let dawg = build_pairs(&pairs);
        let decoded: Vec<(Vec<u8>, i64)> = dawg.iter().collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(decoded, pairs);
    }
}

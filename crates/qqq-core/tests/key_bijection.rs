use std::collections::HashSet;

use qqq_core::{canonical_key, CanonicalKey, IndexTuple, KeyTable, QqqError, KEY_BITS};
use proptest::prelude::*;

fn every_tuple() -> Vec<IndexTuple> {
    let mut tuples = Vec::new();
    for s1 in 1..=4 {
        for s2 in 1..=4 {
            for s3 in 1..=4 {
                for d1 in -3..=3 {
                    for d2 in -3..=3 {
                        for d3 in -3..=3 {
                            for length in 0..=15 {
                                tuples.push(
                                    IndexTuple::new([s1, s2, s3], [d1, d2, d3], length).unwrap(),
                                );
                            }
                        }
                    }
                }
            }
        }
    }
    tuples
}

#[test]
fn exhaustive_range_is_collision_free() {
    let mut seen = HashSet::new();
    let mut count = 0usize;
    for tuple in every_tuple() {
        let key = CanonicalKey::encode(&tuple);
        assert!(key.as_raw() < 1 << KEY_BITS);
        assert!(seen.insert(key), "collision for {tuple}");
        assert_eq!(key.decode().unwrap(), tuple);
        count += 1;
    }
    assert_eq!(count, 4 * 4 * 4 * 7 * 7 * 7 * 16);
}

#[test]
fn known_layout_values() {
    assert_eq!(canonical_key(1, 1, 1, -3, -3, -3, 0).unwrap().as_raw(), 0);
    assert_eq!(canonical_key(1, 1, 1, 0, 0, 0, 0).unwrap().as_raw(), (3 << 10) + (3 << 7) + (3 << 4));
    assert_eq!(
        canonical_key(2, 1, 1, 0, 0, 0, 3).unwrap().as_raw(),
        (1 << 17) + (3 << 10) + (3 << 7) + (3 << 4) + 3
    );
}

#[test]
fn out_of_range_fields_are_rejected() {
    for (fields, code) in [
        ([0, 1, 1, 0, 0, 0, 0], "spin-range"),
        ([1, 5, 1, 0, 0, 0, 0], "spin-range"),
        ([1, 1, 1, 4, 0, 0, 0], "displacement-range"),
        ([1, 1, 1, 0, 0, -4, 0], "displacement-range"),
        ([1, 1, 1, 0, 0, 0, 16], "length-range"),
        ([1, 1, 1, 0, 0, 0, -1], "length-range"),
    ] {
        let [s1, s2, s3, d1, d2, d3, l] = fields;
        match canonical_key(s1, s2, s3, d1, d2, d3, l) {
            Err(QqqError::HashRange(info)) => assert_eq!(info.code, code),
            other => panic!("expected range error for {fields:?}, got {other:?}"),
        }
    }
}

#[test]
fn decode_rejects_unused_bit_patterns() {
    let seven_in_d3 = CanonicalKey::from_raw(7 << 4);
    assert!(matches!(seven_in_d3.decode(), Err(QqqError::HashRange(_))));
    let above_layout = CanonicalKey::from_raw(1 << KEY_BITS);
    assert!(matches!(above_layout.decode(), Err(QqqError::HashRange(_))));
}

#[test]
fn key_table_records_each_key_once() {
    let mut table = KeyTable::new();
    let tuple = IndexTuple::new([1, 2, 3], [0, -1, 2], 3).unwrap();
    let first = table.record(&tuple).unwrap();
    let second = table.record(&tuple).unwrap();
    assert_eq!(first, second);
    assert_eq!(table.len(), 1);
    assert_eq!(table.tuple(first), Some(&tuple));
}

fn tuple_strategy() -> impl Strategy<Value = IndexTuple> {
    (
        prop::array::uniform3(1i32..=4),
        prop::array::uniform3(-3i32..=3),
        0i32..=15,
    )
        .prop_map(|(spins, disps, length)| IndexTuple::new(spins, disps, length).unwrap())
}

proptest! {
    #[test]
    fn distinct_tuples_get_distinct_keys(a in tuple_strategy(), b in tuple_strategy()) {
        let ka = CanonicalKey::encode(&a);
        let kb = CanonicalKey::encode(&b);
        prop_assert_eq!(a == b, ka == kb);
        prop_assert_eq!(ka.decode().unwrap(), a);
    }

    #[test]
    fn recording_is_idempotent(tuples in prop::collection::vec(tuple_strategy(), 1..40)) {
        let mut table = KeyTable::new();
        for tuple in &tuples {
            table.record(tuple).unwrap();
        }
        let snapshot = table.clone();
        for tuple in &tuples {
            table.record(tuple).unwrap();
        }
        prop_assert_eq!(&table, &snapshot);
        let distinct: HashSet<_> = tuples.iter().collect();
        prop_assert_eq!(table.len(), distinct.len());
    }
}

#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can
// reach the bucket layout directly.

use crate::chained_table::{ChainedHashTable, Placement};
use crate::config::{ChainScan, TableConfig};
use crate::hashing::hashing;
use crate::stats::{AllocStats, Counters};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=4, proptest::collection::vec("[a-z]{0,3}", 1..=24)).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => "[a-z]{0,3}".prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

fn is_doubling_of(capacity: usize, initial: usize) -> bool {
    capacity % initial == 0 && (capacity / initial).is_power_of_two()
}

// Layout invariants that hold in every scan mode:
// - `len` equals the number of reachable entries;
// - every entry sits in the slot its hash selects;
// - `get` answers with the first entry for the key in chain order.
fn check_layout<O: AllocStats>(t: &ChainedHashTable<O>) -> Result<(), TestCaseError> {
    let cap = t.capacity();
    let mut first: HashMap<&str, i32> = HashMap::new();
    let mut count = 0;
    for (slot, k, v) in t.iter() {
        prop_assert_eq!(slot, hashing(k) as usize % cap);
        first.entry(k).or_insert(v);
        count += 1;
    }
    prop_assert_eq!(count, t.len());
    for (k, v) in first {
        prop_assert_eq!(t.get(k), Ok(v));
    }
    Ok(())
}

// Property: with a full scan the table is a map. State-machine equivalence
// against std::collections::HashMap:
// - `insert` reports `Updated` exactly when the model already had the key;
// - `get`/`contains_key` agree with the model; `len` matches after each op;
// - capacity is the initial capacity times a power of two and never shrinks.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_full_scan_matches_model((cap, pool, ops) in arb_scenario()) {
        let mut sut = ChainedHashTable::with_config(
            TableConfig::default().with_initial_capacity(cap).with_scan(ChainScan::Full),
        );
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut last_cap = sut.capacity();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = &pool[i];
                    let placement = sut.insert(k, v);
                    let prev = model.insert(k.clone(), v);
                    prop_assert_eq!(placement == Placement::Updated, prev.is_some());
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k).ok(), model.get(k).copied());
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Iterate => {
                    let mut seen: Vec<(String, i32)> =
                        sut.iter().map(|(_, k, v)| (k.to_string(), v)).collect();
                    let mut expected: Vec<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    seen.sort();
                    expected.sort();
                    prop_assert_eq!(seen, expected);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.capacity() >= last_cap);
            prop_assert!(is_doubling_of(sut.capacity(), cap));
            last_cap = sut.capacity();
        }
        check_layout(&sut)?;
    }
}

// Property: with the truncated scan, structure stays consistent even when
// duplicates pile up:
// - layout invariants after every op;
// - `Updated` is only ever reported for a key that was already present and
//   never changes `len`; `Inserted` adds exactly one entry;
// - after an insert, `get` of that key succeeds;
// - a key written only once is always found with its value.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_truncated_scan_structure((cap, pool, ops) in arb_scenario()) {
        let mut sut = ChainedHashTable::new(cap);
        let mut writes: HashMap<String, (usize, i32)> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = &pool[i];
                    let before = sut.len();
                    let present = sut.contains_key(k);
                    match sut.insert(k, v) {
                        Placement::Updated => {
                            prop_assert!(present);
                            prop_assert_eq!(sut.len(), before);
                        }
                        Placement::Inserted => prop_assert_eq!(sut.len(), before + 1),
                    }
                    prop_assert!(sut.contains_key(k));
                    let e = writes.entry(k.clone()).or_insert((0, v));
                    e.0 += 1;
                    e.1 = v;
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    match writes.get(k) {
                        Some(&(1, v)) => prop_assert_eq!(sut.get(k), Ok(v)),
                        Some(_) => prop_assert!(sut.get(k).is_ok()),
                        None => prop_assert!(sut.get(k).is_err()),
                    }
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), writes.contains_key(&s));
                }
                OpI::Iterate => check_layout(&sut)?,
            }
            prop_assert!(is_doubling_of(sut.capacity(), cap));
        }
        check_layout(&sut)?;
    }
}

// Property: counters stay balanced for any insert sequence, including the
// entries released and recreated by each grow, and return to zero on drop.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_counters_balance((cap, pool, ops) in arb_scenario()) {
        let stats = Counters::new();
        {
            let mut sut = ChainedHashTable::with_stats(cap, &stats);
            for op in ops {
                if let OpI::Insert(i, v) = op {
                    sut.insert(&pool[i], v);
                }
                prop_assert_eq!(stats.tables(), 1);
                prop_assert_eq!(stats.entries(), sut.len());
                prop_assert_eq!(stats.allocations(), 2 + 2 * sut.len());
            }
        }
        prop_assert!(stats.is_balanced());
    }
}

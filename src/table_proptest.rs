#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// the bucket/chain structure, not just the public surface.

use crate::strategy::{EqComparator, KeyComparator, KeyHasher};
use crate::table::{ChainedHashMap, Release};
use crate::MAX_LOAD_FACTOR;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Lookup(usize),
    Present(String),
    Mutate(usize, i32),
    Grow,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let present_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Lookup),
            1 => prop_oneof![present_pool, "[a-z]{0,5}"].prop_map(OpI::Present),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Grow),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised after every op:
// - insert returns the displaced (key, value) exactly when the model had the key.
// - remove hands back the stored pair; absent keys leave len unchanged.
// - lookup/is_present parity with the model.
// - every node sits in bucket `hash mod capacity`, reachable exactly once.
// - capacity never shrinks; load factor stays at or below 0.5.
fn run_state_machine<H, C>(
    mut sut: ChainedHashMap<String, i32, H, C>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String>,
    C: KeyComparator<String>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let displaced = sut.insert(k.clone(), v);
                match model.insert(k.clone(), v) {
                    Some(old) => prop_assert_eq!(displaced, Some((k, old))),
                    None => prop_assert!(displaced.is_none()),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                let expected = model.remove(k).map(|v| (k.clone(), v));
                prop_assert_eq!(removed, expected);
                prop_assert!(!sut.is_present(k));
            }
            OpI::Lookup(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.lookup(k), model.get(k));
            }
            OpI::Present(s) => {
                prop_assert_eq!(sut.is_present(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.lookup_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "presence mismatch for {:?}", k),
                }
            }
            OpI::Grow => {
                prop_assert!(sut.try_grow().is_ok());
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().len(), model.len());
            }
        }

        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= capacity, "capacity shrank");
        prop_assert!(sut.load_factor() <= MAX_LOAD_FACTOR);
        capacity = sut.capacity();
    }

    // Whatever is left comes back intact when nothing is released.
    let retained = sut.destroy(Release::NONE);
    let mut pairs: Vec<_> = retained.keys.into_iter().zip(retained.values).collect();
    pairs.sort();
    let mut expected: Vec<_> = model.into_iter().collect();
    expected.sort();
    prop_assert_eq!(pairs, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(ChainedHashMap::new(), &pool, ops)?;
    }
}

// Same invariants under worst-case collisions: every key hashes to 0, so
// everything shares one chain and equality alone resolves entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_strategies(|_: &String| 0u64, EqComparator);
        run_state_machine(sut, &pool, ops)?;
    }
}

// Weak hash (string length) so chains are long but spread over a few buckets,
// and resizes move nodes between non-empty chains.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_weak_hash((pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_strategies(|k: &String| k.len() as u64, EqComparator);
        run_state_machine(sut, &pool, ops)?;
    }
}

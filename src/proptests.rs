use super::*;
use crate::tests::check_invariants;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

const NARROW_BITS: u32 = 12;

#[derive(Clone, Debug)]
enum Op {
    Insert(u64, u32),
    Remove(u64),
    Get(u64),
    Predecessor(u64),
    Successor(u64),
    Floor(u64),
    Ceiling(u64),
}

fn ops_strategy(key: impl Strategy<Value = u64> + Clone) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        40 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        10 => key.clone().prop_map(Op::Get),
        10 => key.clone().prop_map(Op::Predecessor),
        10 => key.clone().prop_map(Op::Successor),
        3 => key.clone().prop_map(Op::Floor),
        2 => key.prop_map(Op::Ceiling),
    ];
    prop::collection::vec(op, 0..=1000)
}

// Clusters plus the extremes, so deep shared prefixes actually occur.
fn wide_key() -> impl Strategy<Value = u64> + Clone {
    prop_oneof![
        any::<u64>(),
        0u64..64,
        (u64::MAX - 64)..=u64::MAX,
        (1u64 << 63) - 32..(1u64 << 63) + 32,
    ]
}

fn run_ops(mut t: XFastMap<u32>, ops: Vec<Op>) -> std::result::Result<(), TestCaseError> {
    let mut m: BTreeMap<u64, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(t.insert(k, v), Ok(m.insert(k, v)));
            }
            Op::Remove(k) => {
                prop_assert_eq!(t.remove(k), Ok(m.remove(&k)));
            }
            Op::Get(k) => {
                prop_assert_eq!(t.get(k), m.get(&k));
                prop_assert_eq!(t.contains_key(k), m.contains_key(&k));
            }
            Op::Predecessor(k) => {
                let expected = m.range(..k).next_back().map(|(&k, v)| (k, v));
                prop_assert_eq!(t.predecessor(k), Ok(expected));
            }
            Op::Successor(k) => {
                let expected = m.range((Excluded(k), Unbounded)).next().map(|(&k, v)| (k, v));
                prop_assert_eq!(t.successor(k), Ok(expected));
            }
            Op::Floor(k) => {
                let expected = m.range(..=k).next_back().map(|(&k, v)| (k, v));
                prop_assert_eq!(t.floor(k), Ok(expected));
            }
            Op::Ceiling(k) => {
                let expected = m.range(k..).next().map(|(&k, v)| (k, v));
                prop_assert_eq!(t.ceiling(k), Ok(expected));
            }
        }

        prop_assert_eq!(t.len(), m.len());
        prop_assert_eq!(t.leftmost(), m.first_key_value().map(|(&k, v)| (k, v)));
        prop_assert_eq!(t.rightmost(), m.last_key_value().map(|(&k, v)| (k, v)));
    }

    check_invariants(&t);
    let got: Vec<(u64, u32)> = t.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(u64, u32)> = m.iter().map(|(&k, &v)| (k, v)).collect();
    prop_assert_eq!(got, expected);
    let got_rev: Vec<u64> = t.keys().rev().collect();
    let expected_rev: Vec<u64> = m.keys().rev().copied().collect();
    prop_assert_eq!(got_rev, expected_rev);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_narrow(ops in ops_strategy(0u64..(1 << NARROW_BITS))) {
        let t = XFastMap::with_key_bits(NARROW_BITS).unwrap();
        run_ops(t, ops)?;
    }

    #[test]
    fn prop_equivalence_wide(ops in ops_strategy(wide_key())) {
        run_ops(XFastMap::new(), ops)?;
    }

    #[test]
    fn prop_set_round_trip(
        base in prop::collection::btree_set(0u64..256, 0..64),
        extra in 0u64..256,
    ) {
        let mut set = XFastSet::with_key_bits(8).unwrap();
        for &k in &base {
            prop_assert_eq!(set.insert(k), Ok(true));
        }
        let before = set.clone();

        let was_present = base.contains(&extra);
        prop_assert_eq!(set.insert(extra), Ok(!was_present));
        prop_assert_eq!(set.insert(extra), Ok(false));
        if !was_present {
            prop_assert_eq!(set.remove(extra), Ok(true));
            prop_assert_eq!(&set, &before);
            prop_assert_eq!(set.insert(extra), Ok(true));
        }
        prop_assert_eq!(set.remove(extra), Ok(true));
        prop_assert_eq!(set.remove(extra), Ok(false));

        let expected: BTreeSet<u64> = base.iter().copied().filter(|&k| k != extra).collect();
        prop_assert_eq!(set.iter().collect::<BTreeSet<u64>>(), expected);
        check_invariants(&set.map);
    }
}

//! Property-based tests for the substitution algebra
//!
//! Tests invariants that should hold for ALL possible inputs:
//! - Roundtrip: to_list(of_list(xs)) == xs for duplicate-free xs
//! - Partition: both halves together reconstruct the substitution
//! - Consistency: the common part of symmetric_difference is join
//! - Conflicts: extend refuses to rebind an identifier

use proptest::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::collections::HashSet;
use symheap_core::features::symbolic_heap::{exp_sub, ExpSubst, FreeVariables, Subst};
use symheap_core::shared::models::{BinOp, Exp, Ident};

fn ident(k: u8) -> Ident {
    if k % 2 == 0 {
        Ident::normal("v", k as u64)
    } else {
        Ident::primed("v", k as u64)
    }
}

fn subst_of(pairs: &[(u8, i8)]) -> ExpSubst {
    ExpSubst::of_list_duplicates(pairs.iter().map(|&(k, v)| (ident(k), Exp::int(v as i64))).collect())
}

// ============================================================================
// QuickCheck Tests (simpler, faster)
// ============================================================================

#[quickcheck]
fn qc_of_list_roundtrip(pairs: Vec<(u8, i64)>) -> TestResult {
    let keys: HashSet<u8> = pairs.iter().map(|(k, _)| *k).collect();
    if keys.len() != pairs.len() {
        return TestResult::discard();
    }
    let list: Vec<(Ident, Exp)> = pairs.iter().map(|&(k, v)| (ident(k), Exp::int(v))).collect();
    TestResult::from_bool(ExpSubst::of_list(list.clone()).to_list() == list)
}

#[quickcheck]
fn qc_of_list_duplicates_keeps_first(pairs: Vec<(u8, i8)>) -> bool {
    let sub = subst_of(&pairs);
    pairs.iter().all(|(k, _)| {
        let first = pairs.iter().find(|(k2, _)| k2 == k).map(|&(_, v)| Exp::int(v as i64));
        sub.get(&ident(*k)) == first.as_ref()
    })
}

#[quickcheck]
fn qc_extend_conflicts(pairs: Vec<(u8, i8)>, k: u8, v: i8) -> bool {
    let sub = subst_of(&pairs);
    let exp = Exp::int(v as i64);
    match sub.get(&ident(k)).cloned() {
        Some(bound) if bound == exp => sub.extend(ident(k), exp) == Some(sub.clone()),
        Some(_) => sub.extend(ident(k), exp).is_none(),
        None => sub
            .extend(ident(k), exp.clone())
            .map(|s| s.get(&ident(k)) == Some(&exp) && s.len() == sub.len() + 1)
            .unwrap_or(false),
    }
}

#[quickcheck]
fn qc_partitions_reconstruct(pairs: Vec<(u8, i8)>) -> bool {
    let sub = subst_of(&pairs);

    let (positive, rest) = sub.range_partition(|e| matches!(e, Exp::Const(_)) && e > &Exp::int(0));
    let (primed, normal) = sub.domain_partition(Ident::is_primed);

    let rebuilt = |a: &ExpSubst, b: &ExpSubst| {
        let mut all = a.to_list();
        all.extend(b.to_list());
        ExpSubst::of_list(all)
    };
    rebuilt(&positive, &rest) == sub
        && rebuilt(&primed, &normal) == sub
        && primed.domain().all(Ident::is_primed)
        && normal.domain().all(|id| !id.is_primed())
}

// ============================================================================
// Proptest Tests (more control over generation)
// ============================================================================

fn pairs_strategy() -> impl Strategy<Value = Vec<(u8, i8)>> {
    prop::collection::vec((0u8..12, -3i8..3), 0..10)
}

fn exp_strategy() -> impl Strategy<Value = Exp> {
    let leaf = prop_oneof![(0u8..12).prop_map(|k| Exp::var(ident(k))), (-5i64..5).prop_map(Exp::int),];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Exp::binop(BinOp::PlusA, a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| Exp::lindex(a, b)),
        ]
    })
}

proptest! {
    #[test]
    fn prop_symmetric_difference_consistent(
        left in pairs_strategy(),
        right in pairs_strategy(),
    ) {
        let (s1, s2) = (subst_of(&left), subst_of(&right));
        let (common, only1, only2) = s1.symmetric_difference(&s2);

        // Invariant: common part is join, and appears identically on both sides
        prop_assert_eq!(&common, &s1.join(&s2));
        for (id, e) in common.iter() {
            prop_assert_eq!(s1.get(id), Some(e));
            prop_assert_eq!(s2.get(id), Some(e));
            prop_assert!(!only1.mem(id));
            prop_assert!(!only2.mem(id));
        }
        prop_assert_eq!(common.len() + only1.len(), s1.len());
        prop_assert_eq!(common.len() + only2.len(), s2.len());
    }

    #[test]
    fn prop_substitution_removes_mapped_vars(
        pairs in pairs_strategy(),
        exp in exp_strategy(),
    ) {
        let sub = subst_of(&pairs);
        let out = exp_sub(&Subst::Exp(sub.clone()), &exp);

        // constants in the range: no domain identifier survives
        prop_assert!(!out.has_free_var(|id| sub.mem(id)));
        // identifiers outside the domain are untouched
        let kept: Vec<&Ident> = exp.free_vars().filter(|id| !sub.mem(id)).collect();
        let after: Vec<&Ident> = out.free_vars().collect();
        prop_assert_eq!(kept, after);
    }

    #[test]
    fn prop_empty_substitution_is_identity(exp in exp_strategy()) {
        prop_assert_eq!(exp_sub(&Subst::Exp(ExpSubst::empty()), &exp), exp);
    }
}

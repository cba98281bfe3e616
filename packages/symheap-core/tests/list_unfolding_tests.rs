//! Integration tests: unfolding list segments the way the engine does
//!
//! Build a segment, rename it at a call site, unfold its closure, compact the
//! resulting working set and number its closures for rendering.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use symheap_core::features::symbolic_heap::*;
use symheap_core::shared::models::{Exp, Ident};

#[test]
fn test_unfold_non_empty_segment() {
    let builder = ListParaBuilder::new(100).linking_root_to_next();
    let para = builder.build();
    let (addr_a, addr_b) = (var(&nid("a", 1)), var(&nid("b", 2)));

    let seg = Hpred::lseg(LsegKind::NonEmpty, para.clone(), addr_a.clone(), addr_b.clone(), vec![]);
    let unfolded = para.instantiate(seg.lhs(), &addr_b, &[]).unwrap();

    assert!(unfolded.fresh_ids.is_empty());
    assert_eq!(unfolded.body, vec![Hpred::points_to(addr_a, scalar(addr_b), Exp::int(8))]);
}

#[test]
fn test_repeated_unfolding_never_aliases_existentials() {
    let hidden = pid("hidden", 7);
    let builder = ListParaBuilder::new(200).with_existential(hidden.clone());
    let cell = node_cell(var(builder.root()), &[("next", var(&hidden)), ("data", Exp::int(0))]);
    let tail = Hpred::points_to(var(&hidden), scalar(var(builder.next())), Exp::int(8));
    let para = builder.with_cell(cell).with_cell(tail).build();

    // actuals mention primed identifiers on purpose
    let head = var(&pid("h", 1));
    let next = var(&pid("n", 2));
    let first = para.instantiate(&head, &next, &[]).unwrap();
    let second = para.instantiate(&next, &head, &[]).unwrap();

    assert_eq!(first.fresh_ids.len(), 1);
    assert_eq!(second.fresh_ids.len(), 1);
    assert_disjoint(&first.fresh_ids, &second.fresh_ids);

    let actual_ids: Vec<Ident> = [&head, &next]
        .into_iter()
        .flat_map(|e| e.free_vars().cloned().collect::<Vec<_>>())
        .collect();
    assert_disjoint(&first.fresh_ids, &actual_ids);
    assert_disjoint(&second.fresh_ids, &actual_ids);

    // the existential is the only new identifier of the unfolded body
    let body_vars: Vec<Ident> = first
        .body
        .iter()
        .flat_map(|h| h.free_vars().cloned().collect::<Vec<_>>())
        .collect();
    assert!(body_vars.contains(&first.fresh_ids[0]));
    assert!(!body_vars.contains(&hidden));
}

#[test]
fn test_call_site_renaming_then_unfolding() {
    let para = Arc::new(ListParaBuilder::new(300).linking_root_to_next().build());
    let (formal_head, formal_tail) = (nid("x", 1), nid("y", 2));
    let seg = segment(Arc::clone(&para), var(&formal_head), var(&formal_tail));

    let actuals = ExpSubst::of_list(vec![
        (formal_head.clone(), Exp::int(0x1000)),
        (formal_tail.clone(), Exp::null()),
    ]);
    let renamed = hpred_sub(&Subst::Exp(actuals), &seg);
    assert_eq!(renamed.free_vars().count(), 0);

    match &renamed {
        Hpred::Lseg { para: p, head, tail, .. } => {
            assert_same_instance(p, &para);
            let unfolded = p.instantiate(head, tail, &[]).unwrap();
            assert_eq!(unfolded.body[0].lhs(), &Exp::int(0x1000));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unfolded_working_set_compacts_and_numbers() {
    let para = ListParaBuilder::new(400).linking_root_to_next().build();
    let mut sigma = Vec::new();
    for i in 0..4 {
        let cell = para.instantiate(&Exp::int(i), &Exp::int(i + 1), &[]).unwrap();
        sigma.extend(cell.body);
        sigma.push(segment(para.clone(), Exp::int(i + 1), Exp::null()));
    }

    let mut env = SharingEnv::new();
    let compacted: Vec<Arc<Hpred>> = sigma.iter().map(|h| compact(&mut env, h)).collect();
    assert_eq!(compacted.len(), sigma.len());
    for (before, after) in sigma.iter().zip(&compacted) {
        assert!(before.equal_with(after, InstComparison::Include));
    }

    let paras: Vec<&Arc<Hpara>> = compacted
        .iter()
        .filter_map(|h| match h.as_ref() {
            Hpred::Lseg { para, .. } => Some(para),
            _ => None,
        })
        .collect();
    assert_eq!(paras.len(), 4);
    paras.windows(2).for_each(|w| assert_same_instance(w[0], w[1]));
    assert_eq!(env.stats().unique_hparas, 1);

    let mut registry = PredicateRegistry::new();
    compacted.iter().for_each(|h| registry.process_hpred(h));
    assert_eq!(registry.hpara_id(&para), Some(1));
    let mut visited = 0;
    registry.iter(
        |id, _| {
            assert_eq!(id, 1);
            visited += 1;
        },
        |_, _| unreachable!(),
    );
    assert_eq!(visited, 1);
}

#[test]
fn test_terms_survive_json_roundtrip() {
    let para = ListParaBuilder::new(500).linking_root_to_next().build();
    let seg = segment(para, var(&nid("a", 1)), Exp::null());
    let json = serde_json::to_string(&seg).unwrap();
    let back: Hpred = serde_json::from_str(&json).unwrap();
    assert!(back.equal_with(&seg, InstComparison::Include));
}

#[test]
fn test_join_failure_keeps_paths_apart() {
    let alloc = Inst::Alloc;
    let returned = Inst::return_from_call(&symheap_core::shared::models::Location::new("list.c", 12, 3));
    let merged = match alloc.partial_join(&returned) {
        InstJoin::Joined(inst) => Some(inst),
        InstJoin::Incompatible => None,
    };
    assert_eq!(merged, None);
    assert_eq!(alloc.partial_meet(&returned), Inst::Alloc);
}

//! Predicate Instantiation - one unfolding step of a list definition
//!
//! ```text
//! instantiate(λ(root, next, svars). ∃evars. body, e_root, e_next, ē)
//!   = (ids, body[root ↦ e_root, next ↦ e_next, svars ↦ ē, evars ↦ ids])
//! ```
//!
//! `ids` are fresh primed identifiers. They are drawn from the process-wide
//! stamp counter, so two unfoldings never share an existential, and are also
//! checked against the identifiers of the actuals.
//!
//! ## Usage
//! ```rust,ignore
//! let unfolded = para.instantiate(&head, &Exp::var(next_cell), &shared)?;
//! sigma.extend(unfolded.body);
//! ```

use super::domain::{Hpara, HparaDll, Hpred};
use super::ports::{FreeVariables, Substitutable};
use super::substitution::{ExpSubst, Subst};
use crate::errors::{Result, SymHeapError};
use crate::shared::models::{Exp, Ident, IdentKind};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::trace;

/// Result of unfolding a closure once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    /// Stand-ins for the closure's existentials, in declaration order
    pub fresh_ids: Vec<Ident>,
    /// The body with every binder replaced
    pub body: Vec<Hpred>,
}

fn check_arity(what: &'static str, svars: &[Ident], shared: &[Exp]) -> Result<()> {
    if svars.len() != shared.len() {
        return Err(SymHeapError::ArityMismatch {
            what,
            expected: svars.len(),
            found: shared.len(),
        });
    }
    Ok(())
}

fn fresh_existentials<'a>(evars: &[Ident], actuals: impl IntoIterator<Item = &'a Exp>) -> Vec<Ident> {
    if evars.is_empty() {
        return Vec::new();
    }
    let taken: FxHashSet<&Ident> = actuals.into_iter().flat_map(|e| e.gen_free_vars()).collect();
    evars
        .iter()
        .map(|_| loop {
            let id = Ident::fresh(IdentKind::Primed);
            if !taken.contains(&id) {
                break id;
            }
        })
        .collect()
}

fn unfold(bindings: Vec<(Ident, Exp)>, body: &[Arc<Hpred>]) -> Vec<Hpred> {
    let sub = Subst::Exp(ExpSubst::of_list(bindings));
    body.iter().map(|h| h.apply_sub(&sub)).collect()
}

impl Hpara {
    pub fn instantiate(&self, root: &Exp, next: &Exp, shared: &[Exp]) -> Result<Instantiation> {
        check_arity("hpara", &self.svars, shared)?;
        let fresh_ids = fresh_existentials(&self.evars, [root, next].into_iter().chain(shared));

        let mut bindings = Vec::with_capacity(2 + self.svars.len() + self.evars.len());
        bindings.push((self.root.clone(), root.clone()));
        bindings.push((self.next.clone(), next.clone()));
        bindings.extend(self.svars.iter().cloned().zip(shared.iter().cloned()));
        bindings.extend(self.evars.iter().cloned().zip(fresh_ids.iter().cloned().map(Exp::Var)));

        let body = unfold(bindings, &self.body);
        trace!(
            root = %root,
            next = %next,
            fresh = fresh_ids.len(),
            cells = body.len(),
            "hpara instantiated"
        );
        Ok(Instantiation { fresh_ids, body })
    }
}

impl HparaDll {
    pub fn instantiate(&self, cell: &Exp, blink: &Exp, flink: &Exp, shared: &[Exp]) -> Result<Instantiation> {
        check_arity("hpara_dll", &self.svars, shared)?;
        let fresh_ids = fresh_existentials(&self.evars, [cell, blink, flink].into_iter().chain(shared));

        let mut bindings = Vec::with_capacity(3 + self.svars.len() + self.evars.len());
        bindings.push((self.cell.clone(), cell.clone()));
        bindings.push((self.blink.clone(), blink.clone()));
        bindings.push((self.flink.clone(), flink.clone()));
        bindings.extend(self.svars.iter().cloned().zip(shared.iter().cloned()));
        bindings.extend(self.evars.iter().cloned().zip(fresh_ids.iter().cloned().map(Exp::Var)));

        let body = unfold(bindings, &self.body);
        trace!(
            cell = %cell,
            fresh = fresh_ids.len(),
            cells = body.len(),
            "hpara_dll instantiated"
        );
        Ok(Instantiation { fresh_ids, body })
    }
}

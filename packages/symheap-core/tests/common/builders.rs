//! Test data builders
//!
//! This module provides builder patterns for creating heap terms.

use std::sync::Arc;
use symheap_core::features::symbolic_heap::{Hpara, Hpred, Inst, LsegKind, Strexp};
use symheap_core::shared::models::{Exp, FieldName, Ident, Typ};

/// Normal identifier
pub fn nid(name: &str, stamp: u64) -> Ident {
    Ident::normal(name, stamp)
}

/// Primed (existential) identifier
pub fn pid(name: &str, stamp: u64) -> Ident {
    Ident::primed(name, stamp)
}

pub fn var(id: &Ident) -> Exp {
    Exp::var(id.clone())
}

pub fn scalar(exp: Exp) -> Arc<Strexp> {
    Arc::new(Strexp::scalar(exp, Inst::Unknown))
}

/// `addr ↦ {field: value, ...} : sizeof(struct node)`
pub fn node_cell(addr: Exp, fields: &[(&str, Exp)]) -> Hpred {
    let fields = fields
        .iter()
        .map(|(name, value)| (FieldName::new(*name), scalar(value.clone())))
        .collect();
    Hpred::points_to(
        addr,
        Strexp::record(fields, Inst::Unknown),
        Exp::sizeof(Typ::structure("node")),
    )
}

/// Builder for singly-linked list parameters
#[derive(Debug)]
pub struct ListParaBuilder {
    root: Ident,
    next: Ident,
    svars: Vec<Ident>,
    evars: Vec<Ident>,
    body: Vec<Hpred>,
}

impl ListParaBuilder {
    /// `λ(root, next, []). ∃[]. []` with binders stamped from `base`
    pub fn new(base: u64) -> Self {
        Self {
            root: pid("root", base),
            next: pid("next", base + 1),
            svars: Vec::new(),
            evars: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn root(&self) -> &Ident {
        &self.root
    }

    pub fn next(&self) -> &Ident {
        &self.next
    }

    /// Add a shared variable
    pub fn with_shared(mut self, id: Ident) -> Self {
        self.svars.push(id);
        self
    }

    /// Add an existential variable
    pub fn with_existential(mut self, id: Ident) -> Self {
        self.evars.push(id);
        self
    }

    /// Add a body predicate
    pub fn with_cell(mut self, hpred: Hpred) -> Self {
        self.body.push(hpred);
        self
    }

    /// Body `root ↦ next`
    pub fn linking_root_to_next(self) -> Self {
        let cell = Hpred::points_to(var(&self.root), scalar(var(&self.next)), Exp::int(8));
        self.with_cell(cell)
    }

    pub fn build(self) -> Hpara {
        Hpara::new(self.root, self.next, self.svars, self.evars, self.body)
    }
}

/// Non-empty segment from `head` to `tail` over `para`
pub fn segment(para: impl Into<Arc<Hpara>>, head: Exp, tail: Exp) -> Hpred {
    Hpred::lseg(LsegKind::NonEmpty, para, head, tail, vec![])
}

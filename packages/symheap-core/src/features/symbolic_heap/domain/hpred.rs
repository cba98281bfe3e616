//! Heap predicates (σ) and inductive list-segment parameters
//!
//! ```text
//! hpred ::= e ↦ se : te                                   points-to
//!         | lseg_k(λ(root, next, svars). ∃evars. body)(head, tail, shared)
//!         | dllseg_k(λ(cell, blink, flink, svars). ∃evars. body)
//!                  (first, back, forward, last, shared)
//! ```
//!
//! A predicate parameter is a closed term: its body only mentions its own
//! binders (root/next/svars/evars) and no program variables. Instantiation is
//! the only way to specialize the body.

use super::inst::Inst;
use super::strexp::{compare_seq, InstComparison, Strexp};
use crate::shared::models::{Exp, Ident};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Kind of a list segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LsegKind {
    /// Non-empty (possibly circular)
    NonEmpty,
    /// Possibly empty (possibly circular)
    PossiblyEmpty,
}

/// Singly-linked list parameter: `λ(root, next, svars). ∃evars. body`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hpara {
    pub root: Ident,
    pub next: Ident,
    pub svars: Vec<Ident>,
    pub evars: Vec<Ident>,
    pub body: Vec<Arc<Hpred>>,
}

/// Doubly-linked list parameter: `λ(cell, blink, flink, svars). ∃evars. body`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HparaDll {
    pub cell: Ident,
    pub blink: Ident,
    pub flink: Ident,
    pub svars: Vec<Ident>,
    pub evars: Vec<Ident>,
    pub body: Vec<Arc<Hpred>>,
}

/// Heap predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Hpred {
    /// `addr ↦ value : texp`, with `texp` a type expression such as `sizeof(t)`
    PointsTo {
        addr: Exp,
        value: Arc<Strexp>,
        texp: Exp,
    },
    /// Singly-linked list segment from `head` to `tail`
    Lseg {
        kind: LsegKind,
        para: Arc<Hpara>,
        head: Exp,
        tail: Exp,
        shared: Vec<Exp>,
    },
    /// Doubly-linked list segment
    ///
    /// `first` is the first cell, `back` the backward link out of it,
    /// `forward` the forward link out of `last`, the last cell.
    Dllseg {
        kind: LsegKind,
        para: Arc<HparaDll>,
        first: Exp,
        back: Exp,
        forward: Exp,
        last: Exp,
        shared: Vec<Exp>,
    },
}

impl Hpara {
    pub fn new(root: Ident, next: Ident, svars: Vec<Ident>, evars: Vec<Ident>, body: Vec<Hpred>) -> Self {
        Self {
            root,
            next,
            svars,
            evars,
            body: body.into_iter().map(Arc::new).collect(),
        }
    }

    /// Binders of the closure: root, next, shared and existential variables
    pub fn bound_vars(&self) -> impl Iterator<Item = &Ident> + '_ {
        std::iter::once(&self.root)
            .chain(std::iter::once(&self.next))
            .chain(self.svars.iter())
            .chain(self.evars.iter())
    }

    pub fn compare_with(&self, other: &Hpara, mode: InstComparison) -> Ordering {
        self.root
            .cmp(&other.root)
            .then_with(|| self.next.cmp(&other.next))
            .then_with(|| self.svars.cmp(&other.svars))
            .then_with(|| self.evars.cmp(&other.evars))
            .then_with(|| compare_body(&self.body, &other.body, mode))
    }
}

impl HparaDll {
    pub fn new(
        cell: Ident,
        blink: Ident,
        flink: Ident,
        svars: Vec<Ident>,
        evars: Vec<Ident>,
        body: Vec<Hpred>,
    ) -> Self {
        Self {
            cell,
            blink,
            flink,
            svars,
            evars,
            body: body.into_iter().map(Arc::new).collect(),
        }
    }

    /// Binders of the closure: cell, blink, flink, shared and existential variables
    pub fn bound_vars(&self) -> impl Iterator<Item = &Ident> + '_ {
        [&self.cell, &self.blink, &self.flink]
            .into_iter()
            .chain(self.svars.iter())
            .chain(self.evars.iter())
    }

    pub fn compare_with(&self, other: &HparaDll, mode: InstComparison) -> Ordering {
        self.cell
            .cmp(&other.cell)
            .then_with(|| self.blink.cmp(&other.blink))
            .then_with(|| self.flink.cmp(&other.flink))
            .then_with(|| self.svars.cmp(&other.svars))
            .then_with(|| self.evars.cmp(&other.evars))
            .then_with(|| compare_body(&self.body, &other.body, mode))
    }
}

fn compare_body(b1: &[Arc<Hpred>], b2: &[Arc<Hpred>], mode: InstComparison) -> Ordering {
    compare_seq(b1, b2, |h1, h2| {
        if Arc::ptr_eq(h1, h2) {
            Ordering::Equal
        } else {
            h1.compare_with(h2, mode)
        }
    })
}

impl Hpred {
    pub fn points_to(addr: Exp, value: impl Into<Arc<Strexp>>, texp: Exp) -> Self {
        Hpred::PointsTo {
            addr,
            value: value.into(),
            texp,
        }
    }

    pub fn lseg(kind: LsegKind, para: impl Into<Arc<Hpara>>, head: Exp, tail: Exp, shared: Vec<Exp>) -> Self {
        Hpred::Lseg {
            kind,
            para: para.into(),
            head,
            tail,
            shared,
        }
    }

    pub fn dllseg(
        kind: LsegKind,
        para: impl Into<Arc<HparaDll>>,
        first: Exp,
        back: Exp,
        forward: Exp,
        last: Exp,
        shared: Vec<Exp>,
    ) -> Self {
        Hpred::Dllseg {
            kind,
            para: para.into(),
            first,
            back,
            forward,
            last,
            shared,
        }
    }

    /// Left-hand side: the address a points-to describes, or the first cell of a segment
    pub fn lhs(&self) -> &Exp {
        match self {
            Hpred::PointsTo { addr, .. } => addr,
            Hpred::Lseg { head, .. } => head,
            Hpred::Dllseg { first, .. } => first,
        }
    }

    pub fn is_points_to(&self) -> bool {
        matches!(self, Hpred::PointsTo { .. })
    }

    /// Tag of the stored value of a points-to
    pub fn value_inst(&self) -> Option<&Inst> {
        match self {
            Hpred::PointsTo { value, .. } => Some(value.inst()),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Hpred::PointsTo { .. } => 0,
            Hpred::Lseg { .. } => 1,
            Hpred::Dllseg { .. } => 2,
        }
    }

    /// Structural comparison, optionally sensitive to instrumentation
    pub fn compare_with(&self, other: &Hpred, mode: InstComparison) -> Ordering {
        match (self, other) {
            (
                Hpred::PointsTo {
                    addr: a1,
                    value: v1,
                    texp: t1,
                },
                Hpred::PointsTo {
                    addr: a2,
                    value: v2,
                    texp: t2,
                },
            ) => a1
                .cmp(a2)
                .then_with(|| {
                    if Arc::ptr_eq(v1, v2) {
                        Ordering::Equal
                    } else {
                        v1.compare_with(v2, mode)
                    }
                })
                .then_with(|| t1.cmp(t2)),
            (
                Hpred::Lseg {
                    kind: k1,
                    para: p1,
                    head: h1,
                    tail: t1,
                    shared: s1,
                },
                Hpred::Lseg {
                    kind: k2,
                    para: p2,
                    head: h2,
                    tail: t2,
                    shared: s2,
                },
            ) => k1
                .cmp(k2)
                .then_with(|| h1.cmp(h2))
                .then_with(|| t1.cmp(t2))
                .then_with(|| s1.cmp(s2))
                .then_with(|| {
                    if Arc::ptr_eq(p1, p2) {
                        Ordering::Equal
                    } else {
                        p1.compare_with(p2, mode)
                    }
                }),
            (
                Hpred::Dllseg {
                    kind: k1,
                    para: p1,
                    first: f1,
                    back: b1,
                    forward: o1,
                    last: l1,
                    shared: s1,
                },
                Hpred::Dllseg {
                    kind: k2,
                    para: p2,
                    first: f2,
                    back: b2,
                    forward: o2,
                    last: l2,
                    shared: s2,
                },
            ) => k1
                .cmp(k2)
                .then_with(|| f1.cmp(f2))
                .then_with(|| b1.cmp(b2))
                .then_with(|| o1.cmp(o2))
                .then_with(|| l1.cmp(l2))
                .then_with(|| s1.cmp(s2))
                .then_with(|| {
                    if Arc::ptr_eq(p1, p2) {
                        Ordering::Equal
                    } else {
                        p1.compare_with(p2, mode)
                    }
                }),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn equal_with(&self, other: &Hpred, mode: InstComparison) -> bool {
        self.compare_with(other, mode) == Ordering::Equal
    }
}

/// Left-hand sides of the predicates accepted by `filter`
pub fn hpred_list_get_lexps<'a>(hpreds: &'a [Hpred], mut filter: impl FnMut(&Exp) -> bool) -> Vec<&'a Exp> {
    hpreds.iter().map(Hpred::lhs).filter(|e| filter(e)).collect()
}

// Default comparisons ignore instrumentation; hashing agrees with that.

macro_rules! impl_inst_insensitive_ord {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.compare_with(other, InstComparison::Ignore) == Ordering::Equal
            }
        }

        impl Eq for $ty {}

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                self.compare_with(other, InstComparison::Ignore)
            }
        }
    };
}

impl_inst_insensitive_ord!(Hpred);
impl_inst_insensitive_ord!(Hpara);
impl_inst_insensitive_ord!(HparaDll);

impl Hash for Hpara {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.next.hash(state);
        self.svars.hash(state);
        self.evars.hash(state);
        self.body.hash(state);
    }
}

impl Hash for HparaDll {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.hash(state);
        self.blink.hash(state);
        self.flink.hash(state);
        self.svars.hash(state);
        self.evars.hash(state);
        self.body.hash(state);
    }
}

impl Hash for Hpred {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Hpred::PointsTo { addr, value, texp } => {
                addr.hash(state);
                value.hash(state);
                texp.hash(state);
            }
            Hpred::Lseg {
                kind,
                para,
                head,
                tail,
                shared,
            } => {
                kind.hash(state);
                head.hash(state);
                tail.hash(state);
                shared.hash(state);
                para.hash(state);
            }
            Hpred::Dllseg {
                kind,
                para,
                first,
                back,
                forward,
                last,
                shared,
            } => {
                kind.hash(state);
                first.hash(state);
                back.hash(state);
                forward.hash(state);
                last.hash(state);
                shared.hash(state);
                para.hash(state);
            }
        }
    }
}

//! Expression and instrumentation rewriting over terms
//!
//! The rewrites are syntactic. Arrays keep the element order they had before
//! the rewrite and are not re-normalized, so the caller owns the index
//! invariants afterward. Expression rewrites carry segment closures over
//! unchanged (the same `Arc`), like substitution does. Tag rewrites reach
//! into closure bodies, since stored values there carry tags too.

use super::domain::{Atom, Hpara, HparaDll, Hpred, Inst, Strexp};
use super::ports::{ExpMap, InstMap};
use crate::shared::models::Exp;
use std::sync::Arc;

fn leaf<F>(f: &mut F, exp: &Exp) -> Exp
where
    F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>),
{
    f(exp, None).0
}

impl ExpMap for Strexp {
    fn expmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>),
    {
        match self {
            Strexp::Scalar { exp, inst } => {
                let (exp, new_inst) = f(exp, Some(inst));
                Strexp::Scalar {
                    exp,
                    inst: new_inst.unwrap_or_else(|| inst.clone()),
                }
            }
            Strexp::Struct { fields, inst } => Strexp::Struct {
                fields: fields
                    .iter()
                    .map(|(name, se)| (name.clone(), Arc::new(se.expmap(f))))
                    .collect(),
                inst: inst.clone(),
            },
            Strexp::Array { len, elems, inst } => Strexp::Array {
                len: leaf(f, len),
                elems: elems
                    .iter()
                    .map(|(idx, se)| (leaf(f, idx), Arc::new(se.expmap(f))))
                    .collect(),
                inst: inst.clone(),
            },
        }
    }
}

impl ExpMap for Hpred {
    fn expmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>),
    {
        match self {
            Hpred::PointsTo { addr, value, texp } => Hpred::PointsTo {
                addr: leaf(f, addr),
                value: Arc::new(value.expmap(f)),
                texp: leaf(f, texp),
            },
            Hpred::Lseg {
                kind,
                para,
                head,
                tail,
                shared,
            } => Hpred::Lseg {
                kind: *kind,
                para: Arc::clone(para),
                head: leaf(f, head),
                tail: leaf(f, tail),
                shared: shared.iter().map(|e| leaf(f, e)).collect(),
            },
            Hpred::Dllseg {
                kind,
                para,
                first,
                back,
                forward,
                last,
                shared,
            } => Hpred::Dllseg {
                kind: *kind,
                para: Arc::clone(para),
                first: leaf(f, first),
                back: leaf(f, back),
                forward: leaf(f, forward),
                last: leaf(f, last),
                shared: shared.iter().map(|e| leaf(f, e)).collect(),
            },
        }
    }
}

impl ExpMap for Atom {
    fn expmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>),
    {
        match self {
            Atom::Eq(e1, e2) => Atom::Eq(leaf(f, e1), leaf(f, e2)),
            Atom::Neq(e1, e2) => Atom::Neq(leaf(f, e1), leaf(f, e2)),
            Atom::Pred(p, args) => Atom::Pred(p.clone(), args.iter().map(|e| leaf(f, e)).collect()),
            Atom::NPred(p, args) => Atom::NPred(p.clone(), args.iter().map(|e| leaf(f, e)).collect()),
        }
    }
}

impl InstMap for Strexp {
    fn instmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Inst) -> Inst,
    {
        match self {
            Strexp::Scalar { exp, inst } => Strexp::Scalar {
                exp: exp.clone(),
                inst: f(inst),
            },
            Strexp::Struct { fields, inst } => Strexp::Struct {
                fields: fields
                    .iter()
                    .map(|(name, se)| (name.clone(), Arc::new(se.instmap(f))))
                    .collect(),
                inst: f(inst),
            },
            Strexp::Array { len, elems, inst } => Strexp::Array {
                len: len.clone(),
                elems: elems
                    .iter()
                    .map(|(idx, se)| (idx.clone(), Arc::new(se.instmap(f))))
                    .collect(),
                inst: f(inst),
            },
        }
    }
}

impl InstMap for Hpred {
    fn instmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Inst) -> Inst,
    {
        match self {
            Hpred::PointsTo { addr, value, texp } => Hpred::PointsTo {
                addr: addr.clone(),
                value: Arc::new(value.instmap(f)),
                texp: texp.clone(),
            },
            Hpred::Lseg {
                kind,
                para,
                head,
                tail,
                shared,
            } => Hpred::Lseg {
                kind: *kind,
                para: Arc::new(para.instmap(f)),
                head: head.clone(),
                tail: tail.clone(),
                shared: shared.clone(),
            },
            Hpred::Dllseg {
                kind,
                para,
                first,
                back,
                forward,
                last,
                shared,
            } => Hpred::Dllseg {
                kind: *kind,
                para: Arc::new(para.instmap(f)),
                first: first.clone(),
                back: back.clone(),
                forward: forward.clone(),
                last: last.clone(),
                shared: shared.clone(),
            },
        }
    }
}

/// Binders are kept; only the body is retagged
impl InstMap for Hpara {
    fn instmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Inst) -> Inst,
    {
        Hpara {
            body: self.body.iter().map(|h| Arc::new(h.instmap(f))).collect(),
            ..self.clone()
        }
    }
}

impl InstMap for HparaDll {
    fn instmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Inst) -> Inst,
    {
        HparaDll {
            body: self.body.iter().map(|h| Arc::new(h.instmap(f))).collect(),
            ..self.clone()
        }
    }
}

pub fn hpred_list_expmap<F>(hpreds: &[Hpred], f: &mut F) -> Vec<Hpred>
where
    F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>),
{
    hpreds.iter().map(|h| h.expmap(f)).collect()
}

pub fn atom_list_expmap(atoms: &[Atom], mut f: impl FnMut(&Exp) -> Exp) -> Vec<Atom> {
    atoms.iter().map(|a| a.map_exps(&mut f)).collect()
}

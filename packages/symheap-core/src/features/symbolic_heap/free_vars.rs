//! Lazy free-variable enumeration
//!
//! [`FreeVars`] walks a term with an explicit stack, so nothing is
//! materialized up front and a caller that stops early pays only for what
//! it consumed. Cloning the iterator before use gives a restartable sequence.
//!
//! Predicate-parameter closures are closed terms: traversal of a segment
//! visits its positional and shared arguments and never enters the closure
//! body, at any nesting depth. [`Hpara::shallow_free_vars`] looks one level
//! into a body instead, minus the closure's own binders, and again stops at
//! the closures nested inside it.

use super::domain::{Atom, Hpara, HparaDll, Hpred, Instr, Strexp};
use super::ports::FreeVariables;
use crate::shared::models::{Exp, Ident};
use rustc_hash::FxHashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Frame<'a> {
    Exp(&'a Exp),
    Strexp(&'a Strexp),
    Hpred(&'a Hpred),
    Atom(&'a Atom),
    Instr(&'a Instr),
    Ident(&'a Ident),
}

/// Left-to-right free identifiers of a term; repeats are yielded again
#[derive(Debug, Clone, Default)]
pub struct FreeVars<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> FreeVars<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    fn single(frame: Frame<'a>) -> Self {
        Self { stack: vec![frame] }
    }

    /// Free identifiers of a predicate list, in list order
    pub fn of_hpreds(hpreds: &'a [Arc<Hpred>]) -> Self {
        Self {
            stack: hpreds.iter().rev().map(|h| Frame::Hpred(h.as_ref())).collect(),
        }
    }

    /// Free identifiers of an atom list, in list order
    pub fn of_atoms(atoms: &'a [Atom]) -> Self {
        Self {
            stack: atoms.iter().rev().map(Frame::Atom).collect(),
        }
    }

    fn push_exps(&mut self, exps: &'a [Exp]) {
        self.stack.extend(exps.iter().rev().map(Frame::Exp));
    }

    fn expand_exp(&mut self, exp: &'a Exp) -> Option<&'a Ident> {
        match exp {
            Exp::Var(id) => return Some(id),
            Exp::Const(_) | Exp::Lvar(_) => {}
            Exp::UnOp(_, e, _) | Exp::Cast(_, e) | Exp::Lfield(e, _, _) => self.stack.push(Frame::Exp(e)),
            Exp::BinOp(_, e1, e2) | Exp::Lindex(e1, e2) => {
                self.stack.push(Frame::Exp(e2));
                self.stack.push(Frame::Exp(e1));
            }
            Exp::Sizeof { dynamic_length, .. } => {
                if let Some(len) = dynamic_length {
                    self.stack.push(Frame::Exp(len));
                }
            }
        }
        None
    }

    fn expand_strexp(&mut self, se: &'a Strexp) {
        match se {
            Strexp::Scalar { exp, .. } => self.stack.push(Frame::Exp(exp)),
            Strexp::Struct { fields, .. } => {
                self.stack
                    .extend(fields.iter().rev().map(|(_, child)| Frame::Strexp(child.as_ref())));
            }
            Strexp::Array { len, elems, .. } => {
                for (idx, child) in elems.iter().rev() {
                    self.stack.push(Frame::Strexp(child.as_ref()));
                    self.stack.push(Frame::Exp(idx));
                }
                self.stack.push(Frame::Exp(len));
            }
        }
    }

    fn expand_hpred(&mut self, hpred: &'a Hpred) {
        match hpred {
            Hpred::PointsTo { addr, value, texp } => {
                self.stack.push(Frame::Exp(texp));
                self.stack.push(Frame::Strexp(value.as_ref()));
                self.stack.push(Frame::Exp(addr));
            }
            Hpred::Lseg {
                head, tail, shared, ..
            } => {
                self.push_exps(shared);
                self.stack.push(Frame::Exp(tail));
                self.stack.push(Frame::Exp(head));
            }
            Hpred::Dllseg {
                first,
                back,
                forward,
                last,
                shared,
                ..
            } => {
                self.push_exps(shared);
                self.stack.push(Frame::Exp(last));
                self.stack.push(Frame::Exp(forward));
                self.stack.push(Frame::Exp(back));
                self.stack.push(Frame::Exp(first));
            }
        }
    }

    fn expand_atom(&mut self, atom: &'a Atom) {
        match atom {
            Atom::Eq(e1, e2) | Atom::Neq(e1, e2) => {
                self.stack.push(Frame::Exp(e2));
                self.stack.push(Frame::Exp(e1));
            }
            Atom::Pred(_, args) | Atom::NPred(_, args) => self.push_exps(args),
        }
    }

    fn expand_instr(&mut self, instr: &'a Instr) {
        match instr {
            Instr::Load { id, exp, .. } => {
                self.stack.push(Frame::Exp(exp));
                self.stack.push(Frame::Ident(id));
            }
            Instr::Store { lhs, rhs, .. } => {
                self.stack.push(Frame::Exp(rhs));
                self.stack.push(Frame::Exp(lhs));
            }
            Instr::Prune { cond, .. } => self.stack.push(Frame::Exp(cond)),
            Instr::Call { ret, callee, args, .. } => {
                self.stack.extend(args.iter().rev().map(|(e, _)| Frame::Exp(e)));
                self.stack.push(Frame::Exp(callee));
                if let Some((id, _)) = ret {
                    self.stack.push(Frame::Ident(id));
                }
            }
            Instr::RemoveTemps { ids, .. } => self.stack.extend(ids.iter().rev().map(Frame::Ident)),
            Instr::Nullify { .. } | Instr::Abstract { .. } | Instr::DeclareLocals { .. } => {}
        }
    }
}

impl<'a> Iterator for FreeVars<'a> {
    type Item = &'a Ident;

    fn next(&mut self) -> Option<&'a Ident> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Ident(id) => return Some(id),
                Frame::Exp(e) => {
                    if let Some(id) = self.expand_exp(e) {
                        return Some(id);
                    }
                }
                Frame::Strexp(se) => self.expand_strexp(se),
                Frame::Hpred(h) => self.expand_hpred(h),
                Frame::Atom(a) => self.expand_atom(a),
                Frame::Instr(i) => self.expand_instr(i),
            }
        }
        None
    }
}

/// Drops identifiers already yielded, keeping first-occurrence order
#[derive(Debug, Clone)]
pub struct UniqueVars<I> {
    inner: I,
    seen: FxHashSet<Ident>,
}

impl<I> UniqueVars<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            seen: FxHashSet::default(),
        }
    }
}

impl<'a, I> Iterator for UniqueVars<I>
where
    I: Iterator<Item = &'a Ident>,
{
    type Item = &'a Ident;

    fn next(&mut self) -> Option<&'a Ident> {
        let seen = &mut self.seen;
        self.inner.by_ref().find(|id| seen.insert((*id).clone()))
    }
}

impl FreeVariables for Exp {
    fn gen_free_vars(&self) -> FreeVars<'_> {
        FreeVars::single(Frame::Exp(self))
    }
}

impl FreeVariables for Atom {
    fn gen_free_vars(&self) -> FreeVars<'_> {
        FreeVars::single(Frame::Atom(self))
    }
}

impl FreeVariables for Strexp {
    fn gen_free_vars(&self) -> FreeVars<'_> {
        FreeVars::single(Frame::Strexp(self))
    }
}

impl FreeVariables for Hpred {
    fn gen_free_vars(&self) -> FreeVars<'_> {
        FreeVars::single(Frame::Hpred(self))
    }
}

/// Identifiers an instruction reads or binds
impl FreeVariables for Instr {
    fn gen_free_vars(&self) -> FreeVars<'_> {
        FreeVars::single(Frame::Instr(self))
    }
}

impl Hpara {
    /// Free identifiers of the body that are not binders of this closure
    pub fn shallow_free_vars(&self) -> impl Iterator<Item = &Ident> + '_ {
        let bound: FxHashSet<&Ident> = self.bound_vars().collect();
        UniqueVars::new(FreeVars::of_hpreds(&self.body)).filter(move |id| !bound.contains(id))
    }
}

impl HparaDll {
    /// Free identifiers of the body that are not binders of this closure
    pub fn shallow_free_vars(&self) -> impl Iterator<Item = &Ident> + '_ {
        let bound: FxHashSet<&Ident> = self.bound_vars().collect();
        UniqueVars::new(FreeVars::of_hpreds(&self.body)).filter(move |id| !bound.contains(id))
    }
}

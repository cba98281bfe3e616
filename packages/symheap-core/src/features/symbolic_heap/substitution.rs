//! Substitution Algebra
//!
//! ```text
//! θ ::= [x₁ ↦ e₁, ..., xₙ ↦ eₙ]     expression substitution, xᵢ pairwise distinct
//!     | ['a₁ ↦ t₁, ..., 'aₙ ↦ tₙ]   type substitution
//! ```
//!
//! Substitutions are immutable; every operation builds a new one. Bindings
//! keep their insertion order, which is the scan order of [`ExpSubst::find`].
//! Two substitutions are equal when they denote the same mapping.
//!
//! Application never descends into a predicate-parameter closure: the
//! closure's binders are not renamed and its body is not rewritten. Use
//! instantiation to specialize a closure.

use super::domain::{Atom, Hpred, Instr, Strexp};
use super::ports::{ExpMap, FreeVariables, Substitutable};
use crate::errors::{Result, SymHeapError};
use crate::shared::models::{Exp, Ident, Typ};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Expression substitutions
// ═══════════════════════════════════════════════════════════════════════════

/// Finite mapping from identifiers to expressions
///
/// Serialized as the list of bindings; a repeated identifier read back keeps
/// its first binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(Ident, Exp)>", into = "Vec<(Ident, Exp)>")]
pub struct ExpSubst {
    bindings: Vec<(Ident, Exp)>,
}

impl ExpSubst {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from pairs with a unique domain.
    ///
    /// Precondition: an identifier listed twice maps to the same expression
    /// both times. Such exact repeats collapse into one binding.
    pub fn of_list(pairs: Vec<(Ident, Exp)>) -> Self {
        let mut seen: FxHashMap<Ident, usize> = FxHashMap::default();
        let mut bindings: Vec<(Ident, Exp)> = Vec::with_capacity(pairs.len());
        for (id, exp) in pairs {
            match seen.get(&id) {
                Some(&idx) => debug_assert!(
                    bindings[idx].1 == exp,
                    "conflicting bindings for {} in substitution",
                    id
                ),
                None => {
                    seen.insert(id.clone(), bindings.len());
                    bindings.push((id, exp));
                }
            }
        }
        Self { bindings }
    }

    /// Build from pairs, keeping only the first binding of each identifier
    pub fn of_list_duplicates(pairs: Vec<(Ident, Exp)>) -> Self {
        let mut seen: FxHashMap<Ident, ()> = FxHashMap::default();
        let bindings = pairs
            .into_iter()
            .filter(|(id, _)| seen.insert(id.clone(), ()).is_none())
            .collect();
        Self { bindings }
    }

    pub fn to_list(&self) -> Vec<(Ident, Exp)> {
        self.bindings.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Exp)> + '_ {
        self.bindings.iter().map(|(id, e)| (id, e))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, id: &Ident) -> Option<&Exp> {
        self.bindings.iter().find(|(bid, _)| bid == id).map(|(_, e)| e)
    }

    pub fn mem(&self, id: &Ident) -> bool {
        self.get(id).is_some()
    }

    pub fn domain(&self) -> impl Iterator<Item = &Ident> + '_ {
        self.bindings.iter().map(|(id, _)| id)
    }

    pub fn range(&self) -> impl Iterator<Item = &Exp> + '_ {
        self.bindings.iter().map(|(_, e)| e)
    }

    /// Image of the first identifier (in insertion order) accepted by `pred`
    pub fn find(&self, mut pred: impl FnMut(&Ident) -> bool) -> Result<&Exp> {
        self.bindings
            .iter()
            .find(|(id, _)| pred(id))
            .map(|(_, e)| e)
            .ok_or(SymHeapError::BindingNotFound)
    }

    /// Restrict the domain to identifiers accepted by `pred`
    pub fn filter(&self, mut pred: impl FnMut(&Ident) -> bool) -> Self {
        self.filter_pair(|id, _| pred(id))
    }

    /// Restrict to bindings accepted by `pred`
    pub fn filter_pair(&self, mut pred: impl FnMut(&Ident, &Exp) -> bool) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .filter(|(id, e)| pred(id, e))
                .cloned()
                .collect(),
        }
    }

    /// Split by a predicate on the range: (accepted, rejected)
    pub fn range_partition(&self, mut pred: impl FnMut(&Exp) -> bool) -> (Self, Self) {
        self.partition(|_, e| pred(e))
    }

    /// Split by a predicate on the domain: (accepted, rejected)
    pub fn domain_partition(&self, mut pred: impl FnMut(&Ident) -> bool) -> (Self, Self) {
        self.partition(|id, _| pred(id))
    }

    fn partition(&self, mut pred: impl FnMut(&Ident, &Exp) -> bool) -> (Self, Self) {
        let (yes, no): (Vec<_>, Vec<_>) = self.bindings.iter().cloned().partition(|(id, e)| pred(id, e));
        (Self { bindings: yes }, Self { bindings: no })
    }

    /// Bindings present identically in both substitutions
    pub fn join(&self, other: &ExpSubst) -> Self {
        self.filter_pair(|id, e| other.get(id) == Some(e))
    }

    /// `(common, only_self, only_other)`; `common` is [`ExpSubst::join`].
    ///
    /// An identifier bound differently on the two sides shows up in both
    /// remainders.
    pub fn symmetric_difference(&self, other: &ExpSubst) -> (Self, Self, Self) {
        let (common, only_self) = self.partition(|id, e| other.get(id) == Some(e));
        let only_other = other.filter_pair(|id, e| self.get(id) != Some(e));
        (common, only_self, only_other)
    }

    /// Add `id ↦ exp`. `None` when `id` is already bound to another expression.
    pub fn extend(&self, id: Ident, exp: Exp) -> Option<Self> {
        match self.get(&id) {
            Some(bound) if bound == &exp => Some(self.clone()),
            Some(_) => None,
            None => {
                let mut bindings = self.bindings.clone();
                bindings.push((id, exp));
                Some(Self { bindings })
            }
        }
    }

    /// Rewrite every image
    pub fn range_map(&self, mut f: impl FnMut(&Exp) -> Exp) -> Self {
        Self {
            bindings: self.bindings.iter().map(|(id, e)| (id.clone(), f(e))).collect(),
        }
    }

    /// Rewrite identifiers and images; identifiers merged by `f` keep their first binding
    pub fn map(&self, mut f: impl FnMut(&Ident) -> Ident, mut g: impl FnMut(&Exp) -> Exp) -> Self {
        Self::of_list_duplicates(self.bindings.iter().map(|(id, e)| (f(id), g(e))).collect())
    }

    /// Free identifiers of the images, lazily
    pub fn range_free_vars(&self) -> impl Iterator<Item = &Ident> + '_ {
        self.bindings.iter().flat_map(|(_, e)| e.gen_free_vars())
    }

    /// Apply to an expression
    pub fn apply_exp(&self, exp: &Exp) -> Exp {
        if self.is_empty() {
            return exp.clone();
        }
        exp.rebuild(&mut |id| self.get(id).cloned(), &mut |t| t.clone())
    }
}

impl PartialEq for ExpSubst {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.bindings.iter().all(|(id, e)| other.get(id) == Some(e))
    }
}

impl Eq for ExpSubst {}

impl From<Vec<(Ident, Exp)>> for ExpSubst {
    fn from(pairs: Vec<(Ident, Exp)>) -> Self {
        Self::of_list_duplicates(pairs)
    }
}

impl From<ExpSubst> for Vec<(Ident, Exp)> {
    fn from(sub: ExpSubst) -> Self {
        sub.bindings
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Type substitutions
// ═══════════════════════════════════════════════════════════════════════════

/// Finite mapping from type parameters to types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypSubst {
    bindings: Vec<(String, Typ)>,
}

impl TypSubst {
    /// First binding of each parameter wins
    pub fn of_list(pairs: Vec<(String, Typ)>) -> Self {
        let mut bindings: Vec<(String, Typ)> = Vec::with_capacity(pairs.len());
        for (name, typ) in pairs {
            if !bindings.iter().any(|(n, _)| n == &name) {
                bindings.push((name, typ));
            }
        }
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&Typ> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn apply_typ(&self, typ: &Typ) -> Typ {
        typ.map_vars(&mut |name| self.get(name).cloned())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Substitutions
// ═══════════════════════════════════════════════════════════════════════════

/// Either kind of substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subst {
    Exp(ExpSubst),
    Typ(TypSubst),
}

impl From<ExpSubst> for Subst {
    fn from(sub: ExpSubst) -> Self {
        Subst::Exp(sub)
    }
}

impl From<TypSubst> for Subst {
    fn from(sub: TypSubst) -> Self {
        Subst::Typ(sub)
    }
}

impl Subst {
    pub fn exp_sub(&self, exp: &Exp) -> Exp {
        match self {
            Subst::Exp(sub) => sub.apply_exp(exp),
            Subst::Typ(sub) => exp.rebuild(&mut |_| None, &mut |t| sub.apply_typ(t)),
        }
    }

    pub fn typ_sub(&self, typ: &Typ) -> Typ {
        match self {
            Subst::Exp(_) => typ.clone(),
            Subst::Typ(sub) => sub.apply_typ(typ),
        }
    }

    /// Rename a binding identifier; it only changes when its image is a variable
    pub fn ident_sub(&self, id: &Ident) -> Ident {
        match self {
            Subst::Exp(sub) => match sub.get(id) {
                Some(Exp::Var(renamed)) => renamed.clone(),
                _ => id.clone(),
            },
            Subst::Typ(_) => id.clone(),
        }
    }
}

impl Substitutable for Exp {
    fn apply_sub(&self, sub: &Subst) -> Self {
        sub.exp_sub(self)
    }
}

impl Substitutable for Atom {
    fn apply_sub(&self, sub: &Subst) -> Self {
        self.map_exps(|e| sub.exp_sub(e))
    }
}

impl Substitutable for Strexp {
    fn apply_sub(&self, sub: &Subst) -> Self {
        self.map_exps(|e| sub.exp_sub(e))
    }
}

impl Substitutable for Hpred {
    fn apply_sub(&self, sub: &Subst) -> Self {
        self.map_exps(|e| sub.exp_sub(e))
    }
}

impl Substitutable for Instr {
    fn apply_sub(&self, sub: &Subst) -> Self {
        match self {
            Instr::Load { id, exp, typ, loc } => Instr::Load {
                id: sub.ident_sub(id),
                exp: sub.exp_sub(exp),
                typ: sub.typ_sub(typ),
                loc: loc.clone(),
            },
            Instr::Store { lhs, typ, rhs, loc } => Instr::Store {
                lhs: sub.exp_sub(lhs),
                typ: sub.typ_sub(typ),
                rhs: sub.exp_sub(rhs),
                loc: loc.clone(),
            },
            Instr::Prune {
                cond,
                loc,
                true_branch,
                kind,
            } => Instr::Prune {
                cond: sub.exp_sub(cond),
                loc: loc.clone(),
                true_branch: *true_branch,
                kind: *kind,
            },
            Instr::Call {
                ret,
                callee,
                args,
                loc,
                flags,
            } => Instr::Call {
                ret: ret.as_ref().map(|(id, typ)| (sub.ident_sub(id), sub.typ_sub(typ))),
                callee: sub.exp_sub(callee),
                args: args.iter().map(|(e, t)| (sub.exp_sub(e), sub.typ_sub(t))).collect(),
                loc: loc.clone(),
                flags: *flags,
            },
            Instr::Nullify { .. } | Instr::Abstract { .. } => self.clone(),
            Instr::RemoveTemps { ids, loc } => Instr::RemoveTemps {
                ids: ids.iter().map(|id| sub.ident_sub(id)).collect(),
                loc: loc.clone(),
            },
            Instr::DeclareLocals { locals, loc } => Instr::DeclareLocals {
                locals: locals.iter().map(|(pv, t)| (pv.clone(), sub.typ_sub(t))).collect(),
                loc: loc.clone(),
            },
        }
    }
}

pub fn exp_sub(sub: &Subst, exp: &Exp) -> Exp {
    exp.apply_sub(sub)
}

pub fn atom_sub(sub: &Subst, atom: &Atom) -> Atom {
    atom.apply_sub(sub)
}

pub fn strexp_sub(sub: &Subst, se: &Strexp) -> Strexp {
    se.apply_sub(sub)
}

pub fn hpred_sub(sub: &Subst, hpred: &Hpred) -> Hpred {
    hpred.apply_sub(sub)
}

pub fn instr_sub(sub: &Subst, instr: &Instr) -> Instr {
    instr.apply_sub(sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic_heap::domain::{Hpara, Inst, LsegKind};
    use crate::shared::models::{CallFlags, Const, Location};
    use pretty_assertions::assert_eq;

    fn x() -> Ident {
        Ident::normal("x", 1)
    }

    fn y() -> Ident {
        Ident::normal("y", 2)
    }

    fn z() -> Ident {
        Ident::primed("z", 3)
    }

    #[test]
    fn test_of_list_collapses_exact_duplicates() {
        let sub = ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(2)), (x(), Exp::int(1))]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.to_list(), vec![(x(), Exp::int(1)), (y(), Exp::int(2))]);
    }

    #[test]
    fn test_of_list_duplicates_keeps_first() {
        let sub = ExpSubst::of_list_duplicates(vec![(x(), Exp::int(1)), (x(), Exp::int(9))]);
        assert_eq!(sub.get(&x()), Some(&Exp::int(1)));
        assert_eq!(sub.len(), 1);
    }

    #[test]
    fn test_equality_ignores_binding_order() {
        let a = ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(2))]);
        let b = ExpSubst::of_list(vec![(y(), Exp::int(2)), (x(), Exp::int(1))]);
        assert_eq!(a, b);
        assert_ne!(a, ExpSubst::of_list(vec![(x(), Exp::int(1))]));
    }

    #[test]
    fn test_find_scans_in_insertion_order() {
        let sub = ExpSubst::of_list(vec![(y(), Exp::int(2)), (x(), Exp::int(1))]);
        assert_eq!(sub.find(|id| id.is_normal()).ok(), Some(&Exp::int(2)));
        assert!(matches!(sub.find(|id| id.is_primed()), Err(SymHeapError::BindingNotFound)));
    }

    #[test]
    fn test_extend_rejects_conflicting_binding() {
        let sub = ExpSubst::of_list(vec![(x(), Exp::int(1))]);
        assert!(sub.extend(x(), Exp::int(2)).is_none());
        assert_eq!(sub.extend(x(), Exp::int(1)), Some(sub.clone()));
        let grown = sub.extend(y(), Exp::int(5)).unwrap();
        assert_eq!(grown.len(), 2);
        assert!(grown.mem(&y()));
    }

    #[test]
    fn test_partitions_cover_the_substitution() {
        let sub = ExpSubst::of_list(vec![(x(), Exp::int(0)), (y(), Exp::var(z())), (z(), Exp::int(4))]);
        let (zeros, rest) = sub.range_partition(Exp::is_zero);
        assert_eq!(zeros.to_list(), vec![(x(), Exp::int(0))]);
        assert_eq!(rest.len(), 2);

        let (primed, normal) = sub.domain_partition(Ident::is_primed);
        assert_eq!(primed.to_list(), vec![(z(), Exp::int(4))]);
        assert_eq!(normal.len(), 2);
    }

    #[test]
    fn test_join_and_symmetric_difference() {
        let a = ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(2))]);
        let b = ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(3)), (z(), Exp::int(0))]);
        assert_eq!(a.join(&b), ExpSubst::of_list(vec![(x(), Exp::int(1))]));

        let (common, only_a, only_b) = a.symmetric_difference(&b);
        assert_eq!(common, a.join(&b));
        assert_eq!(only_a.to_list(), vec![(y(), Exp::int(2))]);
        assert_eq!(only_b.to_list(), vec![(y(), Exp::int(3)), (z(), Exp::int(0))]);
    }

    #[test]
    fn test_map_merges_renamed_domain() {
        let sub = ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(2))]);
        let merged = sub.map(|_| z(), |e| e.clone());
        assert_eq!(merged.to_list(), vec![(z(), Exp::int(1))]);
        let bumped = sub.range_map(|e| Exp::binop(crate::shared::models::BinOp::PlusA, e.clone(), Exp::int(1)));
        assert_eq!(bumped.len(), 2);
    }

    #[test]
    fn test_range_free_vars() {
        let sub = ExpSubst::of_list(vec![(x(), Exp::var(z())), (y(), Exp::int(0))]);
        let vars: Vec<_> = sub.range_free_vars().cloned().collect();
        assert_eq!(vars, vec![z()]);
    }

    #[test]
    fn test_load_id_renamed_only_to_variables() {
        let load = Instr::Load {
            id: x(),
            exp: Exp::var(y()),
            typ: Typ::Int,
            loc: Location::none(),
        };
        let to_var = Subst::from(ExpSubst::of_list(vec![(x(), Exp::var(z())), (y(), Exp::int(8))]));
        match instr_sub(&to_var, &load) {
            Instr::Load { id, exp, .. } => {
                assert_eq!(id, z());
                assert_eq!(exp, Exp::int(8));
            }
            other => panic!("unexpected {:?}", other),
        }

        let to_const = Subst::from(ExpSubst::of_list(vec![(x(), Exp::int(3))]));
        match instr_sub(&to_const, &load) {
            Instr::Load { id, .. } => assert_eq!(id, x()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_call_ret_and_temps_renamed_to_variables() {
        let call = Instr::Call {
            ret: Some((x(), Typ::Int)),
            callee: Exp::Const(Const::Fun("f".into())),
            args: vec![(Exp::var(x()), Typ::Int)],
            loc: Location::none(),
            flags: CallFlags::default(),
        };
        let temps = Instr::RemoveTemps {
            ids: vec![x(), y()],
            loc: Location::none(),
        };
        let sub = Subst::from(ExpSubst::of_list(vec![(x(), Exp::var(z())), (y(), Exp::int(0))]));

        match instr_sub(&sub, &call) {
            Instr::Call { ret, args, .. } => {
                assert_eq!(ret, Some((z(), Typ::Int)));
                assert_eq!(args, vec![(Exp::var(z()), Typ::Int)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        // y maps to a constant, so it stays as it was
        match instr_sub(&sub, &temps) {
            Instr::RemoveTemps { ids, .. } => assert_eq!(ids, vec![z(), y()]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_keeps_first_binding() {
        let json = serde_json::to_string(&vec![(x(), Exp::int(1)), (x(), Exp::int(2)), (y(), Exp::int(3))])
            .unwrap();
        let sub: ExpSubst = serde_json::from_str(&json).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(&x()), Some(&Exp::int(1)));
        assert_eq!(sub, ExpSubst::of_list(vec![(x(), Exp::int(1)), (y(), Exp::int(3))]));

        let back: ExpSubst = serde_json::from_str(&serde_json::to_string(&sub).unwrap()).unwrap();
        assert_eq!(back.to_list(), sub.to_list());
    }

    #[test]
    fn test_typ_subst_rewrites_call_types_only() {
        let call = Instr::Call {
            ret: Some((x(), Typ::var("T"))),
            callee: Exp::Const(Const::Fun("id".into())),
            args: vec![(Exp::var(y()), Typ::ptr(Typ::var("T")))],
            loc: Location::none(),
            flags: CallFlags::default(),
        };
        let sub = Subst::from(TypSubst::of_list(vec![("T".to_string(), Typ::Int)]));
        match instr_sub(&sub, &call) {
            Instr::Call { ret, args, .. } => {
                assert_eq!(ret, Some((x(), Typ::Int)));
                assert_eq!(args, vec![(Exp::var(y()), Typ::ptr(Typ::Int))]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_hpred_sub_leaves_para_untouched() {
        let root = Ident::primed("root", 10);
        let next = Ident::primed("next", 11);
        let para = Hpara::new(
            root.clone(),
            next.clone(),
            vec![],
            vec![],
            vec![Hpred::points_to(
                Exp::var(root.clone()),
                Strexp::scalar(Exp::var(next.clone()), Inst::Unknown),
                Exp::int(8),
            )],
        );
        let lseg = Hpred::lseg(LsegKind::NonEmpty, para, Exp::var(x()), Exp::var(y()), vec![]);
        let sub = Subst::from(ExpSubst::of_list(vec![
            (x(), Exp::int(1)),
            (root.clone(), Exp::int(99)),
        ]));
        match hpred_sub(&sub, &lseg) {
            Hpred::Lseg { para, head, tail, .. } => {
                assert_eq!(head, Exp::int(1));
                assert_eq!(tail, Exp::var(y()));
                assert_eq!(para.root, root);
                assert_eq!(para.body[0].lhs(), &Exp::var(root));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_substitution_is_identity() {
        let e = Exp::lindex(Exp::var(x()), Exp::var(y()));
        assert_eq!(exp_sub(&Subst::Exp(ExpSubst::empty()), &e), e);
        let a = Atom::disequal(Exp::var(x()), Exp::null());
        assert_eq!(atom_sub(&Subst::Exp(ExpSubst::empty()), &a), a);
    }
}

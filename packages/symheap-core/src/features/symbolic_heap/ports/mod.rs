//! Symbolic Heap Ports - Traversal Interfaces
//!
//! The traits every term kind implements so the engine can treat atoms, heap
//! predicates, structured values and instructions uniformly.
//!
//! ## Usage
//! ```rust,ignore
//! use symheap_core::features::symbolic_heap::ports::{FreeVariables, Substitutable};
//!
//! fn rename<T: Substitutable>(terms: &[T], sub: &Subst) -> Vec<T> {
//!     terms.iter().map(|t| t.apply_sub(sub)).collect()
//! }
//! ```

use super::domain::Inst;
use super::free_vars::{FreeVars, UniqueVars};
use super::substitution::Subst;
use crate::shared::models::{Exp, Ident};

/// Terms a substitution can be applied to
pub trait Substitutable: Sized {
    /// Replace every free occurrence of a domain identifier by its image.
    /// Predicate-parameter closures are left untouched.
    fn apply_sub(&self, sub: &Subst) -> Self;
}

/// Terms with free identifiers
pub trait FreeVariables {
    /// Lazy left-to-right enumeration; an identifier occurring twice is yielded twice
    fn gen_free_vars(&self) -> FreeVars<'_>;

    /// Lazy enumeration without repeats, in first-occurrence order
    fn free_vars(&self) -> UniqueVars<FreeVars<'_>> {
        UniqueVars::new(self.gen_free_vars())
    }

    fn has_free_var(&self, mut pred: impl FnMut(&Ident) -> bool) -> bool {
        self.gen_free_vars().any(|id| pred(id))
    }
}

/// Terms whose expression leaves can be rewritten
///
/// The rewrite is syntactic: the result is not re-normalized, so an array
/// may end up with two indices that are now equal.
pub trait ExpMap: Sized {
    /// Rewrite every expression leaf. Scalar leaves receive their tag and may
    /// return a new one; `None` keeps the old tag.
    fn expmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Exp, Option<&Inst>) -> (Exp, Option<Inst>);

    fn map_exps(&self, mut f: impl FnMut(&Exp) -> Exp) -> Self {
        self.expmap(&mut |e: &Exp, _: Option<&Inst>| (f(e), None))
    }

    /// Replace leaves equal to an `old` by the paired `new`; first match wins
    fn replace_exp(&self, pairs: &[(Exp, Exp)]) -> Self {
        self.map_exps(|e| {
            pairs
                .iter()
                .find(|(old, _)| old == e)
                .map(|(_, new)| new.clone())
                .unwrap_or_else(|| e.clone())
        })
    }
}

/// Terms whose instrumentation tags can be rewritten
pub trait InstMap: Sized {
    fn instmap<F>(&self, f: &mut F) -> Self
    where
        F: FnMut(&Inst) -> Inst;
}

//! Pure atoms (π)

use crate::shared::models::{Exp, PredSymbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pure formula atom
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Atom {
    /// e1 = e2
    Eq(Exp, Exp),
    /// e1 ≠ e2
    Neq(Exp, Exp),
    /// p(e1, ..., en)
    Pred(PredSymbol, Vec<Exp>),
    /// ¬p(e1, ..., en)
    NPred(PredSymbol, Vec<Exp>),
}

impl Atom {
    pub fn equal(e1: Exp, e2: Exp) -> Self {
        Atom::Eq(e1, e2)
    }

    pub fn disequal(e1: Exp, e2: Exp) -> Self {
        Atom::Neq(e1, e2)
    }

    /// Expressions of the atom, left to right
    pub fn exps(&self) -> Vec<&Exp> {
        match self {
            Atom::Eq(e1, e2) | Atom::Neq(e1, e2) => vec![e1, e2],
            Atom::Pred(_, args) | Atom::NPred(_, args) => args.iter().collect(),
        }
    }

    /// Swap a predicate application with its negation; equalities and
    /// disequalities swap likewise.
    pub fn negate(&self) -> Atom {
        match self {
            Atom::Eq(e1, e2) => Atom::Neq(e1.clone(), e2.clone()),
            Atom::Neq(e1, e2) => Atom::Eq(e1.clone(), e2.clone()),
            Atom::Pred(p, args) => Atom::NPred(p.clone(), args.clone()),
            Atom::NPred(p, args) => Atom::Pred(p.clone(), args.clone()),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = |args: &[Exp]| args.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ");
        match self {
            Atom::Eq(e1, e2) => write!(f, "{} = {}", e1, e2),
            Atom::Neq(e1, e2) => write!(f, "{} ≠ {}", e1, e2),
            Atom::Pred(p, es) => write!(f, "{}({})", p, args(es)),
            Atom::NPred(p, es) => write!(f, "¬{}({})", p, args(es)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_is_involutive() {
        let a = Atom::Pred(PredSymbol::new("valid"), vec![Exp::int(1)]);
        assert_eq!(a.negate().negate(), a);
        assert_eq!(Atom::equal(Exp::int(1), Exp::int(2)).negate(), Atom::disequal(Exp::int(1), Exp::int(2)));
    }
}

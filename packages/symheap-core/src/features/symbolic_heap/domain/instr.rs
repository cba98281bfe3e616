//! Instructions driving symbolic execution
//!
//! Structural values: the engine consults them and substitutes through them
//! when specializing a callee, never mutates them.

use crate::shared::models::{CallFlags, Exp, Ident, Location, Pvar, Typ};
use serde::{Deserialize, Serialize};

/// Origin of a prune (branch) condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PruneKind {
    IfBranch,
    LoopWhile,
    LoopFor,
    Switch,
    Exception,
}

/// Instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Instr {
    /// `id = *exp`
    Load {
        id: Ident,
        exp: Exp,
        typ: Typ,
        loc: Location,
    },
    /// `*lhs = rhs`
    Store {
        lhs: Exp,
        typ: Typ,
        rhs: Exp,
        loc: Location,
    },
    /// Assume `cond` (or its negation when `true_branch` is false)
    Prune {
        cond: Exp,
        loc: Location,
        true_branch: bool,
        kind: PruneKind,
    },
    /// `ret = callee(args)`
    Call {
        ret: Option<(Ident, Typ)>,
        callee: Exp,
        args: Vec<(Exp, Typ)>,
        loc: Location,
        flags: CallFlags,
    },
    /// Forget the value of a program variable
    Nullify { pvar: Pvar, loc: Location },
    /// Explicit abstraction point
    Abstract { loc: Location },
    /// Temporaries going out of scope
    RemoveTemps { ids: Vec<Ident>, loc: Location },
    /// Locals entering scope
    DeclareLocals { locals: Vec<(Pvar, Typ)>, loc: Location },
}

impl Instr {
    pub fn loc(&self) -> &Location {
        match self {
            Instr::Load { loc, .. }
            | Instr::Store { loc, .. }
            | Instr::Prune { loc, .. }
            | Instr::Call { loc, .. }
            | Instr::Nullify { loc, .. }
            | Instr::Abstract { loc }
            | Instr::RemoveTemps { loc, .. }
            | Instr::DeclareLocals { loc, .. } => loc,
        }
    }

    /// Expressions read or written by the instruction, identifiers it binds included
    pub fn exps(&self) -> Vec<Exp> {
        match self {
            Instr::Load { id, exp, .. } => vec![Exp::Var(id.clone()), exp.clone()],
            Instr::Store { lhs, rhs, .. } => vec![lhs.clone(), rhs.clone()],
            Instr::Prune { cond, .. } => vec![cond.clone()],
            Instr::Call { ret, callee, args, .. } => ret
                .iter()
                .map(|(id, _)| Exp::Var(id.clone()))
                .chain(std::iter::once(callee.clone()))
                .chain(args.iter().map(|(e, _)| e.clone()))
                .collect(),
            Instr::Nullify { pvar, .. } => vec![Exp::Lvar(pvar.clone())],
            Instr::Abstract { .. } => vec![],
            Instr::RemoveTemps { ids, .. } => ids.iter().cloned().map(Exp::Var).collect(),
            Instr::DeclareLocals { .. } => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_exps_include_result_binding() {
        let ret = Ident::normal("r", 1);
        let call = Instr::Call {
            ret: Some((ret.clone(), Typ::Int)),
            callee: Exp::Const(crate::shared::models::Const::Fun("f".into())),
            args: vec![(Exp::int(3), Typ::Int)],
            loc: Location::none(),
            flags: CallFlags::default(),
        };
        let exps = call.exps();
        assert_eq!(exps.len(), 3);
        assert_eq!(exps[0], Exp::Var(ret));
        assert_eq!(call.loc(), &Location::none());
    }
}

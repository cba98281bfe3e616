//! Program expressions (values and addresses)
//!
//! Expressions are plain value types: structural equality, a total order, and
//! cheap enough to clone at the sizes symbolic execution produces.

use super::ident::Ident;
use super::program::Pvar;
use super::typ::{FieldName, Typ};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Const {
    Int(i64),
    Str(String),
    /// Function name used as a value (callee of a direct call)
    Fun(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    BNot,
    LNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BinOp {
    PlusA,
    MinusA,
    Mult,
    Div,
    Mod,
    /// Pointer + integer
    PlusPI,
    /// Pointer - pointer
    MinusPP,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    LAnd,
    LOr,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::PlusA => "+",
            BinOp::MinusA => "-",
            BinOp::Mult => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::PlusPI => "+pi",
            BinOp::MinusPP => "-pp",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::LAnd => "&&",
            BinOp::LOr => "||",
        };
        write!(f, "{}", s)
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exp {
    /// Logical identifier
    Var(Ident),
    Const(Const),
    UnOp(UnOp, Box<Exp>, Option<Typ>),
    BinOp(BinOp, Box<Exp>, Box<Exp>),
    Cast(Typ, Box<Exp>),
    /// Address of a program variable
    Lvar(Pvar),
    /// Address of a field: `base.field`
    Lfield(Box<Exp>, FieldName, Typ),
    /// Address of an array element: `base[index]`
    Lindex(Box<Exp>, Box<Exp>),
    /// Size of a type, optionally with a dynamic length (flexible arrays)
    Sizeof {
        typ: Typ,
        dynamic_length: Option<Box<Exp>>,
    },
}

impl Exp {
    pub fn var(id: Ident) -> Self {
        Exp::Var(id)
    }

    pub fn int(n: i64) -> Self {
        Exp::Const(Const::Int(n))
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    /// Null pointer; the same value as zero
    pub fn null() -> Self {
        Self::zero()
    }

    pub fn lvar(pvar: Pvar) -> Self {
        Exp::Lvar(pvar)
    }

    pub fn sizeof(typ: Typ) -> Self {
        Exp::Sizeof {
            typ,
            dynamic_length: None,
        }
    }

    pub fn lfield(base: Exp, field: FieldName, typ: Typ) -> Self {
        Exp::Lfield(Box::new(base), field, typ)
    }

    pub fn lindex(base: Exp, index: Exp) -> Self {
        Exp::Lindex(Box::new(base), Box::new(index))
    }

    pub fn binop(op: BinOp, lhs: Exp, rhs: Exp) -> Self {
        Exp::BinOp(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn as_var(&self) -> Option<&Ident> {
        match self {
            Exp::Var(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Exp::Const(Const::Int(0)))
    }

    /// Rebuild the expression bottom-up: `leaf` may replace an identifier,
    /// `typ` rewrites every embedded type.
    pub fn rebuild(
        &self,
        leaf: &mut impl FnMut(&Ident) -> Option<Exp>,
        typ: &mut impl FnMut(&Typ) -> Typ,
    ) -> Exp {
        match self {
            Exp::Var(id) => leaf(id).unwrap_or_else(|| self.clone()),
            Exp::Const(_) | Exp::Lvar(_) => self.clone(),
            Exp::UnOp(op, e, t) => Exp::UnOp(*op, Box::new(e.rebuild(leaf, typ)), t.as_ref().map(|t| typ(t))),
            Exp::BinOp(op, e1, e2) => Exp::BinOp(
                *op,
                Box::new(e1.rebuild(leaf, typ)),
                Box::new(e2.rebuild(leaf, typ)),
            ),
            Exp::Cast(t, e) => Exp::Cast(typ(t), Box::new(e.rebuild(leaf, typ))),
            Exp::Lfield(e, fld, t) => Exp::Lfield(Box::new(e.rebuild(leaf, typ)), fld.clone(), typ(t)),
            Exp::Lindex(e1, e2) => Exp::Lindex(Box::new(e1.rebuild(leaf, typ)), Box::new(e2.rebuild(leaf, typ))),
            Exp::Sizeof { typ: t, dynamic_length } => Exp::Sizeof {
                typ: typ(t),
                dynamic_length: dynamic_length.as_ref().map(|len| Box::new(len.rebuild(leaf, typ))),
            },
        }
    }
}

impl From<Ident> for Exp {
    fn from(id: Ident) -> Self {
        Exp::Var(id)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Var(id) => write!(f, "{}", id),
            Exp::Const(Const::Int(n)) => write!(f, "{}", n),
            Exp::Const(Const::Str(s)) => write!(f, "{:?}", s),
            Exp::Const(Const::Fun(name)) => write!(f, "_fun_{}", name),
            Exp::UnOp(UnOp::Neg, e, _) => write!(f, "-{}", e),
            Exp::UnOp(UnOp::BNot, e, _) => write!(f, "~{}", e),
            Exp::UnOp(UnOp::LNot, e, _) => write!(f, "!{}", e),
            Exp::BinOp(op, e1, e2) => write!(f, "({} {} {})", e1, op, e2),
            Exp::Cast(t, e) => write!(f, "({}){}", t, e),
            Exp::Lvar(pvar) => write!(f, "{}", pvar),
            Exp::Lfield(e, fld, _) => write!(f, "{}.{}", e, fld),
            Exp::Lindex(e1, e2) => write!(f, "{}[{}]", e1, e2),
            Exp::Sizeof { typ, dynamic_length: None } => write!(f, "sizeof({})", typ),
            Exp::Sizeof { typ, dynamic_length: Some(len) } => write!(f, "sizeof({}[{}])", typ, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_replaces_vars_everywhere() {
        let x = Ident::normal("x", 1);
        let e = Exp::lindex(Exp::var(x.clone()), Exp::binop(BinOp::PlusA, Exp::var(x.clone()), Exp::int(1)));
        let out = e.rebuild(
            &mut |id| (id == &x).then(|| Exp::int(7)),
            &mut |t| t.clone(),
        );
        assert_eq!(out, Exp::lindex(Exp::int(7), Exp::binop(BinOp::PlusA, Exp::int(7), Exp::int(1))));
    }

    #[test]
    fn test_null_is_zero() {
        assert!(Exp::null().is_zero());
        assert_eq!(Exp::null(), Exp::zero());
    }
}

//! Type expressions and field names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type expression
///
/// `Var` is a type parameter (template argument); it is the only form a type
/// substitution rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Typ {
    Int,
    Float,
    Void,
    Ptr(Box<Typ>),
    Struct(String),
    Array { elem: Box<Typ>, length: Option<u64> },
    Fun,
    Var(String),
}

impl Typ {
    pub fn ptr(to: Typ) -> Self {
        Typ::Ptr(Box::new(to))
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Typ::Struct(name.into())
    }

    pub fn array(elem: Typ, length: Option<u64>) -> Self {
        Typ::Array {
            elem: Box::new(elem),
            length,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Typ::Var(name.into())
    }

    /// Rewrite every type parameter through `f`; `f` returns `None` to keep it.
    pub fn map_vars(&self, f: &mut impl FnMut(&str) -> Option<Typ>) -> Typ {
        match self {
            Typ::Var(name) => f(name).unwrap_or_else(|| self.clone()),
            Typ::Ptr(to) => Typ::Ptr(Box::new(to.map_vars(f))),
            Typ::Array { elem, length } => Typ::Array {
                elem: Box::new(elem.map_vars(f)),
                length: *length,
            },
            Typ::Int | Typ::Float | Typ::Void | Typ::Struct(_) | Typ::Fun => self.clone(),
        }
    }
}

impl fmt::Display for Typ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typ::Int => write!(f, "int"),
            Typ::Float => write!(f, "float"),
            Typ::Void => write!(f, "void"),
            Typ::Ptr(to) => write!(f, "{}*", to),
            Typ::Struct(name) => write!(f, "struct {}", name),
            Typ::Array { elem, length: Some(n) } => write!(f, "{}[{}]", elem, n),
            Typ::Array { elem, length: None } => write!(f, "{}[]", elem),
            Typ::Fun => write!(f, "fn"),
            Typ::Var(name) => write!(f, "'{}", name),
        }
    }
}

/// Record field name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldName(pub Arc<str>);

impl FieldName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_vars_reaches_nested_params() {
        let t = Typ::ptr(Typ::array(Typ::var("T"), Some(4)));
        let mapped = t.map_vars(&mut |name| (name == "T").then_some(Typ::Int));
        assert_eq!(mapped, Typ::ptr(Typ::array(Typ::Int, Some(4))));
    }

    #[test]
    fn test_map_vars_keeps_unmapped() {
        let t = Typ::var("U");
        assert_eq!(t.map_vars(&mut |_| None), t);
    }
}

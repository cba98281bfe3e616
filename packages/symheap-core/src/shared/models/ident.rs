//! Logical identifiers
//!
//! An identifier is either *normal* (bound to a program temporary) or one of
//! the two generated kinds: *primed* (existentially quantified inside a
//! formula) and *footprint* (introduced while inferring a precondition).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stamps handed out by [`Ident::fresh`]. Starts high so hand-built
/// identifiers in tests and front-ends rarely sit in the same range.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1 << 32);

/// Identifier kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentKind {
    /// Program temporary
    Normal,
    /// Existential variable
    Primed,
    /// Footprint variable
    Footprint,
}

impl IdentKind {
    fn default_name(self) -> &'static str {
        match self {
            IdentKind::Normal => "n",
            IdentKind::Primed => "t",
            IdentKind::Footprint => "f",
        }
    }
}

/// Logical identifier: `(kind, name, stamp)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ident {
    pub kind: IdentKind,
    pub name: Arc<str>,
    pub stamp: u64,
}

impl Ident {
    pub fn new(kind: IdentKind, name: impl Into<Arc<str>>, stamp: u64) -> Self {
        Self {
            kind,
            name: name.into(),
            stamp,
        }
    }

    pub fn normal(name: impl Into<Arc<str>>, stamp: u64) -> Self {
        Self::new(IdentKind::Normal, name, stamp)
    }

    pub fn primed(name: impl Into<Arc<str>>, stamp: u64) -> Self {
        Self::new(IdentKind::Primed, name, stamp)
    }

    pub fn footprint(name: impl Into<Arc<str>>, stamp: u64) -> Self {
        Self::new(IdentKind::Footprint, name, stamp)
    }

    /// Create an identifier whose stamp was never handed out before.
    ///
    /// The counter is process-wide and atomic, so concurrent analysis tasks
    /// never receive the same fresh identifier.
    pub fn fresh(kind: IdentKind) -> Self {
        let stamp = NEXT_STAMP.fetch_add(1, Ordering::Relaxed);
        Self::new(kind, kind.default_name(), stamp)
    }

    pub fn is_normal(&self) -> bool {
        self.kind == IdentKind::Normal
    }

    pub fn is_primed(&self) -> bool {
        self.kind == IdentKind::Primed
    }

    pub fn is_footprint(&self) -> bool {
        self.kind == IdentKind::Footprint
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IdentKind::Normal => write!(f, "{}${}", self.name, self.stamp),
            IdentKind::Primed => write!(f, "{}${}'", self.name, self.stamp),
            IdentKind::Footprint => write!(f, "{}${}~", self.name, self.stamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_idents_are_distinct() {
        let a = Ident::fresh(IdentKind::Primed);
        let b = Ident::fresh(IdentKind::Primed);
        assert_ne!(a, b);
        assert!(a.is_primed());
        assert!(a.stamp < b.stamp);
    }

    #[test]
    fn test_ident_display() {
        assert_eq!(Ident::normal("x", 3).to_string(), "x$3");
        assert_eq!(Ident::primed("t", 1).to_string(), "t$1'");
        assert_eq!(Ident::footprint("f", 7).to_string(), "f$7~");
    }

    #[test]
    fn test_kind_participates_in_equality() {
        assert_ne!(Ident::normal("x", 1), Ident::primed("x", 1));
    }
}

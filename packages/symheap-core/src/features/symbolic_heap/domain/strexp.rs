//! Structured values stored in heap cells
//!
//! ```text
//! strexp ::= e^inst                          scalar
//!          | { f₁: se₁, ..., fₙ: seₙ }^inst   record (sorted by field)
//!          | [len | i₁: se₁, ..., iₙ: seₙ]^inst array (sorted by index)
//! ```
//!
//! Array invariant (maintained by the owner, never checked here): every
//! explicit index is provably below `len`, and no two indices are provably
//! equal.
//!
//! Equality, ordering and hashing ignore instrumentation. Use
//! [`Strexp::compare_with`] with [`InstComparison::Include`] when tags matter.

use super::inst::Inst;
use crate::shared::models::{Exp, FieldName};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Whether a structural comparison looks at instrumentation tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InstComparison {
    #[default]
    Ignore,
    Include,
}

impl InstComparison {
    pub fn compare(self, i1: &Inst, i2: &Inst) -> Ordering {
        match self {
            InstComparison::Ignore => Ordering::Equal,
            InstComparison::Include => i1.cmp(i2),
        }
    }
}

/// Lexicographic comparison of two sequences, shorter first on a common prefix
pub(crate) fn compare_seq<T>(a: &[T], b: &[T], mut cmp: impl FnMut(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match cmp(x, y) {
            Ordering::Equal => {}
            non_eq => return non_eq,
        }
    }
    a.len().cmp(&b.len())
}

/// Structured value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Strexp {
    Scalar {
        exp: Exp,
        inst: Inst,
    },
    Struct {
        fields: Vec<(FieldName, Arc<Strexp>)>,
        inst: Inst,
    },
    Array {
        len: Exp,
        elems: Vec<(Exp, Arc<Strexp>)>,
        inst: Inst,
    },
}

impl Strexp {
    pub fn scalar(exp: Exp, inst: Inst) -> Self {
        Strexp::Scalar { exp, inst }
    }

    /// Record; fields are kept sorted by name
    pub fn record(mut fields: Vec<(FieldName, Arc<Strexp>)>, inst: Inst) -> Self {
        fields.sort_by(|(f1, _), (f2, _)| f1.cmp(f2));
        Strexp::Struct { fields, inst }
    }

    /// Array; elements are kept sorted by index expression
    pub fn array(len: Exp, mut elems: Vec<(Exp, Arc<Strexp>)>, inst: Inst) -> Self {
        elems.sort_by(|(i1, _), (i2, _)| i1.cmp(i2));
        Strexp::Array { len, elems, inst }
    }

    pub fn inst(&self) -> &Inst {
        match self {
            Strexp::Scalar { inst, .. } | Strexp::Struct { inst, .. } | Strexp::Array { inst, .. } => inst,
        }
    }

    /// Same shape with the outermost tag replaced
    pub fn with_inst(&self, inst: Inst) -> Self {
        match self {
            Strexp::Scalar { exp, .. } => Strexp::Scalar { exp: exp.clone(), inst },
            Strexp::Struct { fields, .. } => Strexp::Struct {
                fields: fields.clone(),
                inst,
            },
            Strexp::Array { len, elems, .. } => Strexp::Array {
                len: len.clone(),
                elems: elems.clone(),
                inst,
            },
        }
    }

    pub fn as_scalar(&self) -> Option<&Exp> {
        match self {
            Strexp::Scalar { exp, .. } => Some(exp),
            _ => None,
        }
    }

    pub fn field(&self, name: &FieldName) -> Option<&Arc<Strexp>> {
        match self {
            Strexp::Struct { fields, .. } => fields.iter().find(|(f, _)| f == name).map(|(_, se)| se),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Strexp::Scalar { .. } => 0,
            Strexp::Struct { .. } => 1,
            Strexp::Array { .. } => 2,
        }
    }

    /// Structural comparison, optionally sensitive to instrumentation
    pub fn compare_with(&self, other: &Strexp, mode: InstComparison) -> Ordering {
        match (self, other) {
            (Strexp::Scalar { exp: e1, inst: i1 }, Strexp::Scalar { exp: e2, inst: i2 }) => {
                e1.cmp(e2).then_with(|| mode.compare(i1, i2))
            }
            (
                Strexp::Struct { fields: f1, inst: i1 },
                Strexp::Struct { fields: f2, inst: i2 },
            ) => compare_seq(f1, f2, |(n1, s1), (n2, s2)| {
                n1.cmp(n2).then_with(|| compare_arc(s1, s2, mode))
            })
            .then_with(|| mode.compare(i1, i2)),
            (
                Strexp::Array {
                    len: l1,
                    elems: el1,
                    inst: i1,
                },
                Strexp::Array {
                    len: l2,
                    elems: el2,
                    inst: i2,
                },
            ) => l1
                .cmp(l2)
                .then_with(|| {
                    compare_seq(el1, el2, |(x1, s1), (x2, s2)| {
                        x1.cmp(x2).then_with(|| compare_arc(s1, s2, mode))
                    })
                })
                .then_with(|| mode.compare(i1, i2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn equal_with(&self, other: &Strexp, mode: InstComparison) -> bool {
        self.compare_with(other, mode) == Ordering::Equal
    }
}

fn compare_arc(s1: &Arc<Strexp>, s2: &Arc<Strexp>, mode: InstComparison) -> Ordering {
    if Arc::ptr_eq(s1, s2) {
        Ordering::Equal
    } else {
        s1.compare_with(s2, mode)
    }
}

impl PartialEq for Strexp {
    fn eq(&self, other: &Self) -> bool {
        self.equal_with(other, InstComparison::Ignore)
    }
}

impl Eq for Strexp {}

impl PartialOrd for Strexp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Strexp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, InstComparison::Ignore)
    }
}

impl Hash for Strexp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Strexp::Scalar { exp, .. } => exp.hash(state),
            Strexp::Struct { fields, .. } => {
                fields.len().hash(state);
                for (name, se) in fields {
                    name.hash(state);
                    se.hash(state);
                }
            }
            Strexp::Array { len, elems, .. } => {
                len.hash(state);
                elems.len().hash(state);
                for (idx, se) in elems {
                    idx.hash(state);
                    se.hash(state);
                }
            }
        }
    }
}

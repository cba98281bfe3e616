//! Instrumentation (Value Object)
//!
//! Provenance tag attached to every value stored in the heap. Tags are
//! diagnostic metadata: they never change the logical meaning of a formula,
//! only the precision of the reports built from it.
//!
//! Lattice operations:
//! - `partial_meet`: total, keeps the more informative tag
//! - `partial_join`: partial, some provenance pairs cannot be merged
//!
//! ```text
//! join(a, a)           = a
//! join(Unknown, _)     = Unknown
//! join(Alloc, _)       = ⊥   (likewise Initial, Update)
//! join(_, _)           = Unknown
//! ```

use crate::errors::{Result, SymHeapError};
use crate::shared::models::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state "dereferenced without a null check" flag
pub type ZeroFlag = Option<bool>;

/// "Produced by case-splitting on null" flag
pub type NullCaseFlag = bool;

/// Position in a procedure's control-flow graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathPos {
    pub proc_name: String,
    pub node_id: u32,
}

impl PathPos {
    pub fn new(proc_name: impl Into<String>, node_id: u32) -> Self {
        Self {
            proc_name: proc_name.into(),
            node_id,
        }
    }
}

/// Instrumentation tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Inst {
    /// Produced by abstraction
    Abstraction,
    /// Actual argument bound to a callee's precondition
    ActualPrecondition,
    /// Freshly allocated
    Alloc,
    /// Formal parameter binding
    Formal(ZeroFlag, NullCaseFlag),
    /// Initial value of the procedure
    Initial,
    /// Read through a lookup
    Lookup,
    /// No provenance recorded
    Unknown,
    /// Nullified program variable
    Nullify,
    /// Materialized by a rearrangement step at `line`
    Rearrange {
        zero_flag: ZeroFlag,
        null_case: NullCaseFlag,
        line: i32,
        pos: PathPos,
    },
    /// Tainted value
    Taint,
    /// Written by a store at `line`
    Update {
        zero_flag: ZeroFlag,
        null_case: NullCaseFlag,
        line: i32,
        pos: PathPos,
    },
    /// Returned from the call at `line`
    ReturnFromCall(i32),
    /// Returned from a pointer-arithmetic call at `line`
    ReturnFromPointerArithCall(i32),
}

/// Outcome of [`Inst::partial_join`]
///
/// `Incompatible` means the two paths must stay separate disjuncts.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstJoin {
    Joined(Inst),
    Incompatible,
}

impl InstJoin {
    pub fn is_incompatible(&self) -> bool {
        matches!(self, InstJoin::Incompatible)
    }

    pub fn joined(self) -> Option<Inst> {
        match self {
            InstJoin::Joined(inst) => Some(inst),
            InstJoin::Incompatible => None,
        }
    }
}

impl Inst {
    pub fn formal() -> Self {
        Inst::Formal(None, false)
    }

    pub fn rearrange(zero: bool, loc: &Location, pos: PathPos) -> Self {
        Inst::Rearrange {
            zero_flag: Some(zero),
            null_case: false,
            line: loc.line,
            pos,
        }
    }

    pub fn update_at(loc: &Location, pos: PathPos) -> Self {
        Inst::Update {
            zero_flag: None,
            null_case: false,
            line: loc.line,
            pos,
        }
    }

    pub fn return_from_call(loc: &Location) -> Self {
        Inst::ReturnFromCall(loc.line)
    }

    pub fn zero_flag(&self) -> ZeroFlag {
        match self {
            Inst::Formal(zf, _) => *zf,
            Inst::Rearrange { zero_flag, .. } | Inst::Update { zero_flag, .. } => *zero_flag,
            _ => None,
        }
    }

    pub fn null_case_flag(&self) -> NullCaseFlag {
        match self {
            Inst::Formal(_, ncf) => *ncf,
            Inst::Rearrange { null_case, .. } | Inst::Update { null_case, .. } => *null_case,
            _ => false,
        }
    }

    pub fn is_abstraction(&self) -> bool {
        matches!(self, Inst::Abstraction)
    }

    /// Mark the tag as produced by a null case split. Monotone.
    pub fn set_null_case_flag(self) -> Self {
        match self {
            Inst::Formal(zf, false) => Inst::Formal(zf, true),
            Inst::Rearrange {
                zero_flag,
                null_case: false,
                line,
                pos,
            } => Inst::Rearrange {
                zero_flag,
                null_case: true,
                line,
                pos,
            },
            inst => inst,
        }
    }

    /// Move the tag to a new source line, leaving both flags untouched
    pub fn new_loc(self, loc: &Location) -> Self {
        match self {
            Inst::Rearrange {
                zero_flag,
                null_case,
                pos,
                ..
            } => Inst::Rearrange {
                zero_flag,
                null_case,
                line: loc.line,
                pos,
            },
            Inst::Update {
                zero_flag,
                null_case,
                pos,
                ..
            } => Inst::Update {
                zero_flag,
                null_case,
                line: loc.line,
                pos,
            },
            Inst::ReturnFromCall(_) => Inst::ReturnFromCall(loc.line),
            Inst::ReturnFromPointerArithCall(_) => Inst::ReturnFromPointerArithCall(loc.line),
            inst => inst,
        }
    }

    /// Replace the provenance of `old` by `new`, carrying the zero flag of
    /// `old` over so the null-check history survives the re-derivation.
    pub fn update(old: &Inst, new: Inst) -> Inst {
        let combine = |z_new: ZeroFlag| match (old.zero_flag(), z_new) {
            (Some(b1), Some(b2)) => Some(b1 || b2),
            (Some(b), None) | (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        match new {
            Inst::Formal(zf, ncf) => Inst::Formal(combine(zf), ncf),
            Inst::Rearrange {
                zero_flag,
                null_case,
                line,
                pos,
            } => Inst::Rearrange {
                zero_flag: combine(zero_flag),
                null_case,
                line,
                pos,
            },
            Inst::Update {
                zero_flag,
                null_case,
                line,
                pos,
            } => Inst::Update {
                zero_flag: combine(zero_flag),
                null_case,
                line,
                pos,
            },
            other => other,
        }
    }

    /// Join of the tags found at the same position on two paths
    pub fn partial_join(&self, other: &Inst) -> InstJoin {
        if self == other {
            return InstJoin::Joined(self.clone());
        }
        let outcome = match (self, other) {
            (Inst::Unknown, _) | (_, Inst::Unknown) => InstJoin::Joined(Inst::Unknown),
            (Inst::Alloc, _) | (_, Inst::Alloc) => InstJoin::Incompatible,
            (Inst::Initial, _) | (_, Inst::Initial) => InstJoin::Incompatible,
            (Inst::Update { .. }, _) | (_, Inst::Update { .. }) => InstJoin::Incompatible,
            _ => InstJoin::Joined(Inst::Unknown),
        };
        if outcome.is_incompatible() {
            tracing::debug!("inst_partial_join failed on {} {}", self, other);
        }
        outcome
    }

    /// [`Inst::partial_join`] as a `Result`, for callers propagating with `?`
    pub fn try_join(&self, other: &Inst) -> Result<Inst> {
        self.partial_join(other)
            .joined()
            .ok_or_else(|| SymHeapError::IncompatibleInst {
                left: self.clone(),
                right: other.clone(),
            })
    }

    /// Meet of the tags of two conjoined facts. Total and commutative.
    pub fn partial_meet(&self, other: &Inst) -> Inst {
        if self == other {
            return self.clone();
        }
        let lhs = (self.specificity(), self);
        let rhs = (other.specificity(), other);
        if lhs >= rhs {
            self.clone()
        } else {
            other.clone()
        }
    }

    fn specificity(&self) -> u8 {
        match self {
            Inst::Unknown => 0,
            Inst::Abstraction => 1,
            Inst::ActualPrecondition
            | Inst::Initial
            | Inst::Lookup
            | Inst::Nullify
            | Inst::Taint => 2,
            Inst::Formal(..) | Inst::ReturnFromCall(_) | Inst::ReturnFromPointerArithCall(_) => 3,
            Inst::Alloc => 4,
            Inst::Rearrange { .. } | Inst::Update { .. } => 5,
        }
    }
}

impl Default for Inst {
    fn default() -> Self {
        Inst::Unknown
    }
}

fn zero_flag_str(zf: ZeroFlag) -> &'static str {
    if zf == Some(true) {
        "(z)"
    } else {
        ""
    }
}

fn null_case_str(ncf: NullCaseFlag) -> &'static str {
    if ncf {
        "(ncf)"
    } else {
        ""
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Abstraction => write!(f, "abstraction"),
            Inst::ActualPrecondition => write!(f, "actual_precondition"),
            Inst::Alloc => write!(f, "alloc"),
            Inst::Formal(zf, ncf) => write!(f, "formal{}{}", zero_flag_str(*zf), null_case_str(*ncf)),
            Inst::Initial => write!(f, "initial"),
            Inst::Lookup => write!(f, "lookup"),
            Inst::Unknown => write!(f, "none"),
            Inst::Nullify => write!(f, "nullify"),
            Inst::Rearrange {
                zero_flag,
                null_case,
                line,
                ..
            } => write!(
                f,
                "rearrange:{}{}{}",
                zero_flag_str(*zero_flag),
                null_case_str(*null_case),
                line
            ),
            Inst::Taint => write!(f, "taint"),
            Inst::Update {
                zero_flag,
                null_case,
                line,
                ..
            } => write!(
                f,
                "update:{}{}{}",
                zero_flag_str(*zero_flag),
                null_case_str(*null_case),
                line
            ),
            Inst::ReturnFromCall(line) => write!(f, "return_from_call: {}", line),
            Inst::ReturnFromPointerArithCall(line) => {
                write!(f, "return_from_pointer_arith_call: {}", line)
            }
        }
    }
}

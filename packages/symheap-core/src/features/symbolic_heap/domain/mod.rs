//! Symbolic Heap Domain - Term Language & Instrumentation Lattice
//!
//! Immutable value objects: once built, a term is never mutated in place, so
//! terms can be shared read-only across analysis tasks.
//!
//! ```text
//! Atom      π  ::= e = e | e ≠ e | p(ē) | ¬p(ē)
//! Strexp    se ::= e^inst | {f: se}^inst | [len | e: se]^inst
//! Hpred     σ  ::= e ↦ se : te | lseg(para, e, e, ē) | dllseg(para, e, e, e, e, ē)
//! Hpara        ::= λ(root, next, svars). ∃evars. σ̄
//! Instr        ::= load | store | prune | call | nullify | abstract | remove_temps | declare_locals
//! ```

pub mod atom;
pub mod hpred;
pub mod inst;
pub mod instr;
pub mod strexp;

pub use atom::Atom;
pub use hpred::{hpred_list_get_lexps, Hpara, HparaDll, Hpred, LsegKind};
pub use inst::{Inst, InstJoin, NullCaseFlag, PathPos, ZeroFlag};
pub use instr::{Instr, PruneKind};
pub use strexp::{InstComparison, Strexp};

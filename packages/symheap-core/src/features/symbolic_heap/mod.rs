//! Symbolic Heap - Separation-Logic Term Layer (Hexagonal Architecture)
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Application   HeapCompactionService (per-pass SharingEnv)    │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Algorithms    substitution · instantiation · compaction      │
//! │               free_vars · expmap · predicates                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Ports         Substitutable · FreeVariables · ExpMap ·       │
//! │               InstMap                                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Domain        Atom · Strexp · Hpred · Hpara · HparaDll ·     │
//! │               Inst · Instr                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: the symbolic-execution engine builds terms, renames
//! them with substitutions at call sites, unfolds segments with
//! [`Hpara::instantiate`], merges tags with [`Inst::partial_join`] and
//! compacts its working set now and then. Nothing here calls back into it.
//!
//! ## Concurrency
//! Terms are immutable and `Send + Sync`. [`SharingEnv`] and
//! [`PredicateRegistry`] are the only mutable objects; both are scoped to a
//! single pass behind `&mut`.
//!
//! ## References
//! - Reynolds (2002), "Separation Logic: A Logic for Shared Mutable Data Structures"
//! - Berdine, Calcagno, O'Hearn (2005), "Symbolic Execution with Separation Logic"
//! - Calcagno et al. (2011), "Compositional Shape Analysis by means of Bi-Abduction"

pub mod application;
pub mod compaction;
pub mod domain;
pub mod expmap;
pub mod free_vars;
pub mod instantiation;
pub mod ports;
pub mod predicates;
pub mod substitution;

pub use application::{CompactionOutcome, HeapCompactionService};
pub use compaction::{compact, compact_arc, compact_strexp, SharingEnv, SharingStats};
pub use domain::{
    hpred_list_get_lexps, Atom, Hpara, HparaDll, Hpred, Inst, InstComparison, InstJoin, Instr, LsegKind,
    NullCaseFlag, PathPos, PruneKind, Strexp, ZeroFlag,
};
pub use expmap::{atom_list_expmap, hpred_list_expmap};
pub use free_vars::{FreeVars, UniqueVars};
pub use instantiation::Instantiation;
pub use ports::{ExpMap, FreeVariables, InstMap, Substitutable};
pub use predicates::PredicateRegistry;
pub use substitution::{atom_sub, exp_sub, hpred_sub, instr_sub, strexp_sub, ExpSubst, Subst, TypSubst};

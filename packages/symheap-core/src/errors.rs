//! Error types for symheap-core
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use crate::features::symbolic_heap::domain::Inst;
use thiserror::Error;

/// Main error type for symbolic heap operations
#[derive(Debug, Error)]
pub enum SymHeapError {
    /// No domain identifier of a substitution satisfied the lookup predicate
    #[error("Binding not found in substitution")]
    BindingNotFound,

    /// Two instrumentation tags cannot be merged; keep the paths separate
    #[error("Instrumentation join not possible: {left} and {right}")]
    IncompatibleInst { left: Inst, right: Inst },

    /// Actual arguments do not match the closure's shared variables
    #[error("Arity mismatch instantiating {what}: expected {expected} shared actuals, got {found}")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SymHeapError {
    /// True for the join failure the engine answers by not merging two paths
    pub fn is_incompatible_join(&self) -> bool {
        matches!(self, SymHeapError::IncompatibleInst { .. })
    }
}

/// Result type alias for symbolic heap operations
pub type Result<T> = std::result::Result<T, SymHeapError>;

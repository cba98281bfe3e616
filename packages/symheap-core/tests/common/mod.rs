//! Common test utilities for symheap-core
//!
//! This module provides shared builders and assertions
//! for integration and property tests.

mod assertions;
mod builders;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;

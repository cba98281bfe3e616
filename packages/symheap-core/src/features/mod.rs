//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/      - Pure value types (no external dependencies)
//! - ports/       - Interface definitions (traits)
//! - application/ - Use cases

// Symbolic heap: terms, substitutions, instantiation, compaction
pub mod symbolic_heap;

/*
 * Symheap Core - Symbolic Heap Layer for Separation-Logic Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Collaborator models (Ident, Exp, Typ, Pvar, Location)
 * - features/    : Vertical slices (symbolic_heap)
 * - config/      : Presets + YAML configuration
 *
 * Performance:
 * - Hash-consed terms behind Arc (pointer-equality shortcuts)
 * - Rayon work-stealing across independent compaction passes
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::derivable_impls)] // Manual impl for documentation

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{Preset, SymHeapConfig};
pub use errors::{Result, SymHeapError};

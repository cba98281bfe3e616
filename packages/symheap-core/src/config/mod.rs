//! Configuration System
//!
//! Two levels:
//! - Level 1: Preset - Simple one-liner
//! - Level 2: YAML with a versioned schema and per-field overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use symheap_core::config::{Preset, SymHeapConfig};
//!
//! // Level 1: preset plus builder tweaks
//! let config = SymHeapConfig::from_preset(Preset::Thorough).parallel_threshold(4);
//! config.validate()?;
//!
//! // Level 2: YAML
//! let config = SymHeapConfig::from_yaml("symheap.yaml")?;
//! ```

pub mod error;
pub mod heap_config;
pub mod io;
pub mod preset;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use heap_config::SymHeapConfig;
pub use io::{ConfigExportV1, SymHeapConfigPatch};
pub use preset::Preset;

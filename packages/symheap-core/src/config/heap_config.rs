//! Symbolic heap configuration
//!
//! Knobs of the compaction service. The term language itself has nothing to
//! configure.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};

/// Compaction service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymHeapConfig {
    /// Share structurally equal sub-terms during a pass
    pub compaction_enabled: bool,

    /// Initial size of each sharing table (1..=10000000)
    pub sharing_table_capacity: usize,

    /// Number of independent passes from which they run on the rayon pool (1..=10000)
    pub parallel_threshold: usize,

    /// Emit per-pass sharing statistics at debug level
    pub log_pass_stats: bool,
}

impl SymHeapConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sharing_table_capacity == 0 || self.sharing_table_capacity > 10_000_000 {
            return Err(ConfigError::range_with_hint(
                "sharing_table_capacity",
                self.sharing_table_capacity,
                1,
                10_000_000,
                "Table capacity is a pre-allocation hint; tables still grow past it",
            ));
        }

        if self.parallel_threshold == 0 || self.parallel_threshold > 10_000 {
            return Err(ConfigError::range_with_hint(
                "parallel_threshold",
                self.parallel_threshold,
                1,
                10_000,
                "Use a large threshold to keep passes sequential",
            ));
        }

        Ok(())
    }

    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                compaction_enabled: false,
                sharing_table_capacity: 256,
                parallel_threshold: 64,
                log_pass_stats: false,
            },
            Preset::Balanced => Self {
                compaction_enabled: true,
                sharing_table_capacity: 4_096,
                parallel_threshold: 8,
                log_pass_stats: false,
            },
            Preset::Thorough => Self {
                compaction_enabled: true,
                sharing_table_capacity: 65_536,
                parallel_threshold: 2,
                log_pass_stats: true,
            },
        }
    }

    /// Builder: Set compaction_enabled
    pub fn compaction_enabled(mut self, v: bool) -> Self {
        self.compaction_enabled = v;
        self
    }

    /// Builder: Set sharing_table_capacity
    pub fn sharing_table_capacity(mut self, v: usize) -> Self {
        self.sharing_table_capacity = v;
        self
    }

    /// Builder: Set parallel_threshold
    pub fn parallel_threshold(mut self, v: usize) -> Self {
        self.parallel_threshold = v;
        self
    }

    /// Builder: Set log_pass_stats
    pub fn log_pass_stats(mut self, v: bool) -> Self {
        self.log_pass_stats = v;
        self
    }
}

impl Default for SymHeapConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

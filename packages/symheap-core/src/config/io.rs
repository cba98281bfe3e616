//! Configuration I/O (YAML)
//!
//! ```yaml
//! version: 1
//! preset: thorough
//! overrides:
//!   parallel_threshold: 4
//! ```
//!
//! Overrides are a patch: absent fields keep the preset's value.

use super::error::{ConfigError, ConfigResult};
use super::heap_config::SymHeapConfig;
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<SymHeapConfigPatch>,
}

/// Patch type for SymHeapConfig (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymHeapConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compaction_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing_table_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_pass_stats: Option<bool>,
}

impl SymHeapConfig {
    /// Apply a patch on top of this configuration
    pub fn patch(mut self, patch: SymHeapConfigPatch) -> Self {
        if let Some(v) = patch.compaction_enabled {
            self.compaction_enabled = v;
        }
        if let Some(v) = patch.sharing_table_capacity {
            self.sharing_table_capacity = v;
        }
        if let Some(v) = patch.parallel_threshold {
            self.parallel_threshold = v;
        }
        if let Some(v) = patch.log_pass_stats {
            self.log_pass_stats = v;
        }
        self
    }

    /// Parse a v1 document and validate the result
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset).map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let config = Self::from_preset(preset).patch(export.overrides.unwrap_or_default());
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export to YAML, every field spelled out over the default preset
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: Preset::default().to_string(),
            overrides: Some(SymHeapConfigPatch {
                compaction_enabled: Some(self.compaction_enabled),
                sharing_table_capacity: Some(self.sharing_table_capacity),
                parallel_threshold: Some(self.parallel_threshold),
                log_pass_stats: Some(self.log_pass_stats),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

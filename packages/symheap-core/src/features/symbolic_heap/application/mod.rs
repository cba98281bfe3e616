//! Symbolic Heap Application Layer - Compaction Passes
//!
//! The engine hands over the predicate sets it wants compacted; the service
//! owns the per-pass [`SharingEnv`] lifecycle so an env is never reused across
//! passes or shared between threads.
//!
//! ## Example
//! ```rust,ignore
//! use symheap_core::config::{Preset, SymHeapConfig};
//! use symheap_core::features::symbolic_heap::application::HeapCompactionService;
//!
//! let service = HeapCompactionService::new(SymHeapConfig::from_preset(Preset::Balanced))?;
//! let outcome = service.compact_pass(&sigma);
//! tracing::info!(hit_rate = outcome.stats.hit_rate(), "compacted");
//! ```

use super::compaction::{compact, SharingEnv, SharingStats};
use super::domain::Hpred;
use crate::config::SymHeapConfig;
use crate::errors::Result;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one pass
#[derive(Debug, Clone)]
pub struct CompactionOutcome {
    /// Compacted predicates, in input order
    pub hpreds: Vec<Arc<Hpred>>,
    /// Sharing counters; all zero when compaction is disabled
    pub stats: SharingStats,
}

/// Config-driven compaction service
pub struct HeapCompactionService {
    config: SymHeapConfig,
}

impl HeapCompactionService {
    /// Create new service; the configuration is validated first
    pub fn new(config: SymHeapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SymHeapConfig {
        &self.config
    }

    /// Compact one predicate set with a fresh sharing table
    pub fn compact_pass(&self, hpreds: &[Hpred]) -> CompactionOutcome {
        if !self.config.compaction_enabled {
            return CompactionOutcome {
                hpreds: hpreds.iter().cloned().map(Arc::new).collect(),
                stats: SharingStats::default(),
            };
        }

        let mut env = SharingEnv::with_capacity(self.config.sharing_table_capacity);
        let shared = hpreds.iter().map(|h| compact(&mut env, h)).collect();
        let stats = env.stats();

        if self.config.log_pass_stats {
            debug!(
                hpreds = hpreds.len(),
                lookups = stats.lookups,
                hits = stats.hits,
                unique_strexps = stats.unique_strexps,
                unique_hpreds = stats.unique_hpreds,
                unique_hparas = stats.unique_hparas,
                "compaction pass"
            );
        }

        CompactionOutcome { hpreds: shared, stats }
    }

    /// Compact independent predicate sets, each with its own table
    ///
    /// Runs on the rayon pool once there are at least `parallel_threshold`
    /// sets (with the `parallel` feature). Output order follows input order.
    pub fn compact_passes(&self, passes: &[Vec<Hpred>]) -> Vec<CompactionOutcome> {
        let outcomes: Vec<CompactionOutcome> = if self.runs_parallel(passes.len()) {
            self.compact_passes_parallel(passes)
        } else {
            passes.iter().map(|pass| self.compact_pass(pass)).collect()
        };

        debug!(
            passes = passes.len(),
            parallel = self.runs_parallel(passes.len()),
            hits = outcomes.iter().map(|o| o.stats.hits).sum::<u64>(),
            "compaction passes finished"
        );
        outcomes
    }

    fn runs_parallel(&self, passes: usize) -> bool {
        cfg!(feature = "parallel") && passes >= self.config.parallel_threshold
    }

    #[cfg(feature = "parallel")]
    fn compact_passes_parallel(&self, passes: &[Vec<Hpred>]) -> Vec<CompactionOutcome> {
        passes.par_iter().map(|pass| self.compact_pass(pass)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compact_passes_parallel(&self, passes: &[Vec<Hpred>]) -> Vec<CompactionOutcome> {
        passes.iter().map(|pass| self.compact_pass(pass)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::features::symbolic_heap::domain::{Inst, Strexp};
    use crate::shared::models::Exp;

    fn cell(addr: i64, value: i64) -> Hpred {
        Hpred::points_to(Exp::int(addr), Strexp::scalar(Exp::int(value), Inst::Unknown), Exp::int(8))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SymHeapConfig::default().parallel_threshold(0);
        let err = HeapCompactionService::new(config).err();
        assert!(matches!(err, Some(crate::errors::SymHeapError::Config(_))));
    }

    #[test]
    fn test_pass_shares_duplicates() {
        let service = HeapCompactionService::new(SymHeapConfig::default()).unwrap();
        let outcome = service.compact_pass(&[cell(1, 7), cell(2, 7), cell(1, 7)]);
        assert_eq!(outcome.hpreds.len(), 3);
        assert!(Arc::ptr_eq(&outcome.hpreds[0], &outcome.hpreds[2]));
        assert!(!Arc::ptr_eq(&outcome.hpreds[0], &outcome.hpreds[1]));
        assert_eq!(outcome.stats.unique_hpreds, 2);
    }

    #[test]
    fn test_disabled_compaction_only_wraps() {
        let service = HeapCompactionService::new(SymHeapConfig::from_preset(Preset::Fast)).unwrap();
        let outcome = service.compact_pass(&[cell(1, 7), cell(1, 7)]);
        assert!(!Arc::ptr_eq(&outcome.hpreds[0], &outcome.hpreds[1]));
        assert_eq!(outcome.hpreds[0], outcome.hpreds[1]);
        assert_eq!(outcome.stats, SharingStats::default());
    }

    #[test]
    fn test_passes_keep_order_and_separate_tables() {
        let service =
            HeapCompactionService::new(SymHeapConfig::default().parallel_threshold(2)).unwrap();
        let passes = vec![vec![cell(1, 1)], vec![cell(1, 1), cell(1, 1)], vec![cell(3, 3)]];
        let outcomes = service.compact_passes(&passes);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].hpreds.len(), 2);
        assert_eq!(outcomes[2].hpreds[0].lhs(), &Exp::int(3));
        // the first pass never sees the second pass's table
        assert_eq!(outcomes[0].stats.hits, 0);
        assert!(!Arc::ptr_eq(&outcomes[0].hpreds[0], &outcomes[1].hpreds[0]));
    }
}

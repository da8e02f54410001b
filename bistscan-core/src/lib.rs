//! bistscan core: multi-timeframe indicator engine and signal scoring.
//!
//! Data flows one way through the crate:
//! - `data`: bars per (symbol, timeframe) from a `BarProvider`
//! - `indicators` / `analysis`: per-timeframe snapshots fused into a `SymbolAggregate`
//! - `scoring`: daily-deduplicated emitted signals and profit-target tracking
//! - `engine`: the `Scanner` that runs one scan cycle over a universe

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod scoring;

pub use config::{ConfigError, ScanConfig};
pub use engine::{LatestAggregates, ScanReport, Scanner};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with the scan-loop thread and
    /// dashboard readers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<analysis::SymbolAggregate>();
        require_sync::<analysis::SymbolAggregate>();
        require_send::<scoring::EmittedSignal>();
        require_sync::<scoring::EmittedSignal>();
        require_send::<scoring::ScoringSession>();
        require_sync::<scoring::ScoringSession>();
        require_send::<engine::LatestAggregates>();
        require_sync::<engine::LatestAggregates>();
        require_send::<Scanner<data::SyntheticProvider>>();
        require_send::<Scanner<data::YahooProvider>>();
    }

    /// Predicates see only typed snapshots, never raw bars or the ledgers.
    #[test]
    fn condition_signature_takes_snapshot_only() {
        fn _check(
            condition: analysis::SuperCondition,
            snapshot: Option<&analysis::IndicatorSnapshot>,
            config: &ScanConfig,
        ) -> analysis::ConditionOutcome {
            condition.evaluate(snapshot, config)
        }
    }
}

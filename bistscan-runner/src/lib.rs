//! bistscan runner: the scheduler around `bistscan_core::Scanner`.
//!
//! - `RunnerConfig` TOML with the nested scan configuration
//! - `ScanLoop`: periodic background scans with a stop flag
//! - `SignalSink`: where emitted signals and notices go
//! - market-hours status for presentation layers

pub mod config;
pub mod market;
pub mod scan_loop;
pub mod sink;

pub use config::{RunnerConfig, RunnerError};
pub use market::market_open;
pub use scan_loop::{run_cycle, LoopOptions, ScanLoop, ScanStatus, StatusReport};
pub use sink::{CollectingSink, LogSink, SignalSink};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<RunnerConfig>();
        assert_sync::<RunnerConfig>();
    }

    #[test]
    fn status_is_send_sync() {
        assert_send::<ScanStatus>();
        assert_sync::<ScanStatus>();
    }

    #[test]
    fn sinks_are_send_sync() {
        assert_send::<LogSink>();
        assert_sync::<LogSink>();
        assert_send::<CollectingSink>();
        assert_sync::<CollectingSink>();
    }
}

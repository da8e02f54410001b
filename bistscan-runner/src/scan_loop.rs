//! Periodic scanning on a background thread.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bistscan_core::data::BarProvider;
use bistscan_core::engine::AggregatesView;
use bistscan_core::{LatestAggregates, ScanReport, Scanner};

use crate::config::RunnerError;
use crate::market::market_open;
use crate::sink::SignalSink;

pub const STARTUP_NOTICE: &str = "System started: BIST scan active";
pub const RESET_NOTICE: &str = "09:50 reset: new trading day scan started";

/// Granularity of stop-flag checks while waiting for the next cycle.
const STOP_POLL: Duration = Duration::from_millis(200);

/// Scheduler state exposed to presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatus {
    pub system_active: bool,
    pub market_open: bool,
    pub last_scan: Option<DateTime<FixedOffset>>,
    pub last_signal_count: usize,
    pub cycles: u64,
}

/// Status plus the latest aggregates, read together.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub status: ScanStatus,
    pub data: AggregatesView,
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub interval: Duration,
    /// Stop after this many cycles. `None` runs until stopped.
    pub max_cycles: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_cycles: None,
        }
    }
}

/// One scan cycle: run the scan and hand its results to `sink`.
pub fn run_cycle<P, S>(scanner: &mut Scanner<P>, symbols: &[String], sink: &S) -> ScanReport
where
    P: BarProvider,
    S: SignalSink + ?Sized,
{
    let report = scanner.run_scan(symbols);
    if report.reset_performed {
        sink.notice(RESET_NOTICE);
    }
    for signal in &report.signals {
        sink.publish(signal);
    }
    report
}

/// Handle on a running scan thread.
pub struct ScanLoop {
    stop: Arc<AtomicBool>,
    status: Arc<Mutex<ScanStatus>>,
    latest: LatestAggregates,
    handle: Option<JoinHandle<()>>,
}

impl ScanLoop {
    pub fn spawn<P, S>(
        mut scanner: Scanner<P>,
        symbols: Vec<String>,
        sink: S,
        options: LoopOptions,
    ) -> Result<Self, RunnerError>
    where
        P: BarProvider + 'static,
        S: SignalSink + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let status = Arc::new(Mutex::new(ScanStatus::default()));
        let latest = scanner.latest_aggregates();

        let thread_stop = Arc::clone(&stop);
        let thread_status = Arc::clone(&status);
        let handle = thread::Builder::new()
            .name("bistscan-loop".into())
            .spawn(move || {
                {
                    let mut st = thread_status.lock().unwrap_or_else(PoisonError::into_inner);
                    st.system_active = true;
                    st.market_open = market_open(scanner.now_local());
                }
                sink.notice(STARTUP_NOTICE);
                tracing::info!(symbols = symbols.len(), "scan loop started");

                let mut cycles = 0u64;
                while !thread_stop.load(Ordering::Relaxed) {
                    let started = Instant::now();
                    let report = run_cycle(&mut scanner, &symbols, &sink);
                    cycles += 1;
                    {
                        let mut st = thread_status.lock().unwrap_or_else(PoisonError::into_inner);
                        st.market_open = market_open(report.finished_at);
                        st.last_scan = Some(report.finished_at);
                        st.last_signal_count = report.signals.len();
                        st.cycles = cycles;
                    }
                    if options.max_cycles.is_some_and(|max| cycles >= max) {
                        break;
                    }
                    wait_or_stop(&thread_stop, options.interval.saturating_sub(started.elapsed()));
                }

                thread_status
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .system_active = false;
                tracing::info!(cycles, "scan loop stopped");
            })
            .map_err(|e| RunnerError::Spawn(e.to_string()))?;

        Ok(Self {
            stop,
            status,
            latest,
            handle: Some(handle),
        })
    }

    pub fn status(&self) -> ScanStatus {
        self.status.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn report(&self) -> StatusReport {
        StatusReport {
            status: self.status(),
            data: self.latest.snapshot(),
        }
    }

    pub fn latest_aggregates(&self) -> LatestAggregates {
        self.latest.clone()
    }

    /// Shared stop flag, e.g. for a Ctrl-C handler.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the thread to exit. Does not request a stop by itself.
    pub fn join(mut self) -> ScanStatus {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("scan loop thread panicked");
            }
        }
        self.status()
    }
}

impl Drop for ScanLoop {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn wait_or_stop(stop: &AtomicBool, total: Duration) {
    let deadline = Instant::now() + total;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_early_when_stopped() {
        let stop = AtomicBool::new(true);
        let started = Instant::now();
        wait_or_stop(&stop, Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn status_serializes_flat() {
        let report = StatusReport {
            status: ScanStatus {
                system_active: true,
                ..ScanStatus::default()
            },
            data: AggregatesView::default(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["system_active"], true);
        assert!(json["data"]["aggregates"].as_object().unwrap().is_empty());
    }
}

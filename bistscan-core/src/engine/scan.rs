//! `Scanner`: one synchronous pass over the universe per call.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use crate::analysis::{aggregate, AggregateError, SymbolAggregate};
use crate::config::{ConfigError, ScanConfig};
use crate::data::{fetch_all, BarProvider};
use crate::scoring::{EmittedSignal, ScoringSession};

/// Aggregates of the most recent scan plus its completion time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatesView {
    pub scanned_at: Option<DateTime<FixedOffset>>,
    pub aggregates: BTreeMap<String, SymbolAggregate>,
}

/// Shared read handle on the latest scan results.
///
/// The scanner replaces the whole view under one lock at the end of a scan,
/// so readers never observe a half-written cycle.
#[derive(Debug, Clone, Default)]
pub struct LatestAggregates {
    inner: Arc<Mutex<AggregatesView>>,
}

impl LatestAggregates {
    pub fn snapshot(&self) -> AggregatesView {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn get(&self, symbol: &str) -> Option<SymbolAggregate> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .aggregates
            .get(symbol)
            .cloned()
    }

    fn replace(&self, view: AggregatesView) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = view;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Emitted signals in universe order, fixed kind order within a symbol.
    pub signals: Vec<EmittedSignal>,
    /// Symbols that produced an aggregate.
    pub scanned: usize,
    /// Symbols skipped for missing data.
    pub skipped: Vec<String>,
    /// This scan performed the daily ledger reset.
    pub reset_performed: bool,
    pub finished_at: DateTime<FixedOffset>,
}

pub struct Scanner<P: BarProvider> {
    provider: P,
    session: ScoringSession,
    clock: Box<dyn Clock>,
    latest: LatestAggregates,
    symbol_pause: Duration,
}

impl<P: BarProvider> Scanner<P> {
    pub fn new(provider: P, config: ScanConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            provider,
            session: ScoringSession::new(config)?,
            clock: Box::new(SystemClock),
            latest: LatestAggregates::default(),
            symbol_pause: Duration::ZERO,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sleep between symbols to stay under provider rate limits.
    pub fn with_symbol_pause(mut self, pause: Duration) -> Self {
        self.symbol_pause = pause;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn session(&self) -> &ScoringSession {
        &self.session
    }

    pub fn config(&self) -> &ScanConfig {
        self.session.config()
    }

    /// Current time in exchange-local form.
    pub fn now_local(&self) -> DateTime<FixedOffset> {
        self.session.calendar().local(self.clock.now())
    }

    /// Handle for readers outside the scan loop.
    pub fn latest_aggregates(&self) -> LatestAggregates {
        self.latest.clone()
    }

    pub fn run_scan<S: AsRef<str>>(&mut self, symbols: &[S]) -> ScanReport {
        let now = self.clock.now();
        self.run_scan_at(symbols, now)
    }

    pub fn run_scan_at<S: AsRef<str>>(&mut self, symbols: &[S], now: DateTime<Utc>) -> ScanReport {
        let local = self.session.calendar().local(now);
        let reset_performed = self.session.check_daily_reset(local);

        let mut signals = Vec::new();
        let mut skipped = Vec::new();
        let mut aggregates = BTreeMap::new();

        for (i, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.as_ref();
            if i > 0 && !self.symbol_pause.is_zero() {
                std::thread::sleep(self.symbol_pause);
            }
            if !self.provider.is_available() {
                tracing::warn!(symbol, provider = self.provider.name(), "provider unavailable, skipping");
                skipped.push(symbol.to_string());
                continue;
            }
            match self.analyze_symbol(symbol) {
                Ok(agg) => {
                    signals.extend(self.session.emit(&agg, local));
                    aggregates.insert(symbol.to_string(), agg);
                }
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "skipping symbol");
                    skipped.push(symbol.to_string());
                }
            }
        }

        let scanned = aggregates.len();
        self.latest.replace(AggregatesView {
            scanned_at: Some(local),
            aggregates,
        });
        tracing::info!(
            scanned,
            skipped = skipped.len(),
            signals = signals.len(),
            reset = reset_performed,
            "scan finished"
        );

        ScanReport {
            signals,
            scanned,
            skipped,
            reset_performed,
            finished_at: local,
        }
    }

    /// Fetch and fuse one symbol without touching the ledgers.
    pub fn analyze_symbol(&self, symbol: &str) -> Result<SymbolAggregate, AggregateError> {
        let bars = fetch_all(&self.provider, symbol);
        aggregate(symbol, &bars, self.session.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataError, SyntheticProvider};
    use crate::domain::{Bar, Timeframe};
    use crate::engine::FixedClock;
    use chrono::TimeZone;

    struct Failing;

    impl BarProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, symbol: &str, _timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
            Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    #[test]
    fn failing_symbols_are_skipped() {
        let mut scanner = Scanner::new(Failing, ScanConfig::default())
            .unwrap()
            .with_clock(FixedClock::new(now()));
        let report = scanner.run_scan(&["THYAO", "ASELS"]);
        assert_eq!(report.scanned, 0);
        assert_eq!(report.skipped, ["THYAO", "ASELS"]);
        assert!(report.signals.is_empty());
        assert!(scanner.session().ledger().is_empty());
    }

    #[test]
    fn latest_aggregates_replaced_each_scan() {
        let provider = SyntheticProvider::new(now());
        let mut scanner = Scanner::new(provider, ScanConfig::default()).unwrap();
        let latest = scanner.latest_aggregates();
        assert!(latest.snapshot().scanned_at.is_none());

        scanner.run_scan_at(&["THYAO", "GARAN"], now());
        let view = latest.snapshot();
        assert_eq!(view.aggregates.len(), 2);
        assert!(latest.get("GARAN").is_some());

        scanner.run_scan_at(&["ASELS"], now());
        let view = latest.snapshot();
        assert_eq!(view.aggregates.keys().collect::<Vec<_>>(), ["ASELS"]);
    }

    #[test]
    fn first_scan_after_boundary_resets() {
        let provider = SyntheticProvider::new(now());
        let mut scanner = Scanner::new(provider, ScanConfig::default()).unwrap();
        // 08:00 UTC = 11:00 local
        assert!(scanner.run_scan_at(&["THYAO"], now()).reset_performed);
        assert!(!scanner.run_scan_at(&["THYAO"], now()).reset_performed);
    }
}

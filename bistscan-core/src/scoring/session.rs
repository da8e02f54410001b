//! Scoring session: the daily ledgers plus the emit step.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::analysis::SymbolAggregate;
use crate::config::{ConfigError, ScanConfig};

use super::calendar::TradingCalendar;
use super::ledger::{SentSignalLedger, SignalKind};
use super::message;
use super::signal::{EmittedSignal, MarketContext, SignalPayload};
use super::success::{SuccessStatus, SuccessTracker};

/// Owns every piece of state that survives between scans.
///
/// One session per scanner. Nothing here is global, so independent sessions
/// never observe each other's emissions.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    config: ScanConfig,
    calendar: TradingCalendar,
    ledger: SentSignalLedger,
    tracker: SuccessTracker,
}

impl ScoringSession {
    pub fn new(config: ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let calendar = config.calendar()?;
        Ok(Self {
            config,
            calendar,
            ledger: SentSignalLedger::new(),
            tracker: SuccessTracker::new(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    pub fn ledger(&self) -> &SentSignalLedger {
        &self.ledger
    }

    pub fn tracker(&self) -> &SuccessTracker {
        &self.tracker
    }

    /// Clear the sent ledger on the first call past the daily boundary.
    ///
    /// A performed reset also evicts success history older than
    /// `retain_days` trading days.
    pub fn check_daily_reset(&mut self, now: DateTime<FixedOffset>) -> bool {
        if !self
            .ledger
            .reset_if_due(now.naive_local(), self.calendar.reset_time())
        {
            return false;
        }
        let today = self.calendar.trading_day(&now);
        let cutoff = self
            .calendar
            .trading_days_back(today, self.config.retain_days.saturating_sub(1));
        let evicted = self.tracker.evict_before(cutoff);
        tracing::info!(%today, evicted, "daily reset");
        true
    }

    /// Turn one aggregate into this scan's emitted signals.
    ///
    /// The success check runs before any registration, so labels describe
    /// the position as it stood when the scan started.
    pub fn emit(&mut self, aggregate: &SymbolAggregate, now: DateTime<FixedOffset>) -> Vec<EmittedSignal> {
        let symbol = aggregate.symbol.as_str();
        let price = aggregate.current_price;
        let day = self.calendar.trading_day(&now);
        let success = self.tracker.check(symbol, day, price);
        let context = MarketContext::from_aggregate(aggregate, now);

        let mut out = Vec::new();
        let score = &aggregate.super_score;

        if score.qualifies(self.config.super_threshold) && self.claim(symbol, SignalKind::Super, day, price) {
            let message = message::super_message(&context, score.score, score.bonus, &score.conditions, success);
            out.push(EmittedSignal::new(
                SignalPayload::Super {
                    context: context.clone(),
                    score: score.score,
                    bonus: score.bonus,
                    conditions: score.conditions.clone(),
                    success,
                },
                message,
            ));
        }

        if aggregate.composite_signal && self.claim(symbol, SignalKind::Combo, day, price) {
            let message = message::combo_message(&context, success);
            out.push(EmittedSignal::new(
                SignalPayload::Combo {
                    context: context.clone(),
                    success,
                },
                message,
            ));
        }

        if aggregate.three_peak_break && self.claim(symbol, SignalKind::ThreePeak, day, price) {
            let message = message::three_peak_message(&context, success);
            out.push(EmittedSignal::new(
                SignalPayload::ThreePeak {
                    context: context.clone(),
                    success,
                },
                message,
            ));
        }

        if let Some(signal) = aggregate.legacy_signal {
            if self.claim(symbol, SignalKind::from(signal), day, price) {
                let message = message::legacy_message(&context, signal, success);
                out.push(EmittedSignal::new(
                    SignalPayload::Legacy {
                        context,
                        signal,
                        success,
                    },
                    message,
                ));
            }
        }

        for signal in &out {
            tracing::debug!(key = %signal.key, "signal emitted");
        }
        out
    }

    /// Current label for `symbol` on the trading day containing `now`.
    pub fn success_status(&self, symbol: &str, now: DateTime<FixedOffset>) -> Option<SuccessStatus> {
        self.tracker.status(symbol, self.calendar.trading_day(&now))
    }

    /// Mark `(symbol, kind)` sent; tracked kinds also open the day's position.
    fn claim(&mut self, symbol: &str, kind: SignalKind, day: NaiveDate, price: f64) -> bool {
        if !self.ledger.mark_sent(symbol, kind) {
            return false;
        }
        if kind.tracks_success() {
            self.tracker
                .register(symbol, day, price, self.config.target_multiplier());
        }
        true
    }
}

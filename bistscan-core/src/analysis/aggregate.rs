//! Multi-timeframe aggregator: all timeframes of one symbol → `SymbolAggregate`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::config::ScanConfig;
use crate::domain::{Bar, Timeframe};

use super::conditions::SuperScore;
use super::snapshot::{analyze, IndicatorSnapshot};

/// Bars per timeframe for one symbol. A missing key means "unavailable".
pub type TimeframeBars = BTreeMap<Timeframe, Vec<Bar>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// Without the fast timeframe there is no current price to score against.
    #[error("no usable {timeframe} bars for {symbol}")]
    FastTimeframeUnavailable { symbol: String, timeframe: Timeframe },
}

/// Legacy RSI threshold signal from the fast timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacySignal {
    /// Buy: oversold.
    #[serde(rename = "AL")]
    Al,
    /// Sell: overbought.
    #[serde(rename = "SAT")]
    Sat,
}

impl LegacySignal {
    pub fn from_rsi(rsi: f64, oversold: f64, overbought: f64) -> Option<Self> {
        if rsi < oversold {
            Some(LegacySignal::Al)
        } else if rsi > overbought {
            Some(LegacySignal::Sat)
        } else {
            None
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            LegacySignal::Al => "AL",
            LegacySignal::Sat => "SAT",
        }
    }
}

impl fmt::Display for LegacySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Short-term trend read from the fast MA20 direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

/// Per-symbol fusion of every tracked timeframe for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAggregate {
    pub symbol: String,
    /// Snapshots of the available timeframes only.
    pub snapshots: BTreeMap<Timeframe, IndicatorSnapshot>,
    /// Latest fast-timeframe close.
    pub current_price: f64,
    /// Percent change across the fetched fast window, 2 dp.
    pub change_pct: f64,
    pub volume: Option<u64>,
    pub trend: Trend,
    pub legacy_signal: Option<LegacySignal>,
    pub three_peak_break: bool,
    pub composite_signal: bool,
    pub super_score: SuperScore,
}

impl SymbolAggregate {
    pub fn snapshot(&self, timeframe: Timeframe) -> Option<&IndicatorSnapshot> {
        self.snapshots.get(&timeframe)
    }

    pub fn fast(&self) -> Option<&IndicatorSnapshot> {
        self.snapshot(Timeframe::M15)
    }

    pub fn fast_rsi(&self) -> Option<f64> {
        self.fast().and_then(|s| s.rsi)
    }
}

/// Daily candle green and at least one of the fast/medium candles green.
pub fn composite_signal(snapshots: &BTreeMap<Timeframe, IndicatorSnapshot>) -> bool {
    let green = |tf: Timeframe| snapshots.get(&tf).and_then(|s| s.green).unwrap_or(false);
    green(Timeframe::D1) && (green(Timeframe::M15) || green(Timeframe::H1))
}

fn change_pct(bars: &[Bar]) -> f64 {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return 0.0;
    };
    if !first.close.is_finite() || first.close == 0.0 {
        return 0.0;
    }
    let pct = (last.close - first.close) / first.close * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Fuse one symbol's timeframes.
///
/// Timeframes absent from `bars` (or with no usable bars) fail only the
/// conditions that reference them. The fast timeframe is required.
pub fn aggregate(
    symbol: &str,
    bars: &TimeframeBars,
    config: &ScanConfig,
) -> Result<SymbolAggregate, AggregateError> {
    let snapshots: BTreeMap<Timeframe, IndicatorSnapshot> = bars
        .iter()
        .filter_map(|(&tf, series)| analyze(series, tf, config).map(|snap| (tf, snap)))
        .collect();

    let fast = snapshots
        .get(&Timeframe::M15)
        .ok_or_else(|| AggregateError::FastTimeframeUnavailable {
            symbol: symbol.to_string(),
            timeframe: Timeframe::M15,
        })?;

    let legacy_signal = fast
        .rsi
        .and_then(|rsi| LegacySignal::from_rsi(rsi, config.oversold, config.overbought));
    let trend = match fast.direction(20) {
        Some(direction) if direction.is_bullish() => Trend::Up,
        _ => Trend::Down,
    };
    let fast_bars = bars.get(&Timeframe::M15).map(Vec::as_slice).unwrap_or_default();

    Ok(SymbolAggregate {
        symbol: symbol.to_string(),
        current_price: fast.last_close,
        change_pct: change_pct(fast_bars),
        volume: fast.volume,
        trend,
        legacy_signal,
        three_peak_break: fast.three_peak_break,
        composite_signal: composite_signal(&snapshots),
        super_score: SuperScore::evaluate(&snapshots, config),
        snapshots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn bars_for(entries: &[(Timeframe, &[f64])]) -> TimeframeBars {
        entries
            .iter()
            .map(|(tf, closes)| (*tf, make_bars(closes)))
            .collect()
    }

    #[test]
    fn missing_fast_timeframe_is_an_error() {
        let bars = bars_for(&[(Timeframe::D1, &[10.0, 11.0])]);
        let err = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, AggregateError::FastTimeframeUnavailable { .. }));
    }

    #[test]
    fn empty_fast_series_is_an_error() {
        let mut bars = TimeframeBars::new();
        bars.insert(Timeframe::M15, Vec::new());
        assert!(aggregate("THYAO", &bars, &ScanConfig::default()).is_err());
    }

    #[test]
    fn legacy_thresholds() {
        assert_eq!(LegacySignal::from_rsi(25.0, 30.0, 70.0), Some(LegacySignal::Al));
        assert_eq!(LegacySignal::from_rsi(75.0, 30.0, 70.0), Some(LegacySignal::Sat));
        assert_eq!(LegacySignal::from_rsi(30.0, 30.0, 70.0), None);
        assert_eq!(LegacySignal::from_rsi(70.0, 30.0, 70.0), None);
    }

    #[test]
    fn falling_fast_series_is_oversold() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let bars = bars_for(&[(Timeframe::M15, &closes)]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert_eq!(agg.legacy_signal, Some(LegacySignal::Al));
        assert_eq!(agg.trend, Trend::Down);
        assert_eq!(agg.current_price, 81.0);
        assert_eq!(agg.change_pct, -19.0);
    }

    #[test]
    fn composite_requires_daily_snapshot() {
        let bars = bars_for(&[(Timeframe::M15, &[10.0, 11.0]), (Timeframe::H1, &[10.0, 11.0])]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(!agg.composite_signal);
    }

    #[test]
    fn composite_daily_green_and_intraday_green() {
        let bars = bars_for(&[
            (Timeframe::M15, &[11.0, 10.0]),
            (Timeframe::H1, &[10.0, 11.0]),
            (Timeframe::D1, &[10.0, 11.0]),
        ]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(agg.composite_signal);
    }

    #[test]
    fn composite_fast_green_medium_red() {
        let bars = bars_for(&[
            (Timeframe::M15, &[10.0, 11.0]),
            (Timeframe::H1, &[11.0, 10.0]),
            (Timeframe::D1, &[10.0, 11.0]),
        ]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(agg.composite_signal);
    }

    #[test]
    fn composite_false_when_both_intraday_red() {
        let bars = bars_for(&[
            (Timeframe::M15, &[11.0, 10.0]),
            (Timeframe::H1, &[11.0, 10.0]),
            (Timeframe::D1, &[10.0, 11.0]),
        ]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(!agg.composite_signal);
    }

    #[test]
    fn composite_false_when_daily_red() {
        let bars = bars_for(&[
            (Timeframe::M15, &[10.0, 11.0]),
            (Timeframe::H1, &[10.0, 11.0]),
            (Timeframe::D1, &[11.0, 10.0]),
        ]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(!agg.composite_signal);
    }

    #[test]
    fn unavailable_timeframes_only_fail_their_conditions() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        // falling fast pair: RSI 0 keeps the healthy-RSI condition unmet
        let bars = bars_for(&[(Timeframe::M15, &[11.0, 10.0]), (Timeframe::D1, &closes)]);
        let agg = aggregate("THYAO", &bars, &ScanConfig::default()).unwrap();
        assert!(agg.snapshot(Timeframe::H1).is_none());
        assert_eq!(agg.super_score.score, 20);
    }
}

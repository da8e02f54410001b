//! Timeframe analyzer: bars of one (symbol, timeframe) → `IndicatorSnapshot`.
//!
//! Each sub-computation degrades on its own: a field that cannot be computed
//! is `None`/false while the rest of the snapshot stays usable. Only an empty
//! series, or one whose latest close is not a number, yields no snapshot at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ScanConfig;
use crate::domain::{Bar, Timeframe};
use crate::indicators::{
    ma_direction, moving_average, pivot_levels, rolling_levels, rsi, support_resistance_break,
    three_peak_breakout, MaDirection, SrBreak, SupportResistance,
};

/// Number of trailing closes / MA values kept for slope and cross checks.
pub const TAIL_LEN: usize = 4;

/// Bars averaged (excluding the latest) for the volume baseline.
pub const VOLUME_AVG_BARS: usize = 5;

/// Normalized indicator state for one timeframe at the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timeframe: Timeframe,
    pub bar_count: usize,
    /// Latest RSI in [0, 100].
    pub rsi: Option<f64>,
    pub ma_values: BTreeMap<usize, f64>,
    pub ma_directions: BTreeMap<usize, MaDirection>,
    pub last_close: f64,
    pub last_open: Option<f64>,
    /// Close strictly above open; `None` when the open is missing.
    pub green: Option<bool>,
    pub volume: Option<u64>,
    /// Mean volume of the five bars before the latest one.
    pub volume_avg_5: Option<f64>,
    pub sr_break: SrBreak,
    /// Rolling extremes over `sr_lookback` bars, current bar included.
    pub levels: SupportResistance,
    pub pivots: SupportResistance,
    pub three_peak_break: bool,
    /// Last `TAIL_LEN` closes, oldest first.
    pub recent_closes: Vec<f64>,
    /// Last `TAIL_LEN` MA values per window, oldest first.
    pub ma_tails: BTreeMap<usize, Vec<f64>>,
}

impl IndicatorSnapshot {
    /// Close `n` bars back from the latest (0 = latest).
    pub fn close_back(&self, n: usize) -> Option<f64> {
        back(&self.recent_closes, n)
    }

    /// MA value for `window`, `n` bars back from the latest (0 = latest).
    pub fn ma_back(&self, window: usize, n: usize) -> Option<f64> {
        self.ma_tails.get(&window).and_then(|tail| back(tail, n))
    }

    pub fn ma(&self, window: usize) -> Option<f64> {
        self.ma_values.get(&window).copied()
    }

    pub fn direction(&self, window: usize) -> Option<MaDirection> {
        self.ma_directions.get(&window).copied()
    }

    /// Latest volume above the trailing five-bar average. `None` if either is missing.
    pub fn volume_spike(&self) -> Option<bool> {
        Some(self.volume? as f64 > self.volume_avg_5?)
    }
}

fn back(tail: &[f64], n: usize) -> Option<f64> {
    if n >= tail.len() {
        return None;
    }
    let v = tail[tail.len() - 1 - n];
    v.is_finite().then_some(v)
}

fn tail(series: &[f64]) -> Vec<f64> {
    series[series.len().saturating_sub(TAIL_LEN)..].to_vec()
}

/// Analyze one timeframe. `None` signals "timeframe unavailable".
pub fn analyze(bars: &[Bar], timeframe: Timeframe, config: &ScanConfig) -> Option<IndicatorSnapshot> {
    let last = bars.last()?;
    if !last.close.is_finite() {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let rsi_value = rsi(&closes, config.rsi_period.max(1))
        .last()
        .copied()
        .filter(|v| v.is_finite());

    let mut ma_values = BTreeMap::new();
    let mut ma_directions = BTreeMap::new();
    let mut ma_tails = BTreeMap::new();
    for &window in &config.ma_windows {
        if window == 0 {
            continue;
        }
        let ma = moving_average(&closes, window);
        if let Some(&value) = ma.last().filter(|v| v.is_finite()) {
            ma_values.insert(window, value);
        }
        if let Some(direction) = ma_direction(&closes, &ma) {
            ma_directions.insert(window, direction);
        }
        ma_tails.insert(window, tail(&ma));
    }

    let last_open = Some(last.open).filter(|o| o.is_finite());
    let n = bars.len();
    let volume_avg_5 = (n > VOLUME_AVG_BARS).then(|| {
        let prior = &bars[n - 1 - VOLUME_AVG_BARS..n - 1];
        prior.iter().map(|b| b.volume as f64).sum::<f64>() / VOLUME_AVG_BARS as f64
    });

    Some(IndicatorSnapshot {
        timeframe,
        bar_count: n,
        rsi: rsi_value,
        ma_values,
        ma_directions,
        last_close: last.close,
        last_open,
        green: last_open.map(|open| last.close > open),
        volume: Some(last.volume),
        volume_avg_5,
        sr_break: support_resistance_break(bars, config.sr_lookback),
        levels: rolling_levels(bars, config.sr_lookback),
        pivots: pivot_levels(bars, config.pivot_lookback),
        three_peak_break: three_peak_breakout(&closes),
        recent_closes: tail(&closes),
        ma_tails,
    })
}

//! Support/resistance levels and breaks.
//!
//! Three views over the same highs/lows:
//! - `support_resistance_break`: latest close against the prior `lookback`
//!   bars' extremes (the current bar excluded).
//! - `rolling_levels`: extremes of the last `lookback` bars, current included.
//! - `pivot_levels`: nearest 3-bar pivot low/high around the latest close.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Break flags for the latest bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrBreak {
    pub support: bool,
    pub resistance: bool,
}

/// A support/resistance pair; either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

fn finite_min(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| v.is_finite()).reduce(f64::min)
}

fn finite_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| v.is_finite()).reduce(f64::max)
}

/// Support/resistance break of the latest close.
///
/// The reference low/high is the rolling min of lows / max of highs over the
/// `lookback` bars ending at the second-to-last bar. Needs at least two bars;
/// otherwise both flags are false.
pub fn support_resistance_break(bars: &[Bar], lookback: usize) -> SrBreak {
    let n = bars.len();
    if n < 2 || lookback == 0 {
        return SrBreak::default();
    }
    let prior = &bars[(n - 1).saturating_sub(lookback)..n - 1];
    let current = bars[n - 1].close;

    let prev_low = finite_min(prior.iter().map(|b| b.low));
    let prev_high = finite_max(prior.iter().map(|b| b.high));

    SrBreak {
        support: prev_low.is_some_and(|low| current < low),
        resistance: prev_high.is_some_and(|high| current > high),
    }
}

/// Rolling min of lows and max of highs over the last `lookback` bars.
pub fn rolling_levels(bars: &[Bar], lookback: usize) -> SupportResistance {
    let window = &bars[bars.len().saturating_sub(lookback)..];
    SupportResistance {
        support: finite_min(window.iter().map(|b| b.low)),
        resistance: finite_max(window.iter().map(|b| b.high)),
    }
}

/// Nearest pivot-based support and resistance around the latest close.
///
/// A pivot high is a bar whose high equals the max of itself and its two
/// neighbours (pivot low likewise with lows). Only the last `lookback` bars
/// are scanned. Resistance is the lowest pivot high above the close, falling
/// back to the highest pivot high; support is the highest pivot low below the
/// close, falling back to the lowest pivot low.
pub fn pivot_levels(bars: &[Bar], lookback: usize) -> SupportResistance {
    let window = &bars[bars.len().saturating_sub(lookback)..];
    let Some(last) = window.last() else {
        return SupportResistance::default();
    };
    if window.len() < 3 || !last.close.is_finite() {
        return SupportResistance::default();
    }
    let current = last.close;

    let mut pivot_highs = Vec::new();
    let mut pivot_lows = Vec::new();
    for w in window.windows(3) {
        let mid = &w[1];
        if mid.high.is_finite() && finite_max(w.iter().map(|b| b.high)) == Some(mid.high) {
            pivot_highs.push(mid.high);
        }
        if mid.low.is_finite() && finite_min(w.iter().map(|b| b.low)) == Some(mid.low) {
            pivot_lows.push(mid.low);
        }
    }

    let resistance = finite_min(pivot_highs.iter().copied().filter(|&h| h > current))
        .or_else(|| finite_max(pivot_highs.iter().copied()));
    let support = finite_max(pivot_lows.iter().copied().filter(|&l| l < current))
        .or_else(|| finite_min(pivot_lows.iter().copied()));

    SupportResistance {
        support,
        resistance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn single_bar_never_breaks() {
        let bars = make_bars(&[100.0]);
        assert_eq!(support_resistance_break(&bars, 20), SrBreak::default());
    }

    #[test]
    fn resistance_break_excludes_current_bar() {
        // make_bars highs are max(open, close) + 1; prior highs top out at 12.0
        let bars = make_bars(&[10.0, 11.0, 10.5, 13.5]);
        let brk = support_resistance_break(&bars, 20);
        assert!(brk.resistance);
        assert!(!brk.support);
    }

    #[test]
    fn support_break_below_prior_low() {
        let bars = make_bars(&[10.0, 11.0, 10.5, 8.0]);
        let brk = support_resistance_break(&bars, 20);
        assert!(brk.support);
        assert!(!brk.resistance);
    }

    #[test]
    fn lookback_limits_reference_window() {
        // the early 30.0 high falls outside a 2-bar lookback
        let bars = make_bars(&[29.0, 10.0, 10.5, 10.2, 12.0]);
        assert!(!support_resistance_break(&bars, 20).resistance);
        assert!(support_resistance_break(&bars, 2).resistance);
    }

    #[test]
    fn rolling_levels_include_current() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let levels = rolling_levels(&bars, 20);
        assert_eq!(levels.support, Some(9.0));
        assert_eq!(levels.resistance, Some(13.0));
    }

    #[test]
    fn rolling_levels_empty() {
        assert_eq!(rolling_levels(&[], 20), SupportResistance::default());
    }

    #[test]
    fn pivot_levels_nearest_around_close() {
        let closes = [10.0, 14.0, 11.0, 16.0, 9.0, 12.0];
        let bars = make_bars(&closes);
        let levels = pivot_levels(&bars, 100);
        // pivot highs: 15.0 (bar 1), 17.0 (bars 3, 4); close 12 → nearest above is 15
        assert_eq!(levels.resistance, Some(15.0));
        // pivot lows: 9.0 (bar 1), 8.0 (bar 4) → highest below 12 is 9
        assert_eq!(levels.support, Some(9.0));
    }

    #[test]
    fn pivot_levels_fall_back_to_extremes() {
        // close above every pivot high → highest pivot high
        let bars = make_bars(&[10.0, 14.0, 11.0, 30.0]);
        let levels = pivot_levels(&bars, 100);
        assert_eq!(levels.resistance, Some(15.0));
    }
}

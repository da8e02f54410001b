//! Simple Moving Average (SMA) and price-vs-MA direction.
//!
//! Rolling mean of close prices over a window, with partial windows for the
//! first `window - 1` bars. NaN closes are skipped; a window holding no finite
//! close yields NaN.

use serde::{Deserialize, Serialize};

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(closes.len());
        let mut sum = 0.0;
        let mut count = 0usize;

        for (i, &entering) in closes.iter().enumerate() {
            if entering.is_finite() {
                sum += entering;
                count += 1;
            }
            if i >= self.window {
                let leaving = closes[i - self.window];
                if leaving.is_finite() {
                    sum -= leaving;
                    count -= 1;
                }
            }
            result.push(if count == 0 { f64::NAN } else { sum / count as f64 });
        }

        result
    }
}

/// Rolling arithmetic mean of `closes` over `window` bars.
pub fn moving_average(closes: &[f64], window: usize) -> Vec<f64> {
    Sma::new(window).compute(closes)
}

/// Where the latest close sits relative to a moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaDirection {
    Above,
    Below,
    /// Close was at or below the MA on the prior bar and is above it now.
    GoldenCross,
    /// Close was above the MA on the prior bar and is at or below it now.
    DeathCross,
}

impl MaDirection {
    /// True for `Above` and `GoldenCross`.
    pub fn is_bullish(self) -> bool {
        matches!(self, MaDirection::Above | MaDirection::GoldenCross)
    }
}

/// Direction of the latest close against its MA series.
///
/// Both slices are aligned bar-for-bar. Returns `None` when the series is empty
/// or the latest close/MA is not finite.
pub fn ma_direction(closes: &[f64], ma: &[f64]) -> Option<MaDirection> {
    let n = closes.len().min(ma.len());
    if n == 0 {
        return None;
    }
    let (close, avg) = (closes[n - 1], ma[n - 1]);
    if !close.is_finite() || !avg.is_finite() {
        return None;
    }
    let above_now = close > avg;

    if n >= 2 && closes[n - 2].is_finite() && ma[n - 2].is_finite() {
        let above_before = closes[n - 2] > ma[n - 2];
        match (above_before, above_now) {
            (false, true) => return Some(MaDirection::GoldenCross),
            (true, false) => return Some(MaDirection::DeathCross),
            _ => {}
        }
    }

    Some(if above_now {
        MaDirection::Above
    } else {
        MaDirection::Below
    })
}

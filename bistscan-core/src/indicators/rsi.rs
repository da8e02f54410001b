//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are simple rolling means over `period`
//! price changes (partial windows allowed), not Wilder's exponential smoothing.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → 50 (neutral, including strictly rising series);
//! no price change available yet (first bar) → 50.

use super::Indicator;

/// Neutral RSI reported when the loss average is zero or undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![NEUTRAL_RSI; n];

        // changes[i] = closes[i] - closes[i-1]; changes[0] is undefined
        let changes: Vec<f64> = (0..n)
            .map(|i| {
                if i == 0 {
                    f64::NAN
                } else {
                    closes[i] - closes[i - 1]
                }
            })
            .collect();

        for (i, slot) in result.iter_mut().enumerate() {
            let start = (i + 1).saturating_sub(self.period).max(1);
            if start > i {
                continue;
            }
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            let mut count = 0usize;
            for &ch in &changes[start..=i] {
                if ch.is_nan() {
                    continue;
                }
                if ch > 0.0 {
                    gain_sum += ch;
                } else {
                    loss_sum -= ch;
                }
                count += 1;
            }
            if count == 0 {
                continue;
            }
            *slot = compute_rsi(gain_sum / count as f64, loss_sum / count as f64);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        NEUTRAL_RSI
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// RSI series for a close series. Only the final value is consumed downstream.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    Rsi::new(period).compute(closes)
}

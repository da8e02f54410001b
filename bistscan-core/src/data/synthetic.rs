//! Deterministic random-walk bars for offline runs and tests.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{BarProvider, DataError};
use crate::domain::{Bar, Timeframe};

const DEFAULT_BARS: usize = 220;

/// Same `(symbol, timeframe)` always yields the same series for a given anchor.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    anchor: DateTime<Utc>,
    bars: usize,
}

impl SyntheticProvider {
    /// Series end at `anchor` (the last bar's timestamp).
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            bars: DEFAULT_BARS,
        }
    }

    pub fn with_bars(mut self, bars: usize) -> Self {
        self.bars = bars;
        self
    }

    fn seed(symbol: &str, timeframe: Timeframe) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(b"/");
        hasher.update(timeframe.label().as_bytes());
        *hasher.finalize().as_bytes()
    }

    pub fn generate(&self, symbol: &str, timeframe: Timeframe) -> Vec<Bar> {
        let mut rng = StdRng::from_seed(Self::seed(symbol, timeframe));
        let step = Duration::minutes(i64::from(timeframe.minutes()));
        // Longer bars move more.
        let swing = 0.004 * (f64::from(timeframe.minutes()) / 15.0).sqrt();

        let mut price = rng.gen_range(5.0..400.0_f64);
        let start = self.anchor - step * (self.bars.saturating_sub(1) as i32);
        (0..self.bars)
            .map(|i| {
                let ret: f64 = rng.gen_range(-swing..swing);
                let open = price;
                let close = (price * (1.0 + ret)).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..swing / 2.0));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..swing / 2.0));
                price = close;
                Bar {
                    timestamp: start + step * (i as i32),
                    open,
                    high,
                    low,
                    close,
                    volume: rng.gen_range(10_000..2_000_000u64),
                }
            })
            .collect()
    }
}

impl BarProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        Ok(self.generate(symbol, timeframe))
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn provider() -> SyntheticProvider {
        SyntheticProvider::new(Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap())
    }

    #[test]
    fn deterministic_per_symbol_and_timeframe() {
        let p = provider();
        assert_eq!(p.generate("THYAO", Timeframe::M15), p.generate("THYAO", Timeframe::M15));
        assert_ne!(p.generate("THYAO", Timeframe::M15), p.generate("ASELS", Timeframe::M15));
        assert_ne!(p.generate("THYAO", Timeframe::M15), p.generate("THYAO", Timeframe::H1));
    }

    #[test]
    fn bars_are_sane_and_end_at_anchor() {
        let p = provider().with_bars(50);
        let bars = p.generate("GARAN", Timeframe::H4);
        assert_eq!(bars.len(), 50);
        assert!(bars.iter().all(Bar::is_sane));
        assert_eq!(bars.last().unwrap().timestamp, p.anchor);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}

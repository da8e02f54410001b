//! Sampling resolutions tracked by the scanner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bar resolution. Ordered fast to slow: 15m is the fast intraday view,
/// 1h medium, 4h slow, 1D daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1D")]
    D1,
}

impl Timeframe {
    /// Every tracked timeframe, fast to slow.
    pub const ALL: [Timeframe; 4] = [Timeframe::M15, Timeframe::H1, Timeframe::H4, Timeframe::D1];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1D",
        }
    }

    /// Bar length in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Timeframe::M15 => 15,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }

    /// Chart API `(interval, range)`. 4h has no native interval and is
    /// resampled from 60m bars.
    pub fn yahoo_query(self) -> (&'static str, &'static str) {
        match self {
            Timeframe::M15 => ("15m", "7d"),
            Timeframe::H1 => ("60m", "14d"),
            Timeframe::H4 => ("60m", "60d"),
            Timeframe::D1 => ("1d", "120d"),
        }
    }

    /// Hours per bucket when bars must be built by resampling.
    pub fn resample_hours(self) -> Option<u32> {
        match self {
            Timeframe::H4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_ordered_fast_to_slow() {
        let mut sorted = Timeframe::ALL;
        sorted.sort();
        assert_eq!(sorted, Timeframe::ALL);
        assert!(Timeframe::ALL.windows(2).all(|w| w[0].minutes() < w[1].minutes()));
    }

    #[test]
    fn only_four_hour_is_resampled() {
        assert_eq!(Timeframe::H4.resample_hours(), Some(4));
        assert_eq!(Timeframe::H4.yahoo_query().0, "60m");
        assert!(Timeframe::ALL
            .iter()
            .filter(|tf| **tf != Timeframe::H4)
            .all(|tf| tf.resample_hours().is_none()));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Timeframe::D1).unwrap();
        assert_eq!(json, "\"1D\"");
    }
}

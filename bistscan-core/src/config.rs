//! Scan configuration.
//!
//! All thresholds and windows the engine uses live here so a TOML file can
//! override them. Every field has a default; an empty file is a valid config.

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::scoring::TradingCalendar;

/// MA windows the super-score predicates read directly.
pub const SCORING_MA_WINDOWS: [usize; 2] = [20, 50];

/// Errors from loading or validating a scan configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be >= 1")]
    ZeroPeriod { field: &'static str },

    #[error("ma_windows must include {0} (used by the super score)")]
    MissingScoringWindow(usize),

    #[error("invalid RSI thresholds: {0}")]
    InvalidThresholds(String),

    #[error("invalid reset_time '{0}' (expected HH:MM)")]
    InvalidResetTime(String),

    #[error("utc_offset_hours {0} out of range (-14..=14)")]
    InvalidOffset(i32),
}

/// Engine configuration for one scanner instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// RSI lookback in bars.
    pub rsi_period: usize,
    /// Moving-average windows computed for every timeframe.
    pub ma_windows: Vec<usize>,
    /// Lookback for support/resistance breaks and display levels.
    pub sr_lookback: usize,
    /// Bars scanned for pivot-based support/resistance.
    pub pivot_lookback: usize,
    /// Fast RSI below this emits the legacy `AL` signal.
    pub oversold: f64,
    /// Fast RSI above this emits the legacy `SAT` signal.
    pub overbought: f64,
    /// Minimum super score (0..=100) that emits a `SUPER` signal.
    pub super_threshold: u8,
    /// Inclusive fast RSI band for the healthy-pullback condition.
    pub rsi_band: (f64, f64),
    /// Profit target above entry, in percent.
    pub target_pct: f64,
    /// Local exchange time at which the trading day rolls over (HH:MM).
    pub reset_time: String,
    /// Exchange offset from UTC in whole hours.
    pub utc_offset_hours: i32,
    /// Trading days of success history kept per symbol (current day included).
    pub retain_days: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_windows: vec![20, 50, 100, 200],
            sr_lookback: 20,
            pivot_lookback: 100,
            oversold: 30.0,
            overbought: 70.0,
            super_threshold: 80,
            rsi_band: (45.0, 65.0),
            target_pct: 2.0,
            reset_time: "09:50".into(),
            utc_offset_hours: 3,
            retain_days: 2,
        }
    }
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("rsi_period", self.rsi_period),
            ("sr_lookback", self.sr_lookback),
            ("pivot_lookback", self.pivot_lookback),
            ("retain_days", self.retain_days as usize),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod { field });
            }
        }
        if self.ma_windows.contains(&0) {
            return Err(ConfigError::ZeroPeriod { field: "ma_windows" });
        }
        for window in SCORING_MA_WINDOWS {
            if !self.ma_windows.contains(&window) {
                return Err(ConfigError::MissingScoringWindow(window));
            }
        }
        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return Err(ConfigError::InvalidThresholds(format!(
                "oversold {} / overbought {}",
                self.oversold, self.overbought
            )));
        }
        let (lo, hi) = self.rsi_band;
        if lo > hi || !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) {
            return Err(ConfigError::InvalidThresholds(format!("rsi_band ({lo}, {hi})")));
        }
        if self.super_threshold > 100 {
            return Err(ConfigError::InvalidThresholds(format!(
                "super_threshold {} > 100",
                self.super_threshold
            )));
        }
        if self.target_pct.is_nan() || self.target_pct <= 0.0 {
            return Err(ConfigError::InvalidThresholds(format!(
                "target_pct {} must be positive",
                self.target_pct
            )));
        }
        self.reset_time()?;
        self.utc_offset()?;
        Ok(())
    }

    pub fn reset_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.reset_time, "%H:%M")
            .map_err(|_| ConfigError::InvalidResetTime(self.reset_time.clone()))
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if !(-14..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::InvalidOffset(self.utc_offset_hours));
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_hours))
    }

    /// Trading calendar built from `reset_time` and `utc_offset_hours`.
    pub fn calendar(&self) -> Result<TradingCalendar, ConfigError> {
        Ok(TradingCalendar::new(self.reset_time()?, self.utc_offset()?))
    }

    /// Multiplier applied to an entry price to get its target.
    pub fn target_multiplier(&self) -> f64 {
        1.0 + self.target_pct / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        ScanConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_is_default() {
        let config = ScanConfig::from_toml("").unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = ScanConfig::from_toml("super_threshold = 60\nreset_time = \"10:00\"").unwrap();
        assert_eq!(config.super_threshold, 60);
        assert_eq!(config.reset_time().unwrap(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(config.rsi_period, 14);
    }

    #[test]
    fn target_multiplier_is_two_percent() {
        assert!((ScanConfig::default().target_multiplier() - 1.02).abs() < 1e-12);
    }

    #[test]
    fn rejects_missing_scoring_window() {
        let err = ScanConfig::from_toml("ma_windows = [20, 100]").unwrap_err();
        assert!(matches!(err, ConfigError::MissingScoringWindow(50)));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = ScanConfig::from_toml("oversold = 80.0\noverbought = 20.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds(_)));
    }

    #[test]
    fn rejects_bad_reset_time() {
        let err = ScanConfig::from_toml("reset_time = \"9.50\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidResetTime(_)));
    }

    #[test]
    fn rejects_zero_period() {
        let err = ScanConfig::from_toml("rsi_period = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPeriod { field: "rsi_period" }));
    }

    #[test]
    fn rejects_offset_out_of_range() {
        let err = ScanConfig::from_toml("utc_offset_hours = 15").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOffset(15)));
    }
}

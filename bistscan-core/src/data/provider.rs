//! Bar provider trait and structured error types.
//!
//! The scanner only sees `BarProvider`; Yahoo, synthetic data and test stubs
//! all sit behind it.

use thiserror::Error;

use crate::analysis::TimeframeBars;
use crate::domain::{Bar, Timeframe};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no {timeframe} bars for {symbol}")]
    NoBars { symbol: String, timeframe: Timeframe },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("data error: {0}")]
    Other(String),
}

/// Source of OHLCV bars for one `(symbol, timeframe)`.
///
/// Implementations return bars oldest first. An error means the timeframe is
/// unavailable for this scan; callers never retry it within the scan.
pub trait BarProvider: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError>;

    /// False while the provider is refusing requests (rate limit, ban).
    fn is_available(&self) -> bool;
}

impl<P: BarProvider + ?Sized> BarProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        (**self).fetch(symbol, timeframe)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Fetch every timeframe for `symbol`, leaving failed ones out of the map.
pub fn fetch_all<P: BarProvider + ?Sized>(provider: &P, symbol: &str) -> TimeframeBars {
    let mut out = TimeframeBars::new();
    for tf in Timeframe::ALL {
        match provider.fetch(symbol, tf) {
            Ok(bars) if !bars.is_empty() => {
                out.insert(tf, bars);
            }
            Ok(_) => tracing::debug!(symbol, timeframe = %tf, "empty bar series"),
            Err(e) => tracing::debug!(symbol, timeframe = %tf, error = %e, "timeframe unavailable"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    struct OnlyFast;

    impl BarProvider for OnlyFast {
        fn name(&self) -> &str {
            "only_fast"
        }

        fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
            match timeframe {
                Timeframe::M15 => Ok(make_bars(&[1.0, 2.0, 3.0])),
                Timeframe::H1 => Ok(Vec::new()),
                _ => Err(DataError::NoBars {
                    symbol: symbol.to_string(),
                    timeframe,
                }),
            }
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn fetch_all_drops_unavailable_timeframes() {
        let bars = fetch_all(&OnlyFast, "THYAO");
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[&Timeframe::M15].len(), 3);
    }

    #[test]
    fn boxed_provider_delegates() {
        let boxed: Box<dyn BarProvider> = Box::new(OnlyFast);
        assert_eq!(boxed.name(), "only_fast");
        assert!(boxed.is_available());
    }

    #[test]
    fn error_messages() {
        let err = DataError::NoBars {
            symbol: "THYAO".into(),
            timeframe: Timeframe::H4,
        };
        assert_eq!(err.to_string(), "no 4h bars for THYAO");
    }
}

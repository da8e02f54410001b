//! Bar retrieval: provider seam, Yahoo chart client, synthetic bars, universe.

pub mod circuit_breaker;
pub mod provider;
pub mod resample;
pub mod synthetic;
pub mod universe;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use provider::{fetch_all, BarProvider, DataError};
pub use resample::resample;
pub use synthetic::SyntheticProvider;
pub use universe::{display_symbol, yahoo_ticker, Universe, UniverseError, FALLBACK_SYMBOLS};
pub use yahoo::YahooProvider;

//! Domain types for bistscan.

pub mod bar;
pub mod timeframe;

pub use bar::Bar;
pub use timeframe::Timeframe;

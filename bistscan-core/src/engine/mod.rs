//! Scan-cycle entry point.

mod clock;
mod scan;

pub use clock::{Clock, FixedClock, SystemClock};
pub use scan::{AggregatesView, LatestAggregates, ScanReport, Scanner};

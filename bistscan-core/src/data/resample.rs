//! Intraday bar resampling into fixed UTC buckets.

use chrono::{DateTime, Utc};

use crate::domain::Bar;

/// Group `bars` into `hours`-long buckets aligned to UTC midnight.
///
/// Each bucket takes the first open, max high, min low, last close and summed
/// volume. Void bars are skipped; buckets left empty produce no bar.
pub fn resample(bars: &[Bar], hours: u32) -> Vec<Bar> {
    if hours == 0 {
        return Vec::new();
    }
    let span = i64::from(hours) * 3600;
    let mut out: Vec<Bar> = Vec::new();
    let mut current_bucket: Option<i64> = None;

    for bar in bars.iter().filter(|b| !b.is_void()) {
        let bucket = bar.timestamp.timestamp().div_euclid(span);
        match out.last_mut() {
            Some(last) if current_bucket == Some(bucket) => {
                last.high = last.high.max(bar.high);
                last.low = last.low.min(bar.low);
                last.close = bar.close;
                last.volume = last.volume.saturating_add(bar.volume);
            }
            _ => {
                let Some(start) = DateTime::<Utc>::from_timestamp(bucket * span, 0) else {
                    continue;
                };
                out.push(Bar {
                    timestamp: start,
                    ..bar.clone()
                });
                current_bucket = Some(bucket);
            }
        }
    }
    out
}

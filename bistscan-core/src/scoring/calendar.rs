//! Exchange-local time and the trading-day boundary.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

/// Converts wall-clock time to exchange-local time and trading days.
///
/// The trading day rolls over at `reset_time` local, not at midnight: before
/// the boundary the previous date is still the current trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingCalendar {
    reset_time: NaiveTime,
    offset: FixedOffset,
}

impl TradingCalendar {
    pub fn new(reset_time: NaiveTime, offset: FixedOffset) -> Self {
        Self { reset_time, offset }
    }

    pub fn reset_time(&self) -> NaiveTime {
        self.reset_time
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// True once local time has reached the daily boundary.
    pub fn past_boundary(&self, local: &DateTime<FixedOffset>) -> bool {
        local.time() >= self.reset_time
    }

    pub fn trading_day(&self, local: &DateTime<FixedOffset>) -> NaiveDate {
        let date = local.date_naive();
        if self.past_boundary(local) {
            date
        } else {
            date - Duration::days(1)
        }
    }

    /// The trading day `n` sessions before `day`. Weekends are skipped;
    /// holidays are not modeled.
    pub fn trading_days_back(&self, day: NaiveDate, n: u32) -> NaiveDate {
        let mut current = day;
        for _ in 0..n {
            current -= Duration::days(1);
            while is_weekend(current) {
                current -= Duration::days(1);
            }
        }
        current
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

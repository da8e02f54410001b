//! Exchange session hours.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};

/// Session open, minutes after local midnight (09:55).
pub const SESSION_OPEN_MINUTE: u32 = 9 * 60 + 55;
/// Session close, minutes after local midnight (18:00).
pub const SESSION_CLOSE_MINUTE: u32 = 18 * 60;

/// Weekday and within `[09:55, 18:00)` exchange-local time. Holidays are not modeled.
pub fn market_open(now_local: DateTime<FixedOffset>) -> bool {
    if matches!(now_local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let minute = now_local.hour() * 60 + now_local.minute();
    (SESSION_OPEN_MINUTE..SESSION_CLOSE_MINUTE).contains(&minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        // March 2024: the 4th is a Monday.
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, h, m, 0)
            .unwrap()
    }

    #[test]
    fn weekday_session_bounds() {
        assert!(!market_open(at(4, 9, 54)));
        assert!(market_open(at(4, 9, 55)));
        assert!(market_open(at(4, 17, 59)));
        assert!(!market_open(at(4, 18, 0)));
    }

    #[test]
    fn weekend_closed() {
        assert!(!market_open(at(2, 12, 0)));
        assert!(!market_open(at(3, 12, 0)));
    }

    proptest::proptest! {
        #[test]
        fn open_iff_weekday_in_session(day in 4u32..=10, h in 0u32..24, m in 0u32..60) {
            let minute = h * 60 + m;
            let weekday = day <= 8;
            let expected = weekday && (SESSION_OPEN_MINUTE..SESSION_CLOSE_MINUTE).contains(&minute);
            proptest::prop_assert_eq!(market_open(at(day, h, m)), expected);
        }
    }
}

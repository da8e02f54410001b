use chrono::{DateTime, FixedOffset, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of "now" for the scanner.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Clock at a local exchange time.
    pub fn at_local(local: DateTime<FixedOffset>) -> Self {
        Self::new(local.with_timezone(&Utc))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn fixed_clock_is_shared_between_clones() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
        let clock = FixedClock::new(t0);
        let other = clock.clone();
        clock.advance(Duration::minutes(15));
        assert_eq!(other.now(), t0 + Duration::minutes(15));
    }

    #[test]
    fn at_local_converts_to_utc() {
        let local = FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, 10, 0, 0)
            .unwrap();
        let clock = FixedClock::at_local(local);
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap());
    }
}

//! Per-symbol, per-trading-day profit-target tracking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Success label attached to signals of a tracked day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessStatus {
    Hit,
    NotYetHit,
}

impl fmt::Display for SuccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessStatus::Hit => f.write_str("hit"),
            SuccessStatus::NotYetHit => f.write_str("not yet hit"),
        }
    }
}

/// The first tracked signal of a day for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub entry_price: f64,
    pub target_price: f64,
    /// Monotonic: once true it never reverts.
    pub hit: bool,
}

impl TrackedEntry {
    pub fn status(&self) -> SuccessStatus {
        if self.hit {
            SuccessStatus::Hit
        } else {
            SuccessStatus::NotYetHit
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuccessTracker {
    entries: HashMap<String, BTreeMap<NaiveDate, TrackedEntry>>,
}

impl SuccessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tracked entry for `(symbol, day)` unless one already exists.
    ///
    /// Returns true if a new entry was created. Later signals the same day keep
    /// the first entry price.
    pub fn register(&mut self, symbol: &str, day: NaiveDate, price: f64, target_multiplier: f64) -> bool {
        let days = self.entries.entry(symbol.to_string()).or_default();
        if days.contains_key(&day) {
            return false;
        }
        days.insert(
            day,
            TrackedEntry {
                entry_price: price,
                target_price: price * target_multiplier,
                hit: false,
            },
        );
        true
    }

    /// Compare `price` against the day's target and return the current label.
    ///
    /// `None` when the symbol has no entry for that day.
    pub fn check(&mut self, symbol: &str, day: NaiveDate, price: f64) -> Option<SuccessStatus> {
        let entry = self.entries.get_mut(symbol)?.get_mut(&day)?;
        if !entry.hit && price >= entry.target_price {
            entry.hit = true;
        }
        Some(entry.status())
    }

    pub fn entry(&self, symbol: &str, day: NaiveDate) -> Option<&TrackedEntry> {
        self.entries.get(symbol)?.get(&day)
    }

    /// Label for `(symbol, day)` without evaluating a new price.
    pub fn status(&self, symbol: &str, day: NaiveDate) -> Option<SuccessStatus> {
        self.entry(symbol, day).map(TrackedEntry::status)
    }

    /// Drop every day before `cutoff`. Returns the number of entries removed.
    pub fn evict_before(&mut self, cutoff: NaiveDate) -> usize {
        let mut removed = 0;
        for days in self.entries.values_mut() {
            let kept = days.split_off(&cutoff);
            removed += days.len();
            *days = kept;
        }
        self.entries.retain(|_, days| !days.is_empty());
        removed
    }

    /// Total tracked (symbol, day) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

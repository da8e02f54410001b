//! Per-trading-day record of emitted signal kinds.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::analysis::LegacySignal;

/// Kinds of emitted signal; the unit of per-day deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "SUPER")]
    Super,
    #[serde(rename = "COMBO")]
    Combo,
    #[serde(rename = "3PEAK")]
    ThreePeak,
    #[serde(rename = "AL")]
    Al,
    #[serde(rename = "SAT")]
    Sat,
}

impl SignalKind {
    pub fn code(self) -> &'static str {
        match self {
            SignalKind::Super => "SUPER",
            SignalKind::Combo => "COMBO",
            SignalKind::ThreePeak => "3PEAK",
            SignalKind::Al => "AL",
            SignalKind::Sat => "SAT",
        }
    }

    /// Whether emitting this kind opens a success-tracked position.
    pub fn tracks_success(self) -> bool {
        matches!(self, SignalKind::Super | SignalKind::Combo | SignalKind::ThreePeak)
    }
}

impl From<LegacySignal> for SignalKind {
    fn from(signal: LegacySignal) -> Self {
        match signal {
            LegacySignal::Al => SignalKind::Al,
            LegacySignal::Sat => SignalKind::Sat,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Symbol → kinds already emitted in the current trading day.
#[derive(Debug, Clone, Default)]
pub struct SentSignalLedger {
    sent: HashMap<String, HashSet<SignalKind>>,
    last_reset: Option<NaiveDate>,
}

impl SentSignalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_sent(&self, symbol: &str, kind: SignalKind) -> bool {
        self.sent.get(symbol).is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Record an emission. Returns false if the pair was already sent today.
    pub fn mark_sent(&mut self, symbol: &str, kind: SignalKind) -> bool {
        self.sent.entry(symbol.to_string()).or_default().insert(kind)
    }

    /// Clear the ledger once per day, on the first call at or after `boundary`.
    ///
    /// Returns true only on the call that performed the reset. A local date
    /// earlier than the last reset is an inconsistent input and changes nothing.
    pub fn reset_if_due(&mut self, local: NaiveDateTime, boundary: NaiveTime) -> bool {
        if local.time() < boundary {
            return false;
        }
        let today = local.date();
        match self.last_reset {
            Some(last) if last == today => false,
            Some(last) if last > today => {
                tracing::warn!(%last, %today, "ignoring daily reset for a date before the last reset");
                false
            }
            _ => {
                self.sent.clear();
                self.last_reset = Some(today);
                true
            }
        }
    }

    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.last_reset
    }

    /// Number of (symbol, kind) pairs sent today.
    pub fn len(&self) -> usize {
        self.sent.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

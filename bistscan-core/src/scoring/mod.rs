//! Signal scoring and success tracking.
//!
//! A `ScoringSession` owns both ledgers: the per-day record of emitted signal
//! kinds and the per-day success tracker. Nothing else mutates them.

pub mod calendar;
pub mod ledger;
pub mod message;
pub mod session;
pub mod signal;
pub mod success;

pub use calendar::TradingCalendar;
pub use ledger::{SentSignalLedger, SignalKind};
pub use session::ScoringSession;
pub use signal::{EmittedSignal, MarketContext, SignalPayload};
pub use success::{SuccessStatus, SuccessTracker, TrackedEntry};

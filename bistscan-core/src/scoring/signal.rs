//! Emitted signal records handed to notification and rendering layers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::{ConditionResult, LegacySignal, SymbolAggregate, Trend};
use crate::domain::Timeframe;
use crate::indicators::{MaDirection, SupportResistance};

use super::ledger::SignalKind;
use super::success::SuccessStatus;

/// Market fields shared by every signal kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub symbol: String,
    pub price: f64,
    /// Fast RSI rounded to 2 dp.
    pub rsi: Option<f64>,
    pub volume: Option<u64>,
    pub change_pct: f64,
    pub trend: Trend,
    /// Fast-timeframe direction per MA window.
    pub ma_directions: BTreeMap<usize, MaDirection>,
    /// Rolling support/resistance per available timeframe.
    pub levels: BTreeMap<Timeframe, SupportResistance>,
    pub timestamp: DateTime<FixedOffset>,
}

impl MarketContext {
    pub fn from_aggregate(aggregate: &SymbolAggregate, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            symbol: aggregate.symbol.clone(),
            price: aggregate.current_price,
            rsi: aggregate.fast_rsi().map(|r| (r * 100.0).round() / 100.0),
            volume: aggregate.volume,
            change_pct: aggregate.change_pct,
            trend: aggregate.trend,
            ma_directions: aggregate
                .fast()
                .map(|s| s.ma_directions.clone())
                .unwrap_or_default(),
            levels: aggregate
                .snapshots
                .iter()
                .map(|(&tf, s)| (tf, s.levels))
                .collect(),
            timestamp,
        }
    }
}

/// Kind-specific payload. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalPayload {
    Super {
        context: MarketContext,
        score: u8,
        bonus: bool,
        conditions: Vec<ConditionResult>,
        success: Option<SuccessStatus>,
    },
    Combo {
        context: MarketContext,
        success: Option<SuccessStatus>,
    },
    #[serde(rename = "3peak")]
    ThreePeak {
        context: MarketContext,
        success: Option<SuccessStatus>,
    },
    /// Never opens a position, but reports one already open that day.
    Legacy {
        context: MarketContext,
        signal: LegacySignal,
        success: Option<SuccessStatus>,
    },
}

impl SignalPayload {
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalPayload::Super { .. } => SignalKind::Super,
            SignalPayload::Combo { .. } => SignalKind::Combo,
            SignalPayload::ThreePeak { .. } => SignalKind::ThreePeak,
            SignalPayload::Legacy { signal, .. } => SignalKind::from(*signal),
        }
    }

    pub fn context(&self) -> &MarketContext {
        match self {
            SignalPayload::Super { context, .. }
            | SignalPayload::Combo { context, .. }
            | SignalPayload::ThreePeak { context, .. }
            | SignalPayload::Legacy { context, .. } => context,
        }
    }

    pub fn success(&self) -> Option<SuccessStatus> {
        match self {
            SignalPayload::Super { success, .. }
            | SignalPayload::Combo { success, .. }
            | SignalPayload::ThreePeak { success, .. }
            | SignalPayload::Legacy { success, .. } => *success,
        }
    }
}

/// One emitted signal: `(key, message, payload)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedSignal {
    /// `<KIND>-<SYMBOL>`, unique per scan.
    pub key: String,
    pub message: String,
    pub payload: SignalPayload,
}

impl EmittedSignal {
    pub fn new(payload: SignalPayload, message: String) -> Self {
        Self {
            key: signal_key(payload.kind(), &payload.context().symbol),
            message,
            payload,
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.payload.kind()
    }

    pub fn symbol(&self) -> &str {
        &self.payload.context().symbol
    }
}

pub fn signal_key(kind: SignalKind, symbol: &str) -> String {
    format!("{}-{symbol}", kind.code())
}

//! The five super-score predicates.
//!
//! Each predicate is a pure function of the snapshots it references and
//! returns a definite outcome. A referenced timeframe that is missing, or a
//! value it lacks, yields `Unavailable`; only `Met` scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ScanConfig;
use crate::domain::Timeframe;

use super::snapshot::IndicatorSnapshot;

/// Points each satisfied condition contributes.
pub const POINTS_PER_CONDITION: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOutcome {
    Met,
    Unmet,
    /// Required data for the condition was missing.
    Unavailable,
}

impl ConditionOutcome {
    pub fn is_met(self) -> bool {
        matches!(self, ConditionOutcome::Met)
    }

    fn from_bool(met: bool) -> Self {
        if met {
            ConditionOutcome::Met
        } else {
            ConditionOutcome::Unmet
        }
    }
}

/// Named cross-timeframe bullish-alignment conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperCondition {
    /// Fast: fresh MA20 reclaim, rising MA20, volume above its 5-bar average.
    FastMaReclaim,
    /// Medium: close above MA50, MA20 above its value three bars ago.
    MediumTrend,
    /// Slow: MA20 above MA50, MA20 above its value two bars ago.
    SlowAlignment,
    /// Daily: green candle closing above MA20.
    DailyStrength,
    /// Fast RSI inside the healthy band with no triple-top breakout.
    HealthyRsi,
}

impl SuperCondition {
    pub const ALL: [SuperCondition; 5] = [
        SuperCondition::FastMaReclaim,
        SuperCondition::MediumTrend,
        SuperCondition::SlowAlignment,
        SuperCondition::DailyStrength,
        SuperCondition::HealthyRsi,
    ];

    /// The timeframe whose snapshot the condition reads.
    pub fn timeframe(self) -> Timeframe {
        match self {
            SuperCondition::FastMaReclaim | SuperCondition::HealthyRsi => Timeframe::M15,
            SuperCondition::MediumTrend => Timeframe::H1,
            SuperCondition::SlowAlignment => Timeframe::H4,
            SuperCondition::DailyStrength => Timeframe::D1,
        }
    }

    pub fn evaluate(self, snapshot: Option<&IndicatorSnapshot>, config: &ScanConfig) -> ConditionOutcome {
        let Some(snap) = snapshot else {
            return ConditionOutcome::Unavailable;
        };
        let outcome = match self {
            SuperCondition::FastMaReclaim => fast_ma_reclaim(snap),
            SuperCondition::MediumTrend => medium_trend(snap),
            SuperCondition::SlowAlignment => slow_alignment(snap),
            SuperCondition::DailyStrength => daily_strength(snap),
            SuperCondition::HealthyRsi => healthy_rsi(snap, config.rsi_band),
        };
        outcome.unwrap_or(ConditionOutcome::Unavailable)
    }
}

impl fmt::Display for SuperCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuperCondition::FastMaReclaim => "15m MA20 reclaim + volume",
            SuperCondition::MediumTrend => "1h above MA50, MA20 rising",
            SuperCondition::SlowAlignment => "4h MA20 > MA50, rising",
            SuperCondition::DailyStrength => "1D green above MA20",
            SuperCondition::HealthyRsi => "15m RSI band, no triple top",
        };
        f.write_str(label)
    }
}

fn fast_ma_reclaim(s: &IndicatorSnapshot) -> Option<ConditionOutcome> {
    let (c0, c1, c2) = (s.close_back(0)?, s.close_back(1)?, s.close_back(2)?);
    let (m0, m1, m2) = (s.ma_back(20, 0)?, s.ma_back(20, 1)?, s.ma_back(20, 2)?);

    let crossed_last_bar = c1 <= m1 && c0 > m0;
    let crossed_bar_before = c2 <= m2 && c1 > m1 && c0 > m0;
    let rising = m0 - m2 > 0.0;
    let volume = s.volume_spike()?;

    Some(ConditionOutcome::from_bool(
        (crossed_last_bar || crossed_bar_before) && rising && volume,
    ))
}

fn medium_trend(s: &IndicatorSnapshot) -> Option<ConditionOutcome> {
    let ma50 = s.ma(50)?;
    let (m0, m3) = (s.ma_back(20, 0)?, s.ma_back(20, 3)?);
    Some(ConditionOutcome::from_bool(s.last_close > ma50 && m0 > m3))
}

fn slow_alignment(s: &IndicatorSnapshot) -> Option<ConditionOutcome> {
    let ma50 = s.ma(50)?;
    let (m0, m2) = (s.ma_back(20, 0)?, s.ma_back(20, 2)?);
    Some(ConditionOutcome::from_bool(m0 > ma50 && m0 > m2))
}

fn daily_strength(s: &IndicatorSnapshot) -> Option<ConditionOutcome> {
    let green = s.green?;
    let ma20 = s.ma(20)?;
    Some(ConditionOutcome::from_bool(green && s.last_close > ma20))
}

fn healthy_rsi(s: &IndicatorSnapshot, (lo, hi): (f64, f64)) -> Option<ConditionOutcome> {
    let rsi = s.rsi?;
    Some(ConditionOutcome::from_bool(
        (lo..=hi).contains(&rsi) && !s.three_peak_break,
    ))
}

/// Outcome of one named condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: SuperCondition,
    pub outcome: ConditionOutcome,
}

/// Weighted multi-condition score for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperScore {
    /// 0..=100 in steps of 20.
    pub score: u8,
    /// Qualifying score plus a slow or daily resistance break. Annotation only.
    pub bonus: bool,
    pub conditions: Vec<ConditionResult>,
}

impl SuperScore {
    pub fn evaluate(snapshots: &BTreeMap<Timeframe, IndicatorSnapshot>, config: &ScanConfig) -> Self {
        let conditions: Vec<ConditionResult> = SuperCondition::ALL
            .iter()
            .map(|&condition| ConditionResult {
                condition,
                outcome: condition.evaluate(snapshots.get(&condition.timeframe()), config),
            })
            .collect();

        let met = conditions.iter().filter(|c| c.outcome.is_met()).count() as u8;
        let score = met * POINTS_PER_CONDITION;

        let resistance_break = [Timeframe::H4, Timeframe::D1]
            .iter()
            .filter_map(|tf| snapshots.get(tf))
            .any(|s| s.sr_break.resistance);

        Self {
            score,
            bonus: score >= config.super_threshold && resistance_break,
            conditions,
        }
    }

    pub fn qualifies(&self, threshold: u8) -> bool {
        self.score >= threshold
    }

    pub fn outcome(&self, condition: SuperCondition) -> Option<ConditionOutcome> {
        self.conditions
            .iter()
            .find(|c| c.condition == condition)
            .map(|c| c.outcome)
    }
}

//! Per-timeframe analysis and multi-timeframe fusion.
//!
//! `snapshot` turns one timeframe's bars into an `IndicatorSnapshot`;
//! `conditions` holds the five named super-score predicates; `aggregate`
//! fuses the snapshots of one symbol into a `SymbolAggregate`.

pub mod aggregate;
pub mod conditions;
pub mod snapshot;

pub use aggregate::{aggregate, AggregateError, LegacySignal, SymbolAggregate, TimeframeBars, Trend};
pub use conditions::{ConditionOutcome, ConditionResult, SuperCondition, SuperScore};
pub use snapshot::{analyze, IndicatorSnapshot, TAIL_LEN, VOLUME_AVG_BARS};

//! Property tests for indicator bounds and ledger invariants.
//!
//! 1. RSI stays in [0, 100]; flat series read exactly 50
//! 2. Three-peak detector never fires on short or monotonic series
//! 3. Support/resistance break needs two bars
//! 4. Sent ledger emits each (symbol, kind) at most once per trading day
//! 5. Success hit is monotonic within a day
//! 6. Super score stays on the 20-point grid and bonus implies qualification

use bistscan_core::analysis::{aggregate, TimeframeBars};
use bistscan_core::domain::{Bar, Timeframe};
use bistscan_core::indicators::{rsi, support_resistance_break, three_peak_breakout, SrBreak};
use bistscan_core::scoring::{SentSignalLedger, SignalKind, SuccessStatus, SuccessTracker};
use bistscan_core::ScanConfig;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 1..max_len)
}

fn arb_kind() -> impl Strategy<Value = SignalKind> {
    prop_oneof![
        Just(SignalKind::Super),
        Just(SignalKind::Combo),
        Just(SignalKind::ThreePeak),
        Just(SignalKind::Al),
        Just(SignalKind::Sat),
    ]
}

fn arb_symbol() -> impl Strategy<Value = String> {
    prop_oneof![Just("THYAO"), Just("ASELS"), Just("GARAN"), Just("SISE")].prop_map(String::from)
}

fn to_bars(closes: &[f64]) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + Duration::minutes(15 * i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1000 + i as u64,
            }
        })
        .collect()
}

// ── 1. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(200), period in 1usize..30) {
        for value in rsi(&closes, period) {
            prop_assert!((0.0..=100.0).contains(&value), "rsi {value} out of range");
        }
    }

    #[test]
    fn flat_series_is_neutral(price in arb_price(), len in 1usize..100) {
        let closes = vec![price; len];
        for value in rsi(&closes, 14) {
            prop_assert_eq!(value, 50.0);
        }
    }
}

// ── 2. Three-peak detector ───────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_never_breaks_out(closes in prop::collection::vec(arb_price(), 0..5)) {
        prop_assert!(!three_peak_breakout(&closes));
    }

    #[test]
    fn monotonic_series_never_breaks_out(start in arb_price(), steps in prop::collection::vec(0.01..5.0_f64, 4..60)) {
        let mut closes = vec![start];
        for step in steps {
            let next = closes[closes.len() - 1] + step;
            closes.push(next);
        }
        prop_assert!(!three_peak_breakout(&closes));
    }
}

// ── 3. Support / resistance ──────────────────────────────────────────

proptest! {
    #[test]
    fn single_bar_never_breaks(price in arb_price(), lookback in 1usize..50) {
        let bars = to_bars(&[price]);
        prop_assert_eq!(support_resistance_break(&bars, lookback), SrBreak::default());
    }
}

// ── 4. Ledger dedup ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn ledger_emits_once_per_day(
        emissions in prop::collection::vec((arb_symbol(), arb_kind()), 1..60),
    ) {
        let boundary = NaiveTime::from_hms_opt(9, 50, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut ledger = SentSignalLedger::new();
        ledger.reset_if_due(day.and_time(boundary), boundary);

        let mut accepted = std::collections::HashSet::new();
        for (symbol, kind) in &emissions {
            let first = ledger.mark_sent(symbol, *kind);
            prop_assert_eq!(first, accepted.insert((symbol.clone(), *kind)));
        }

        let next = (day + Duration::days(1)).and_time(boundary);
        prop_assert!(ledger.reset_if_due(next, boundary));
        for (symbol, kind) in &accepted {
            prop_assert!(ledger.mark_sent(symbol, *kind));
        }
    }
}

// ── 5. Success monotonicity ──────────────────────────────────────────

proptest! {
    #[test]
    fn hit_never_reverts(entry in arb_price(), prices in prop::collection::vec(arb_price(), 1..40)) {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut tracker = SuccessTracker::new();
        tracker.register("THYAO", day, entry, 1.02);

        let mut seen_hit = false;
        for price in prices {
            let status = tracker.check("THYAO", day, price);
            seen_hit |= price >= entry * 1.02;
            let expected = if seen_hit { SuccessStatus::Hit } else { SuccessStatus::NotYetHit };
            prop_assert_eq!(status, Some(expected));
        }
    }
}

// ── 6. Super score shape ─────────────────────────────────────────────

proptest! {
    #[test]
    fn score_grid_and_bonus(
        fast in arb_closes(80),
        medium in arb_closes(80),
        slow in arb_closes(80),
        daily in arb_closes(80),
    ) {
        let config = ScanConfig::default();
        let bars: TimeframeBars = [
            (Timeframe::M15, to_bars(&fast)),
            (Timeframe::H1, to_bars(&medium)),
            (Timeframe::H4, to_bars(&slow)),
            (Timeframe::D1, to_bars(&daily)),
        ]
        .into_iter()
        .collect();

        let agg = aggregate("THYAO", &bars, &config).unwrap();
        let score = agg.super_score.score;
        prop_assert!(score <= 100 && score % 20 == 0);
        let met = agg.super_score.conditions.iter().filter(|c| c.outcome.is_met()).count();
        prop_assert_eq!(usize::from(score), met * 20);
        if agg.super_score.bonus {
            prop_assert!(score >= config.super_threshold);
        }
    }
}

//! Human-readable signal text.

use std::fmt::Write;

use crate::analysis::{ConditionResult, LegacySignal, Trend};
use crate::indicators::MaDirection;

use super::signal::MarketContext;
use super::success::SuccessStatus;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn ma_text(direction: Option<MaDirection>) -> &'static str {
    match direction {
        Some(MaDirection::Above) => "above",
        Some(MaDirection::Below) => "below",
        Some(MaDirection::GoldenCross) => "golden cross",
        Some(MaDirection::DeathCross) => "death cross",
        None => "flat",
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn market_block(ctx: &MarketContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Price: {:.2} | RSI: {}", ctx.price, fmt_opt(ctx.rsi));
    let volume = ctx.volume.map_or_else(|| "-".to_string(), |v| v.to_string());
    let trend = match ctx.trend {
        Trend::Up => "up",
        Trend::Down => "down",
    };
    let _ = writeln!(out, "Change: {:+.2}% | Volume: {volume} | Trend: {trend}", ctx.change_pct);

    out.push_str("\nMA status:\n");
    for (window, direction) in &ctx.ma_directions {
        let _ = writeln!(out, "  MA{window}: {}", ma_text(Some(*direction)));
    }

    out.push_str("\nSupport / resistance:\n");
    if ctx.levels.is_empty() {
        out.push_str("  no data\n");
    }
    for (tf, levels) in &ctx.levels {
        let _ = writeln!(
            out,
            "  {tf} → S: {} | R: {}",
            fmt_opt(levels.support),
            fmt_opt(levels.resistance)
        );
    }
    out
}

fn success_line(success: Option<SuccessStatus>) -> String {
    success.map_or_else(String::new, |s| format!("Target: {s}\n"))
}

fn footer(ctx: &MarketContext) -> String {
    format!("\nSignal time: {}", ctx.timestamp.format(TIMESTAMP_FORMAT))
}

pub fn super_message(
    ctx: &MarketContext,
    score: u8,
    bonus: bool,
    conditions: &[ConditionResult],
    success: Option<SuccessStatus>,
) -> String {
    let mut out = format!("{}: SUPER COMBINED SIGNAL\nScore: {score}/100", ctx.symbol);
    if bonus {
        out.push_str(" (+ resistance break)");
    }
    out.push('\n');
    out.push_str(&success_line(success));
    for c in conditions {
        let mark = if c.outcome.is_met() { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}", c.condition);
    }
    out.push('\n');
    out.push_str(&market_block(ctx));
    out.push_str(&footer(ctx));
    out
}

pub fn combo_message(ctx: &MarketContext, success: Option<SuccessStatus>) -> String {
    format!(
        "{}: combined signal (daily + intraday green)\n{}\n{}{}",
        ctx.symbol,
        success_line(success),
        market_block(ctx),
        footer(ctx)
    )
}

pub fn three_peak_message(ctx: &MarketContext, success: Option<SuccessStatus>) -> String {
    format!(
        "{}: triple-top breakout\n{}\n{}{}",
        ctx.symbol,
        success_line(success),
        market_block(ctx),
        footer(ctx)
    )
}

pub fn legacy_message(ctx: &MarketContext, signal: LegacySignal, success: Option<SuccessStatus>) -> String {
    let reason = match signal {
        LegacySignal::Al => "RSI oversold",
        LegacySignal::Sat => "RSI overbought",
    };
    format!(
        "{}: {signal} ({reason})\n{}\n{}{}",
        ctx.symbol,
        success_line(success),
        market_block(ctx),
        footer(ctx)
    )
}

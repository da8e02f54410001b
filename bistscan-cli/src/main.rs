//! bistscan CLI: scan, watch, analyze and universe commands.
//!
//! Commands:
//! - `scan`: run one scan cycle over the universe and print emitted signals
//! - `watch`: run the periodic scan loop, logging signals as they emit
//! - `analyze`: print the multi-timeframe aggregate of one symbol
//! - `universe`: list the configured symbol universe

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bistscan_core::analysis::SymbolAggregate;
use bistscan_core::data::{BarProvider, CircuitBreaker, SyntheticProvider, Universe, YahooProvider};
use bistscan_core::Scanner;
use bistscan_runner::{run_cycle, LogSink, LoopOptions, RunnerConfig, ScanLoop};

#[derive(Parser)]
#[command(name = "bistscan", about = "bistscan: multi-timeframe BIST signal scanner")]
struct Cli {
    /// Runner config TOML. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use deterministic synthetic bars instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scan cycle and print emitted signals.
    Scan {
        /// Symbols to scan instead of the configured universe.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Print the scan report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Scan every interval until stopped.
    Watch {
        /// Stop after this many cycles.
        #[arg(long)]
        cycles: Option<u64>,

        /// Symbols to scan instead of the configured universe.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Print the multi-timeframe aggregate for one symbol.
    Analyze {
        symbol: String,

        /// Print the aggregate as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the configured symbol universe.
    Universe,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RunnerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RunnerConfig::default(),
    };

    match cli.command {
        Commands::Scan { symbols, json } => cmd_scan(&config, cli.synthetic, symbols, json),
        Commands::Watch { cycles, symbols } => cmd_watch(&config, cli.synthetic, symbols, cycles),
        Commands::Analyze { symbol, json } => cmd_analyze(&config, cli.synthetic, &symbol, json),
        Commands::Universe => cmd_universe(&config),
    }
}

fn provider(synthetic: bool) -> Result<Box<dyn BarProvider>> {
    if synthetic {
        return Ok(Box::new(SyntheticProvider::new(Utc::now())));
    }
    let breaker = Arc::new(CircuitBreaker::for_scanner());
    Ok(Box::new(YahooProvider::new(breaker)?))
}

fn scanner(config: &RunnerConfig, synthetic: bool) -> Result<Scanner<Box<dyn BarProvider>>> {
    let pause = if synthetic {
        std::time::Duration::ZERO
    } else {
        config.symbol_pause()
    };
    Ok(Scanner::new(provider(synthetic)?, config.scan.clone())?.with_symbol_pause(pause))
}

fn resolve_symbols(config: &RunnerConfig, explicit: Vec<String>) -> Result<Vec<String>> {
    let universe = if explicit.is_empty() {
        config.load_universe()?
    } else {
        Universe::from_symbols(explicit)
    };
    if universe.is_empty() {
        bail!("no symbols to scan");
    }
    Ok(universe.symbols)
}

fn cmd_scan(config: &RunnerConfig, synthetic: bool, symbols: Vec<String>, json: bool) -> Result<()> {
    let symbols = resolve_symbols(config, symbols)?;
    let mut scanner = scanner(config, synthetic)?;

    if json {
        let report = scanner.run_scan(&symbols);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let report = run_cycle(&mut scanner, &symbols, &LogSink);
    println!(
        "Scanned {} symbols ({} skipped), {} signals at {}",
        report.scanned,
        report.skipped.len(),
        report.signals.len(),
        report.finished_at.format("%Y-%m-%d %H:%M:%S"),
    );
    for signal in &report.signals {
        println!("\n[{}]\n{}", signal.key, signal.message);
    }
    Ok(())
}

fn cmd_watch(
    config: &RunnerConfig,
    synthetic: bool,
    symbols: Vec<String>,
    cycles: Option<u64>,
) -> Result<()> {
    let symbols = resolve_symbols(config, symbols)?;
    let scanner = scanner(config, synthetic)?;
    let options = LoopOptions {
        interval: config.interval(),
        max_cycles: cycles,
    };
    tracing::info!(
        symbols = symbols.len(),
        interval_secs = config.interval_secs,
        provider = scanner.provider().name(),
        "watching"
    );
    let scan_loop = ScanLoop::spawn(scanner, symbols, LogSink, options)?;
    let status = scan_loop.join();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn cmd_analyze(config: &RunnerConfig, synthetic: bool, symbol: &str, json: bool) -> Result<()> {
    let scanner = scanner(config, synthetic)?;
    let aggregate = scanner.analyze_symbol(&bistscan_core::data::display_symbol(symbol))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&aggregate)?);
    } else {
        print_aggregate(&aggregate, scanner.config().super_threshold);
    }
    Ok(())
}

fn print_aggregate(agg: &SymbolAggregate, threshold: u8) {
    println!("{}  price {:.2}  change {:+.2}%  trend {:?}", agg.symbol, agg.current_price, agg.change_pct, agg.trend);
    for (tf, snap) in &agg.snapshots {
        let rsi = snap.rsi.map_or_else(|| "-".into(), |r| format!("{r:.2}"));
        let ma20 = snap.ma(20).map_or_else(|| "-".into(), |m| format!("{m:.2}"));
        println!(
            "  {tf:>3}  bars {:>4}  close {:>9.2}  RSI {rsi:>6}  MA20 {ma20:>9}  3peak {}",
            snap.bar_count, snap.last_close, snap.three_peak_break
        );
    }
    let legacy = agg.legacy_signal.map_or_else(|| "-".to_string(), |s| s.to_string());
    println!("  legacy {legacy}  combo {}  3peak {}", agg.composite_signal, agg.three_peak_break);

    let score = &agg.super_score;
    let marker = if score.qualifies(threshold) { " *" } else { "" };
    println!("  super score {}/100{marker}{}", score.score, if score.bonus { " (+R)" } else { "" });
    for c in &score.conditions {
        println!("    {:<32} {:?}", c.condition.to_string(), c.outcome);
    }
}

fn cmd_universe(config: &RunnerConfig) -> Result<()> {
    let universe = config.load_universe()?;
    for symbol in &universe.symbols {
        println!("{symbol}");
    }
    eprintln!("{} symbols", universe.len());
    Ok(())
}

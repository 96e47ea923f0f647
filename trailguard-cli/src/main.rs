//! TrailGuard CLI — replay a bar history through the stop engine.
//!
//! Commands:
//! - `replay` — load bars from CSV and a scenario from TOML, drive the
//!   engine tick by tick against a simulated position book, and report every
//!   stop mutation and close.
//!
//! The harness exists so the engine can be exercised end to end without any
//! live market connection: the CSV history stands in for the platform's bar
//! store, and the scenario file scripts when positions open.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use trailguard_core::config::StrategyConfig;
use trailguard_core::domain::{Bar, PositionId, PositionSnapshot, Quote, Side};
use trailguard_core::engine::{Engine, PositionMutator, TickView};
use trailguard_core::error::MutationError;

#[derive(Parser)]
#[command(
    name = "trailguard",
    about = "TrailGuard CLI — stop-ratchet engine replay harness"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (debug level).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV bar history against a TOML scenario.
    Replay {
        /// CSV file with time,open,high,low,close rows.
        #[arg(long)]
        bars: PathBuf,

        /// TOML scenario: strategy config, spread, and scripted positions.
        #[arg(long)]
        scenario: PathBuf,
    },
}

// ── Input files ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Scenario {
    strategy: StrategyConfig,

    /// Synthetic bid/ask spread applied around each bar close.
    #[serde(default = "default_spread")]
    spread: f64,

    #[serde(default)]
    positions: Vec<ScriptedPosition>,
}

fn default_spread() -> f64 {
    0.0002
}

#[derive(Debug, Deserialize)]
struct ScriptedPosition {
    id: u64,

    /// Bar index at which the position opens.
    entry_bar: usize,

    side: Side,

    #[serde(default)]
    stop: Option<f64>,

    #[serde(default)]
    target: Option<f64>,

    /// Entry tag handed to the engine (e.g. "first-bar-since-entry").
    #[serde(default)]
    tag: String,
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open bar file {}", path.display()))?;
    let mut bars = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let record: BarRecord =
            record.with_context(|| format!("malformed bar record at line {}", line + 2))?;
        let time = NaiveDateTime::parse_from_str(&record.time, "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("unparseable bar time {:?}", record.time))?;
        let bar = Bar {
            time,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
        };
        if !bar.is_sane() {
            bail!("insane bar at line {}: {bar:?}", line + 2);
        }
        bars.push(bar);
    }
    Ok(bars)
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse scenario {}", path.display()))
}

// ── Simulated host position book ─────────────────────────────────────

#[derive(Debug)]
struct HostPosition {
    side: Side,
    stop: Option<f64>,
    target: Option<f64>,
    tag: String,
    entry_bar: usize,
}

/// Stands in for the trading platform: owns position lifecycle, applies the
/// engine's mutations, and closes positions whose stop or target trades.
struct ReplayBook {
    symbol: String,
    positions: BTreeMap<u64, HostPosition>,
    events: Vec<String>,
}

impl ReplayBook {
    fn new(symbol: String) -> Self {
        Self {
            symbol,
            positions: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Open scripted positions whose entry bar has arrived.
    fn admit(&mut self, index: usize, scripted: &[ScriptedPosition]) {
        for position in scripted.iter().filter(|p| p.entry_bar == index) {
            self.positions.insert(
                position.id,
                HostPosition {
                    side: position.side,
                    stop: position.stop,
                    target: position.target,
                    tag: position.tag.clone(),
                    entry_bar: position.entry_bar,
                },
            );
            tracing::debug!("position #{}: opened at bar {index}", position.id);
        }
    }

    /// Close positions whose stop or target traded within this bar. Stop
    /// checks run first (conservative same-bar priority).
    fn apply_bar(&mut self, index: usize, bar: &Bar) {
        let mut done: Vec<(u64, String)> = Vec::new();
        for (&id, position) in &self.positions {
            if position.entry_bar == index {
                continue;
            }
            let stopped = match (position.side, position.stop) {
                (Side::Long, Some(stop)) => bar.low <= stop,
                (Side::Short, Some(stop)) => bar.high >= stop,
                _ => false,
            };
            if stopped {
                done.push((id, format!("position #{id}: stopped out at bar {index}")));
                continue;
            }
            let target_hit = match (position.side, position.target) {
                (Side::Long, Some(target)) => bar.high >= target,
                (Side::Short, Some(target)) => bar.low <= target,
                _ => false,
            };
            if target_hit {
                done.push((id, format!("position #{id}: target hit at bar {index}")));
            }
        }
        for (id, event) in done {
            self.positions.remove(&id);
            tracing::info!("{event}");
            self.events.push(event);
        }
    }

    fn snapshots(&self) -> Vec<PositionSnapshot> {
        self.positions
            .iter()
            .map(|(&id, position)| PositionSnapshot {
                id: PositionId(id),
                symbol: self.symbol.clone(),
                side: position.side,
                stop: position.stop,
                target: position.target,
                entry_tag: position.tag.clone(),
            })
            .collect()
    }
}

impl PositionMutator for ReplayBook {
    fn set_stop(&mut self, id: PositionId, stop: f64) -> Result<(), MutationError> {
        let position = self
            .positions
            .get_mut(&id.0)
            .ok_or(MutationError::UnknownPosition(id))?;
        position.stop = Some(stop);
        self.events.push(format!("position {id}: stop -> {stop}"));
        Ok(())
    }

    fn close(&mut self, id: PositionId) -> Result<(), MutationError> {
        self.positions
            .remove(&id.0)
            .ok_or(MutationError::UnknownPosition(id))?;
        self.events.push(format!("position {id}: closed by engine"));
        Ok(())
    }
}

// ── Replay loop ──────────────────────────────────────────────────────

fn replay(bars_path: &Path, scenario_path: &Path) -> Result<()> {
    let scenario = load_scenario(scenario_path)?;
    let bars = load_bars(bars_path)?;
    if bars.len() < 2 {
        bail!("bar history needs at least two bars, got {}", bars.len());
    }
    for position in &scenario.positions {
        if position.entry_bar >= bars.len() {
            bail!(
                "position #{} enters at bar {} but the history has only {} bars",
                position.id,
                position.entry_bar,
                bars.len()
            );
        }
    }

    let mut engine = Engine::new(scenario.strategy.clone());
    engine.start()?;
    let mut book = ReplayBook::new(scenario.strategy.symbol.clone());

    for index in 0..bars.len() {
        book.admit(index, &scenario.positions);
        book.apply_bar(index, &bars[index]);

        let close = bars[index].close;
        let quote = Quote::new(close - scenario.spread / 2.0, close + scenario.spread / 2.0);
        let snapshots = book.snapshots();
        let tick = TickView {
            bars: &bars[..=index],
            quote,
            positions: &snapshots,
        };
        engine.run_tick(&tick, &mut book)?;
    }
    engine.stop();

    println!(
        "replayed {} bars ({} {}), {} events",
        bars.len(),
        scenario.strategy.symbol,
        scenario.strategy.timeframe,
        book.events.len()
    );
    for event in &book.events {
        println!("  {event}");
    }
    for (id, position) in &book.positions {
        println!(
            "  position #{id}: still open, stop {:?}, target {:?}",
            position.stop, position.target
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Replay { bars, scenario } => replay(&bars, &scenario),
    }
}

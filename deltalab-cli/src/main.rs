//! DeltaLab CLI: replay bars through a study and print host graphics.
//!
//! Commands:
//! - `replay`: run a study over a bars CSV (plus optional profile CSV) and
//!   print one JSON line per bar
//! - `manifest`: print a study's registration manifest as JSON
//! - `session-start`: print the start of the active session

mod input;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use deltalab_core::config::{StudyConfig, StudyKind};
use deltalab_core::studies::{build_study, HostContext};
use deltalab_core::{
    current_session_start, Clock, FixedClock, SessionOpenHour, StudyEngine, SystemClock,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "deltalab",
    about = "DeltaLab CLI — volume, delta and POC chart studies"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a bars CSV through a study and print its graphics as JSON lines.
    Replay {
        /// Study kind: delta_grid, candle_delta, point_of_control.
        #[arg(long)]
        study: Option<StudyKind>,

        /// Path to a study TOML config. Its `kind` wins over --study.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bars CSV: index,timestamp,high,volume,bid_volume,offer_volume.
        #[arg(long)]
        bars: PathBuf,

        /// Volume-profile CSV: index,price,vol,bid_vol,ask_vol.
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Local wall-clock time to use instead of the system clock
        /// (YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        now: Option<NaiveDateTime>,

        /// Instrument tick size; falls back to the config's tick_size.
        #[arg(long)]
        tick_size: Option<f64>,

        /// Pretty-print each bar's JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print a study's manifest as JSON.
    Manifest {
        #[arg(long)]
        study: StudyKind,
    },
    /// Print the start of the active trading session.
    SessionStart {
        /// Local hour the session opens, 0-23.
        #[arg(long, default_value_t = 17)]
        open_hour: u32,

        /// Local wall-clock time to use instead of the system clock.
        #[arg(long)]
        now: Option<NaiveDateTime>,
    },
}

#[derive(Serialize)]
struct ReplayLine<'a> {
    index: usize,
    #[serde(flatten)]
    output: &'a deltalab_core::StudyOutput,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Replay {
            study,
            config,
            bars,
            profile,
            now,
            tick_size,
            pretty,
        } => run_replay(study, config, bars, profile, now, tick_size, pretty),
        Commands::Manifest { study } => run_manifest(study),
        Commands::SessionStart { open_hour, now } => run_session_start(open_hour, now),
    }
}

fn setup_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn clock_for(now: Option<NaiveDateTime>) -> Box<dyn Clock> {
    match now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    }
}

fn resolve_config(study: Option<StudyKind>, path: Option<PathBuf>) -> Result<StudyConfig> {
    match (path, study) {
        (Some(path), study) => {
            let config = StudyConfig::from_file(&path)?;
            if let Some(kind) = study.filter(|kind| *kind != config.kind()) {
                tracing::warn!(
                    requested = %kind,
                    configured = %config.kind(),
                    "--study ignored, config file decides the study"
                );
            }
            Ok(config)
        }
        (None, Some(kind)) => Ok(StudyConfig::default_for(kind)),
        (None, None) => anyhow::bail!("one of --study or --config is required"),
    }
}

fn run_replay(
    study: Option<StudyKind>,
    config_path: Option<PathBuf>,
    bars_path: PathBuf,
    profile_path: Option<PathBuf>,
    now: Option<NaiveDateTime>,
    tick_size: Option<f64>,
    pretty: bool,
) -> Result<()> {
    let config = resolve_config(study, config_path)?;
    let host = HostContext {
        instrument_tick_size: tick_size,
        clock: clock_for(now),
    };
    let mut engine = StudyEngine::new(build_study(config, host)?);

    let manifest = engine.manifest();
    if manifest.requirements.volume_profiles && profile_path.is_none() {
        tracing::warn!(
            study = manifest.name,
            "study needs volume profiles but no --profile was given; nothing will be drawn"
        );
    }

    let events = input::load_events(&bars_path, profile_path.as_deref())?;
    tracing::info!(bars = events.len(), study = manifest.name, "replaying");

    let outputs = engine.redraw(&events);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (event, output) in events.iter().zip(&outputs) {
        let line = ReplayLine {
            index: event.bar.index,
            output,
        };
        let json = if pretty {
            serde_json::to_string_pretty(&line)?
        } else {
            serde_json::to_string(&line)?
        };
        writeln!(out, "{json}").context("write replay output")?;
    }
    Ok(())
}

fn run_manifest(kind: StudyKind) -> Result<()> {
    let study = build_study(StudyConfig::default_for(kind), HostContext::default())?;
    println!("{}", serde_json::to_string_pretty(&study.manifest())?);
    Ok(())
}

fn run_session_start(open_hour: u32, now: Option<NaiveDateTime>) -> Result<()> {
    let open_hour = SessionOpenHour::new(open_hour)?;
    let clock = clock_for(now);
    let start = current_session_start(clock.as_ref(), open_hour);
    println!("{}", start.format("%Y-%m-%dT%H:%M:%S"));
    Ok(())
}

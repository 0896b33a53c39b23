//! signal-runner: score a market snapshot and print execution advice as JSON.
//!
//! The snapshot file holds one `{symbol, context, bars}` object or an array
//! of them. Arrays are evaluated in parallel.
//!
//! Usage:
//!   cargo run -p signal-runner -- --input demos/snapshot.json --config demos/engine.json
//!   cargo run -p signal-runner -- --input batch.json --config engine.json --stealth
//!   cargo run -p signal-runner -- --input snapshot.json --trend-strength 0.8 --position-size 5000
//!
//! `SIGNAL_ENGINE_CONFIG` names a config file when `--config` is absent.
//! Logs go to stderr; set `RUST_LOG_FORMAT=json` for JSON log lines.

use std::path::PathBuf;

use analysis_orchestrator::{EngineConfig, ExecutionPreferences, SignalEngine, SymbolSnapshot};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotInput {
    Batch(Vec<SymbolSnapshot>),
    Single(SymbolSnapshot),
}

#[derive(Debug)]
struct RunnerArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    preferences: ExecutionPreferences,
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

impl RunnerArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let Some(input) = flag_value(args, "--input") else {
            bail!("--input <snapshot.json> is required");
        };

        let trend_strength = match flag_value(args, "--trend-strength") {
            Some(raw) => {
                let value: f64 = raw
                    .parse()
                    .with_context(|| format!("invalid --trend-strength: {raw}"))?;
                if !(0.0..=1.0).contains(&value) {
                    bail!("--trend-strength must be between 0 and 1, got {value}");
                }
                Some(value)
            }
            None => None,
        };

        let position_size = flag_value(args, "--position-size")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("invalid --position-size: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            input: PathBuf::from(input),
            config: flag_value(args, "--config").map(PathBuf::from),
            preferences: ExecutionPreferences {
                trend_strength,
                stealth_required: args.iter().any(|a| a == "--stealth"),
                position_size,
            },
        })
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(explicit: Option<&PathBuf>) -> Result<EngineConfig> {
    let path = explicit
        .cloned()
        .or_else(|| std::env::var("SIGNAL_ENGINE_CONFIG").ok().map(PathBuf::from));

    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading engine config");
            EngineConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let args = RunnerArgs::parse(&args)?;

    let config = load_config(args.config.as_ref())?;
    let engine = SignalEngine::new(config).context("invalid engine config")?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input: SnapshotInput = serde_json::from_str(&raw)
        .with_context(|| format!("malformed snapshot in {}", args.input.display()))?;

    let output = match input {
        SnapshotInput::Single(snapshot) => {
            serde_json::to_string_pretty(&engine.run(&snapshot, &args.preferences))?
        }
        SnapshotInput::Batch(snapshots) => {
            serde_json::to_string_pretty(&engine.evaluate_batch(&snapshots, &args.preferences))?
        }
    };

    println!("{output}");
    Ok(())
}

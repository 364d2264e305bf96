//! # Geowalk
//!
//! Command-line entry point: replays input scripts against levels and prints
//! a JSON report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geowalk_engine::{EngineConfig, InputScript, Simulation, CONFIG_FILE};
use geowalk_gameplay::LevelDefinition;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default tracing directive.
const DEFAULT_LOG_FILTER: &str = "geowalk=info";

/// Geowalk - walk a sprite over a map, headlessly
#[derive(Parser)]
#[command(name = "geowalk")]
#[command(about = "Replay scripted input against Geowalk levels", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an input script and print the run summary as JSON
    Run {
        /// Engine config file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Level file (default: built-in demo level)
        #[arg(short, long)]
        level: Option<PathBuf>,

        /// Input script file
        #[arg(short, long)]
        script: PathBuf,
    },

    /// Print the built-in demo level as RON
    DemoLevel,

    /// Write the default engine config
    InitConfig {
        /// Destination file
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            level,
            script,
        } => run(&config, level.as_deref(), &script),
        Commands::DemoLevel => {
            init_tracing(&EngineConfig::default())?;
            let text = LevelDefinition::demo()
                .to_ron()
                .context("failed to serialize demo level")?;
            println!("{text}");
            Ok(())
        },
        Commands::InitConfig { path } => {
            init_tracing(&EngineConfig::default())?;
            EngineConfig::default()
                .save_to(&path)
                .with_context(|| format!("failed to write {}", path.display()))
        },
    }
}

/// Installs the tracing subscriber. `RUST_LOG` wins over the config filter.
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing(config: &EngineConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
            .context("invalid log filter")?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
    Ok(())
}

fn run(config_path: &Path, level_path: Option<&Path>, script_path: &Path) -> Result<()> {
    let read = EngineConfig::read(config_path);
    match &read {
        Ok(config) => init_tracing(config)?,
        Err(_) => init_tracing(&EngineConfig::default())?,
    }
    let config = EngineConfig::or_defaults(config_path, read);

    info!("Geowalk {}", env!("CARGO_PKG_VERSION"));

    let level = match level_path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read level {}", path.display()))?;
            LevelDefinition::from_ron(&source)
                .with_context(|| format!("failed to load level {}", path.display()))?
        },
        None => LevelDefinition::demo(),
    };

    let source = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let script = InputScript::from_ron(&source)
        .with_context(|| format!("failed to load script {}", script_path.display()))?;

    let mut simulation =
        Simulation::new(&config, &level).context("level has an invalid player config")?;
    let report = simulation.run(&script);

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize report")?
    );
    Ok(())
}

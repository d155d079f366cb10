//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatsim_core::config;
use chatsim_core::core::interrupt;
use chatsim_core::core::sequencer::StartBehavior;
use clap::Parser;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "chatsim")]
#[command(version)]
#[command(about = "Plays scripted chat conversations in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play a conversation
    Run {
        /// Content file (.json or .toml)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print messages to stdout instead of opening the player
        #[arg(long)]
        plain: bool,

        /// Reveal everything without waiting (plain mode)
        #[arg(long, requires = "plain")]
        instant: bool,

        /// Playback speed multiplier (plain mode)
        #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
        speed: f64,

        /// Override the content's start behavior
        #[arg(long, value_enum)]
        start: Option<StartArg>,
    },
    /// Validate a content file and print its estimated timeline
    Check {
        /// Content file (.json or .toml)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StartArg {
    Auto,
    Manually,
}

impl From<StartArg> for StartBehavior {
    fn from(arg: StartArg) -> Self {
        match arg {
            StartArg::Auto => StartBehavior::Auto,
            StartArg::Manually => StartBehavior::Manually,
        }
    }
}

/// Slowest accepted playback speed.
const MIN_SPEED: f64 = 0.01;

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .parse()
        .map_err(|e| format!("invalid speed '{value}': {e}"))?;
    if speed.is_finite() && speed >= MIN_SPEED {
        Ok(speed)
    } else {
        Err(format!(
            "speed must be a positive number of at least {MIN_SPEED}, got '{value}'"
        ))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            file,
            plain,
            instant,
            speed,
            start,
        } => {
            let config = config::Config::load().context("load config")?;
            let _log_guard = logging::init(&config)?;
            commands::run::run(
                commands::run::RunOptions {
                    file: &file,
                    plain,
                    instant,
                    speed,
                    start: start.map(StartBehavior::from),
                },
                &config,
            )
            .await
        }

        Commands::Check { file, json } => {
            let config = config::Config::load().context("load config")?;
            commands::check::run(&file, &config, json)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

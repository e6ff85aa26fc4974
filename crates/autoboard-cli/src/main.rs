use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoboard_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "autoboard")]
#[command(author, version, about = "A terminal leaderboard with auto-scrolling panels")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Leaderboard endpoint (overrides `source.api_url`)
    #[arg(short = 'u', long = "url", global = true)]
    url: Option<String>,

    /// Path to the config file
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Fetch the leaderboard once and print it
    Fetch,
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        // The TUI owns the terminal, so logs go to a file
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // init-config must not fail on a broken existing file
    if let Some(Commands::InitConfig { force }) = cli.command {
        let path = cli.config.unwrap_or_else(AppConfig::config_path);
        return commands::init_config::run(&path, force);
    }

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(url) = cli.url {
        config.source.api_url = url;
    }

    let is_tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, is_tui)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Fetch) => commands::fetch::run(&config).await,
        Some(Commands::InitConfig { .. }) => Ok(()),
    }
}

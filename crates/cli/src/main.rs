mod cmd;
mod metrics;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_core::{load_config, validate_config, Config};

use cmd::Cli;

/// Config file used when neither `--config` nor `TRIAGE_CONFIG` is set.
const DEFAULT_CONFIG_PATH: &str = "triage.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("TRIAGE_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load(&config_path)?;
    init_logging(config.logging.json);
    info!(path = %config_path.display(), "Configuration loaded");

    let command = cli.command.name();
    let result = cli.command.run(&config).await;
    metrics::record_command(command, result.is_ok());

    if cli.print_metrics {
        print!("{}", metrics::encode_metrics()?);
    }
    result
}

fn load(path: &Path) -> Result<Config> {
    let config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let (plain, json) = if json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

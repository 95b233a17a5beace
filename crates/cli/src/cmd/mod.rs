//! Command line surface.

mod assignment;
mod preferences;
mod search;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use triage_core::{
    AssignmentMode, Config, FilePreferenceStore, HelpdeskClient, SanitizedConfig, SearchMode,
    Theme,
};

#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Helpdesk ticket triage client")]
pub struct Cli {
    /// Config file (default: $TRIAGE_CONFIG, then triage.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Print Prometheus metrics after the command finishes
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the loaded configuration with secrets redacted
    Config,

    /// Search tickets
    Search {
        /// Text to search for
        text: String,
        /// Search mode; also becomes the saved mode
        #[arg(long, short = 'm')]
        mode: Option<SearchMode>,
    },

    /// Get an assignment recommendation for one ticket
    Advise {
        /// Ticket id, e.g. IN12345
        ticket_id: String,
    },

    /// Stream and list the tickets awaiting assignment validation
    Validation,

    /// Load validation tickets and fetch a recommendation for each
    Recommend {
        /// Recommendations fetched in parallel (default: batch.concurrency_limit)
        #[arg(long, short = 'j')]
        concurrency: Option<usize>,
    },

    /// Show or set search and assignment modes
    Mode {
        #[command(subcommand)]
        target: Option<ModeTarget>,
    },

    /// Show or set the theme
    Theme { theme: Option<Theme> },
}

#[derive(Subcommand, Debug)]
pub enum ModeTarget {
    /// Active search mode
    Search { mode: Option<SearchMode> },
    /// Single or multiple ticket assignment
    Assignment { mode: Option<AssignmentMode> },
}

impl Command {
    /// Name used in metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Config => "config",
            Command::Search { .. } => "search",
            Command::Advise { .. } => "advise",
            Command::Validation => "validation",
            Command::Recommend { .. } => "recommend",
            Command::Mode { .. } => "mode",
            Command::Theme { .. } => "theme",
        }
    }

    pub async fn run(self, config: &Config) -> Result<()> {
        match self {
            Command::Config => {
                let sanitized = SanitizedConfig::from(config);
                println!("{}", serde_json::to_string_pretty(&sanitized)?);
                Ok(())
            }
            Command::Search { text, mode } => search::search(config, &text, mode).await,
            Command::Advise { ticket_id } => search::advise(config, &ticket_id).await,
            Command::Validation => assignment::validation(config).await,
            Command::Recommend { concurrency } => {
                assignment::recommend(config, concurrency).await
            }
            Command::Mode { target } => preferences::mode(config, target),
            Command::Theme { theme } => preferences::theme(config, theme),
        }
    }
}

fn client(config: &Config) -> Result<HelpdeskClient> {
    HelpdeskClient::new(&config.backend).context("Failed to create helpdesk client")
}

fn open_preferences(config: &Config) -> Result<FilePreferenceStore> {
    FilePreferenceStore::open(&config.preferences.path).with_context(|| {
        format!(
            "Failed to open preferences at {:?}",
            config.preferences.path
        )
    })
}

//! Command line interface for the `literafy` literature-review generator.
//!
//! # Usage
//!
//! ```bash
//! # Write the default configuration to ~/.literafy/config.toml
//! literafy init
//!
//! # Preview what the search provider returns for a topic
//! literafy search "graph neural networks for drug discovery" --limit 5
//!
//! # Produce literature_review_graph_neural_networks.pdf in the current directory
//! literafy review "graph neural networks"
//! ```
//!
//! API keys are read from the configuration file or, when missing there, from the
//! `SERPAPI_API_KEY` and `MISTRAL_API_KEY` environment variables. Use `-v` flags for
//! more logging detail.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use literafy::{
  config::{Config, DEFAULT_CONFIG, MISTRAL_KEY_VAR, SERPAPI_KEY_VAR},
  record::PaperRecord,
  scholar::SearchQuery,
  Literafy,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(
  author,
  version,
  about = "Turn a research topic into a summarized, cited literature review"
)]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. Defaults to `~/.literafy/config.toml`.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Loads the configuration at `path`, falling back to defaults when there is none yet.
///
/// Environment keys fill in any credential the file leaves out.
fn load_config(path: &Path) -> Result<Config> {
  let config = if path.exists() {
    Config::load(path)?
  } else {
    warn!(
      "No configuration at {}, using defaults. Run `literafy init` to create one.",
      path.display()
    );
    Config::default()
  };
  Ok(config.with_env_overrides())
}

/// Entry point for the `literafy` CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Failures are printed
/// once, styled, before the process exits with a non-zero status.
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let interaction = Terminal::new(cli.accept_defaults);
  match run(&cli, &interaction).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      // Nowhere left to report a failed print
      let _ = interaction.reply(ResponseContent::Error(&e));
      ExitCode::FAILURE
    },
  }
}

/// Dispatches the parsed command.
async fn run<I: UserInteraction>(cli: &Cli, interaction: &I) -> Result<()> {
  let config_path = match &cli.config {
    Some(path) => path.clone(),
    None => Config::default_path()?,
  };

  match cli.command.clone() {
    Commands::Init => init(interaction, &config_path).await,
    Commands::Search(options) => search(interaction, load_config(&config_path)?, options).await,
    Commands::Review(options) => review(interaction, load_config(&config_path)?, options).await,
  }
}

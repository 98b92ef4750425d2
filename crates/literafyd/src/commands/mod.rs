//! Subcommands of the CLI.

use super::*;

pub mod init;
pub mod review;
pub mod search;

pub use init::init;
pub use review::{review, ReviewOptions};
pub use search::{search, SearchOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write the default configuration file
  Init,

  /// Search for papers on a topic without generating anything
  Search(SearchOptions),

  /// Generate a literature review PDF for a topic
  Review(ReviewOptions),
}

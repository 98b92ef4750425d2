//! Error type for the `literafy` binary.

use literafy::error::LiterafyError;
use thiserror::Error;

/// Result alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, LiterafydError>;

/// Everything a command can fail with.
#[derive(Error, Debug)]
pub enum LiterafydError {
  /// The review pipeline failed.
  #[error(transparent)]
  Literafy(#[from] LiterafyError),

  /// Reading or writing a local file failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A terminal prompt could not be shown or answered.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),
}

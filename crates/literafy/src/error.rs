//! Error types for the literafy library.
//!
//! A single [`LiterafyError`] covers every failure the review pipeline can surface:
//! - Search provider outages and malformed search payloads
//! - Per-paper generation failures, tagged with the paper index and stage
//! - Rendering failures while producing the final document
//! - Configuration, filesystem and transport errors
//!
//! # Examples
//!
//! ```no_run
//! use literafy::{error::LiterafyError, review::Stage, Literafy};
//!
//! # async fn example(literafy: Literafy) {
//! match literafy.review("graph neural networks").await {
//!   Ok(artifact) => println!("{} bytes", artifact.bytes.len()),
//!   Err(LiterafyError::RemoteGeneration { index, stage: Stage::Citation, .. }) =>
//!     println!("citation for paper [{index}] failed"),
//!   Err(e) => println!("review failed: {e}"),
//! }
//! # }
//! ```

use thiserror::Error;

use crate::review::Stage;

/// Error type alias used for the [`literafy`](crate) crate.
pub type Result<T> = core::result::Result<T, LiterafyError>;

/// Errors that can occur while producing a literature review.
#[derive(Error, Debug)]
pub enum LiterafyError {
  /// The topic was empty or only whitespace.
  #[error("Research topic must not be empty")]
  InvalidTopic,

  /// The search provider failed or answered with data we could not parse.
  ///
  /// The pipeline downgrades this to an empty result set unless
  /// `review.fail_on_empty` is set.
  #[error("Search provider unavailable: {0}")]
  SearchUnavailable(String),

  /// A language model call failed or produced an empty answer for one paper.
  ///
  /// Aborts the whole review; no partial document is ever produced.
  #[error("{stage} generation failed for paper [{index}]: {reason}")]
  RemoteGeneration {
    /// 1-based position of the paper in the search results
    index:  usize,
    /// Which enrichment step failed
    stage:  Stage,
    /// Underlying failure description
    reason: String,
  },

  /// Laying out or serializing the final document failed.
  #[error("Failed to render document: {0}")]
  Render(String),

  /// A network request failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A remote API answered with an error status.
  #[error("API error: {0}")]
  ApiError(String),

  /// PDF object construction or serialization errors from lopdf.
  #[error(transparent)]
  Lopdf(#[from] lopdf::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// JSON (de)serialization failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration is incomplete or inconsistent.
  #[error("{0}")]
  Config(String),

  /// A model was not specified for the LLM request.
  #[error("No model was chosen for the LLM.")]
  LLMMissingModel,

  /// No messages were supplied in the LLM request.
  #[error("No messages were supplied to send to the LLM.")]
  LLMMissingMessage,
}

impl LiterafyError {
  /// Wraps any error raised while enriching one paper into a
  /// [`LiterafyError::RemoteGeneration`] tagged with that paper's index and stage.
  ///
  /// Errors that are already tagged pass through untouched.
  pub fn generation(index: usize, stage: Stage, error: impl Into<LiterafyError>) -> Self {
    match error.into() {
      tagged @ LiterafyError::RemoteGeneration { .. } => tagged,
      other => LiterafyError::RemoteGeneration { index, stage, reason: other.to_string() },
    }
  }
}

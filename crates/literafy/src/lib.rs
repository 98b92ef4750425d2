//! Literature-review generation from a single research topic.
//!
//! `literafy` turns a free-text topic into a formatted review document:
//!
//! - Candidate papers come from a scholarly search provider (SerpAPI Google Scholar)
//! - A language model summarizes each paper, cites it inline and scores its relevance
//! - The model formats one bibliographic citation per paper
//! - Everything is assembled, in search-result order, into a paginated PDF with a
//!   bibliography and a link list
//!
//! # Getting Started
//!
//! ```no_run
//! use literafy::{config::Config, Literafy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path()?)?.with_env_overrides();
//!   let literafy = Literafy::from_config(config)?;
//!
//!   let artifact = literafy.review("microplastics in freshwater ecosystems").await?;
//!   std::fs::write("review.pdf", &artifact.bytes)?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`scholar`]: search query, raw search hits, SerpAPI client
//! - [`record`]: normalization of raw hits into [`record::PaperRecord`]s
//! - [`llm`]: language model client and the [`llm::Generate`] seam
//! - [`summary`] / [`citation`]: per-paper prompts and generation
//! - [`review`]: concurrent, index-ordered enrichment and the review model
//! - [`document`]: block tree of the final document and the [`document::Renderer`] seam
//! - [`pdf`]: PDF renderer
//! - [`config`]: configuration
//! - [`error`]: error type
//!
//! # Failure policy
//!
//! A search outage degrades to an empty review. Any failed summary or citation aborts the
//! whole request; a document is never produced with papers missing.

#![warn(missing_docs)]

use std::{
  fmt::Display,
  path::{Path, PathBuf},
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod citation;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod pdf;
pub mod record;
pub mod review;
pub mod scholar;
pub mod summary;

use crate::{
  config::*,
  document::*,
  error::*,
  llm::Generate,
  record::PaperRecord,
  review::{ReviewAssembler, ReviewDocument, Stage},
  scholar::*,
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use literafy::prelude::*;
///
/// async fn example(literafy: &Literafy) -> Result<(), LiterafyError> {
///   let review = literafy.compose("soil carbon sequestration").await?;
///   println!("{} papers", review.len());
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    document::Renderer, error::LiterafyError, llm::Generate, scholar::SearchProvider, Literafy,
  };
}

/// The review pipeline, with its configuration and collaborators.
///
/// Holds no per-request state; one instance can serve any number of topics.
pub struct Literafy {
  /// Read-only configuration
  pub config:    Config,
  /// Scholarly search provider
  pub search:    Box<dyn SearchProvider>,
  /// Language model used for summaries and citations
  pub generator: Box<dyn Generate>,
  /// Document renderer
  pub renderer:  Box<dyn Renderer>,
}

/// Builder for [`Literafy`], letting callers replace any collaborator.
#[derive(Default)]
pub struct LiterafyBuilder {
  /// Configuration, defaults to [`Config::default`]
  config:    Option<Config>,
  /// Search provider, defaults to [`SerpApiScholar`]
  search:    Option<Box<dyn SearchProvider>>,
  /// Generator, defaults to [`llm::LlmClient`]
  generator: Option<Box<dyn Generate>>,
  /// Renderer, defaults to [`pdf::PdfRenderer`]
  renderer:  Option<Box<dyn Renderer>>,
}

impl LiterafyBuilder {
  /// Uses `config` for this instance.
  pub fn with_config(mut self, config: Config) -> Self {
    self.config = Some(config);
    self
  }

  /// Uses a custom search provider.
  pub fn with_search(mut self, search: impl SearchProvider + 'static) -> Self {
    self.search = Some(Box::new(search));
    self
  }

  /// Uses a custom generator.
  pub fn with_generator(mut self, generator: impl Generate + 'static) -> Self {
    self.generator = Some(Box::new(generator));
    self
  }

  /// Uses a custom renderer.
  pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
    self.renderer = Some(Box::new(renderer));
    self
  }

  /// Builds the pipeline, creating default collaborators from the configuration.
  ///
  /// # Errors
  ///
  /// Fails if a default collaborator cannot be created from the configuration, e.g. an
  /// invalid endpoint URL.
  pub fn build(self) -> Result<Literafy> {
    let config = self.config.unwrap_or_default();
    let search = match self.search {
      Some(search) => search,
      None => Box::new(SerpApiScholar::new(&config.search)?),
    };
    let generator = match self.generator {
      Some(generator) => generator,
      None => Box::new(llm::LlmClient::new(&config.llm)?),
    };
    let renderer = self.renderer.unwrap_or_else(|| Box::new(pdf::PdfRenderer::default()));
    Ok(Literafy { config, search, generator, renderer })
  }
}

impl Literafy {
  /// Starts building a pipeline.
  pub fn builder() -> LiterafyBuilder { LiterafyBuilder::default() }

  /// Builds a pipeline with the default collaborators for `config`.
  pub fn from_config(config: Config) -> Result<Self> { Self::builder().with_config(config).build() }

  /// Searches for `topic` and normalizes the hits, without any enrichment.
  pub async fn search(&self, topic: &str) -> Result<Vec<PaperRecord>> {
    let query = SearchQuery::new(topic)?;
    let results = self.search.search(&query, self.config.search.result_limit).await?;
    Ok(results.iter().map(PaperRecord::normalize).collect())
  }

  /// Runs search and enrichment, returning the review model.
  ///
  /// # Errors
  ///
  /// - [`LiterafyError::InvalidTopic`] for a blank topic
  /// - [`LiterafyError::SearchUnavailable`] only when `review.fail_on_empty` is set
  /// - [`LiterafyError::RemoteGeneration`] if any paper's summary or citation fails
  pub async fn compose(&self, topic: &str) -> Result<ReviewDocument> {
    let query = SearchQuery::new(topic)?;
    info!("Composing literature review for \"{query}\"");

    let results = match self.search.search(&query, self.config.search.result_limit).await {
      Ok(results) => results,
      Err(LiterafyError::SearchUnavailable(reason)) => {
        warn!("Search unavailable, continuing with no results: {reason}");
        Vec::new()
      },
      Err(e) => return Err(e),
    };
    info!("Search returned {} papers", results.len());

    if results.is_empty() && self.config.review.fail_on_empty {
      return Err(LiterafyError::SearchUnavailable(format!("no papers found for \"{query}\"")));
    }

    let papers = ReviewAssembler::new(self.generator.as_ref(), &query)
      .with_concurrency(self.config.review.concurrency)
      .assemble(&results)
      .await?;

    Ok(ReviewDocument::new(&query, Local::now(), &papers))
  }

  /// Runs the whole pipeline and renders the review.
  pub async fn review(&self, topic: &str) -> Result<Artifact> {
    let review = self.compose(topic).await?;
    let document = DocumentBuilder::new(&self.config.document).build(&review);
    let artifact = document.render(self.renderer.as_ref())?;
    info!("Rendered review of {} papers ({} bytes)", review.len(), artifact.bytes.len());
    Ok(artifact)
  }
}

//! Review assembly: enriching every search hit and collecting the results in order.
//!
//! Each paper is enriched independently (summary, then citation), so papers are processed
//! concurrently up to a configured bound. Results are always joined back by their 1-based
//! index, never by completion time, and any single failure aborts the whole review.
//!
//! # Examples
//!
//! ```no_run
//! use literafy::{
//!   llm::Generate,
//!   review::{ReviewAssembler, ReviewDocument},
//!   scholar::{RawResult, SearchQuery},
//! };
//!
//! # async fn example(
//! #   generator: &dyn Generate,
//! #   results: Vec<RawResult>,
//! # ) -> literafy::error::Result<()> {
//! let topic = SearchQuery::new("federated learning")?;
//! let papers =
//!   ReviewAssembler::new(generator, &topic).with_concurrency(8).assemble(&results).await?;
//! let review = ReviewDocument::new(&topic, chrono::Local::now(), &papers);
//! println!("{}", review.review_text());
//! # Ok(())
//! # }
//! ```

use futures::{stream, StreamExt, TryStreamExt};

use super::*;

/// Separator placed between summary paragraphs in the concatenated review text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n\n";

/// The enrichment step a generation call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  /// Writing the summary paragraph
  Summary,
  /// Writing the bibliographic citation
  Citation,
}

impl Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Stage::Summary => write!(f, "summary"),
      Stage::Citation => write!(f, "citation"),
    }
  }
}

/// One paper after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPaper {
  /// 1-based position in the search results; the join key across all derived lists
  pub index:    usize,
  /// Normalized search hit
  pub record:   PaperRecord,
  /// Summary paragraph as written by the model
  pub summary:  String,
  /// Single-line citation as written by the model
  pub citation: String,
}

impl EnrichedPaper {
  /// Relevance score the model reported, if one can be found.
  pub fn relevance_score(&self) -> Option<f32> { summary::relevance_score(&self.summary) }

  /// Whether the summary cites this paper by its `[index]` marker.
  pub fn has_marker(&self) -> bool { summary::has_marker(&self.summary, self.index) }
}

/// Drives enrichment over a full, ordered result set.
pub struct ReviewAssembler<'a> {
  /// Model used for summaries and citations
  generator:   &'a dyn Generate,
  /// Topic every paper is scored against
  topic:       &'a SearchQuery,
  /// Papers enriched at the same time
  concurrency: usize,
}

impl<'a> ReviewAssembler<'a> {
  /// Creates an assembler that enriches one paper at a time.
  pub fn new(generator: &'a dyn Generate, topic: &'a SearchQuery) -> Self {
    Self { generator, topic, concurrency: 1 }
  }

  /// Sets how many papers may be enriched concurrently. Zero is treated as one.
  pub fn with_concurrency(mut self, concurrency: usize) -> Self {
    self.concurrency = concurrency.max(1);
    self
  }

  /// Normalizes, summarizes and cites the paper at `index`.
  pub async fn enrich(&self, index: usize, raw: &RawResult) -> Result<EnrichedPaper> {
    let record = PaperRecord::normalize(raw);
    let summary = summary::summarize(self.generator, self.topic, &record, index).await?;
    let citation = citation::synthesize_citation(self.generator, &record, index).await?;
    trace!("Enriched paper [{index}]");
    Ok(EnrichedPaper { index, record, summary, citation })
  }

  /// Enriches every result, returning papers in result order with indices `1..=N`.
  ///
  /// # Errors
  ///
  /// The first failure in index order aborts the review; in-flight work for other papers
  /// is dropped and no partial list is returned.
  pub async fn assemble(&self, results: &[RawResult]) -> Result<Vec<EnrichedPaper>> {
    info!("Enriching {} papers ({} at a time)", results.len(), self.concurrency);
    stream::iter(results.iter().enumerate())
      .map(|(position, raw)| self.enrich(position + 1, raw))
      .buffered(self.concurrency)
      .try_collect()
      .await
  }
}

/// Everything the document builder needs, in final order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDocument {
  /// Document title derived from the topic
  pub title:           String,
  /// The topic itself
  pub topic:           String,
  /// When the review was assembled
  pub generated_at:    DateTime<Local>,
  /// `"{index}. {summary}"` per paper, in index order
  pub body_paragraphs: Vec<String>,
  /// `(index, citation)` per paper, in index order
  pub citations:       Vec<(usize, String)>,
  /// `(index, link)` per paper, in index order; the link may be empty
  pub links:           Vec<(usize, String)>,
}

impl ReviewDocument {
  /// Collects enriched papers into a document, sorted by index.
  pub fn new(topic: &SearchQuery, generated_at: DateTime<Local>, papers: &[EnrichedPaper]) -> Self {
    let mut papers: Vec<&EnrichedPaper> = papers.iter().collect();
    papers.sort_by_key(|paper| paper.index);

    Self {
      title: format!("Literature Review: {topic}"),
      topic: topic.to_string(),
      generated_at,
      body_paragraphs: papers.iter().map(|p| format!("{}. {}", p.index, p.summary)).collect(),
      citations: papers.iter().map(|p| (p.index, p.citation.clone())).collect(),
      links: papers.iter().map(|p| (p.index, p.record.link.clone())).collect(),
    }
  }

  /// Number of papers in the review.
  pub fn len(&self) -> usize { self.body_paragraphs.len() }

  /// Whether the review covers no papers at all.
  pub fn is_empty(&self) -> bool { self.body_paragraphs.is_empty() }

  /// The body as one string, paragraphs separated by [`PARAGRAPH_SEPARATOR`].
  pub fn review_text(&self) -> String {
    self.body_paragraphs.iter().map(|p| format!("{p}{PARAGRAPH_SEPARATOR}")).collect()
  }
}

//! Normalized view of a search hit.

use super::*;

/// Title used when the provider did not send one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Abstract used when the provider did not send a snippet.
pub const NO_ABSTRACT: &str = "No abstract available";

/// A search hit with every field populated.
///
/// Derived once from a [`RawResult`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
  /// Paper title, or [`UNKNOWN_TITLE`]
  pub title:         String,
  /// Snippet standing in for the abstract, or [`NO_ABSTRACT`]
  pub abstract_text: String,
  /// Landing page, or the empty string
  pub link:          String,
  /// Provider's one-line publication summary, or the empty string
  pub summary_info:  String,
}

impl PaperRecord {
  /// Normalizes a raw search hit. Never fails: absent fields take their defaults.
  ///
  /// # Examples
  ///
  /// ```
  /// use literafy::{record::PaperRecord, scholar::RawResult};
  ///
  /// let record = PaperRecord::normalize(&RawResult::default());
  /// assert_eq!(record.title, "Unknown Title");
  /// assert_eq!(record.abstract_text, "No abstract available");
  /// assert_eq!(record.link, "");
  /// ```
  pub fn normalize(raw: &RawResult) -> Self {
    Self {
      title:         raw.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
      abstract_text: raw.snippet.clone().unwrap_or_else(|| NO_ABSTRACT.to_string()),
      link:          raw.link.clone().unwrap_or_default(),
      summary_info:  raw
        .publication_info
        .as_ref()
        .and_then(|info| info.summary.clone())
        .unwrap_or_default(),
    }
  }
}

impl From<&RawResult> for PaperRecord {
  fn from(raw: &RawResult) -> Self { Self::normalize(raw) }
}

impl From<&PaperRecord> for RawResult {
  fn from(record: &PaperRecord) -> Self {
    RawResult {
      title:            Some(record.title.clone()),
      snippet:          Some(record.abstract_text.clone()),
      link:             Some(record.link.clone()),
      publication_info: Some(PublicationInfo { summary: Some(record.summary_info.clone()) }),
    }
  }
}

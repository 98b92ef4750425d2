//! Per-paper summaries written by the language model.
//!
//! The prompt asks the model to cite the paper inline as `[index]` and to finish with a
//! 0–10 relevance score for the research topic. Both are requests, not guarantees: the
//! text is accepted as returned, and a missing marker or score is only logged.

use super::*;

lazy_static! {
  /// Matches scores such as `8/10`, `7.5 / 10` or `9 out of 10`.
  static ref SCORE: Regex =
    Regex::new(r"(?i)\b(10|\d(?:\.\d+)?)\s*(?:/|out of)\s*10\b").expect("valid score regex");
}

/// Prompt asking for a one-paragraph summary of the paper at `index`.
pub fn summary_prompt(topic: &SearchQuery, record: &PaperRecord, index: usize) -> String {
  format!(
    "Summarize the following research paper:
Title: {title}
Abstract: {abstract_text}

Provide a comprehensive summary that includes the following elements. Do not include anything \
     which is not in the abstract; everything must come from the abstract only:
1. Introduce the paper with its title.
2. Briefly describe the main focus or problem addressed in the research.
3. Outline the key methods or approaches used.
4. Summarize the main findings or conclusions.
5. If applicable, mention any significant implications or applications of the research.

In the end justify whether this research aligns with the research topic \"{topic}\" and give a \
     relevance score out of 10.

Your summary should be a single cohesive paragraph that flows naturally and avoids simply \
     restating the abstract.
Include the citation number [{index}] at appropriate places within the text, not just at the end.",
    title = record.title,
    abstract_text = record.abstract_text,
  )
}

/// Asks the model for the summary paragraph of the paper at `index`.
///
/// # Errors
///
/// Returns [`LiterafyError::RemoteGeneration`] tagged with `index` and [`Stage::Summary`]
/// if the call fails or the answer is blank.
pub async fn summarize(
  generator: &dyn Generate,
  topic: &SearchQuery,
  record: &PaperRecord,
  index: usize,
) -> Result<String> {
  debug!("Requesting summary for [{index}] {}", record.title);
  let summary = generator
    .generate(&summary_prompt(topic, record, index))
    .await
    .map_err(|e| LiterafyError::generation(index, Stage::Summary, e))?;

  let summary = summary.trim();
  if summary.is_empty() {
    return Err(LiterafyError::RemoteGeneration {
      index,
      stage: Stage::Summary,
      reason: "model returned an empty summary".to_string(),
    });
  }

  if !has_marker(summary, index) {
    warn!("Summary for paper [{index}] does not cite it as [{index}]");
  }
  if relevance_score(summary).is_none() {
    debug!("Summary for paper [{index}] carries no recognizable relevance score");
  }
  Ok(summary.to_string())
}

/// Whether `text` contains the in-text marker `[index]`.
pub fn has_marker(text: &str, index: usize) -> bool { text.contains(&format!("[{index}]")) }

/// The last `n/10` style score in `text`, if any.
///
/// # Examples
///
/// ```
/// use literafy::summary::relevance_score;
///
/// assert_eq!(relevance_score("... I would rate its relevance 8/10."), Some(8.0));
/// assert_eq!(relevance_score("Score: 7.5 out of 10"), Some(7.5));
/// assert_eq!(relevance_score("no score here"), None);
/// ```
pub fn relevance_score(text: &str) -> Option<f32> {
  SCORE
    .captures_iter(text)
    .last()
    .and_then(|captures| captures.get(1))
    .and_then(|score| score.as_str().parse::<f32>().ok())
    .filter(|score| (0.0..=10.0).contains(score))
}

//! Bibliographic citations written by the language model.

use super::*;

/// Reference citation shown to the model as the target style.
pub const STYLE_EXAMPLE: &str = "Ching, Travers, et al. \"Opportunities and obstacles for deep \
                                 learning in biology and medicine.\" Journal of the royal society \
                                 interface 15.141 (2018): 20170387.";

/// Prompt asking for exactly one citation of `record` in the [`STYLE_EXAMPLE`] style.
pub fn citation_prompt(record: &PaperRecord) -> String {
  format!(
    "Create a proper citation for the following paper:\nTitle: {}\nSummary: {}\n\nFormat the \
     citation in the style similar to this example:\n{STYLE_EXAMPLE}\n\nProvide only the \
     formatted citation, without any additional text.",
    record.title, record.summary_info
  )
}

/// Asks the model for the citation of the paper at `index`.
///
/// The answer is trimmed and folded onto a single line.
///
/// # Errors
///
/// Returns [`LiterafyError::RemoteGeneration`] tagged with `index` and
/// [`Stage::Citation`] if the call fails or the answer is blank. No fallback citation is
/// invented.
pub async fn synthesize_citation(
  generator: &dyn Generate,
  record: &PaperRecord,
  index: usize,
) -> Result<String> {
  debug!("Requesting citation for [{index}] {}", record.title);
  let citation = generator
    .generate(&citation_prompt(record))
    .await
    .map_err(|e| LiterafyError::generation(index, Stage::Citation, e))?;

  let citation = citation.split_whitespace().collect::<Vec<_>>().join(" ");
  if citation.is_empty() {
    return Err(LiterafyError::RemoteGeneration {
      index,
      stage: Stage::Citation,
      reason: "model returned an empty citation".to_string(),
    });
  }
  Ok(citation)
}

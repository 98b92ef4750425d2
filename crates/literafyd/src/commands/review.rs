//! Module for generating a review and saving it to disk.

use super::*;

/// Options for [`Commands::Review`].
#[derive(Args, Clone)]
pub struct ReviewOptions {
  /// Research topic
  pub topic: String,

  /// Where to write the PDF. Defaults to `literature_review_<topic>.pdf`.
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Maximum number of papers to include
  #[arg(long, short)]
  pub limit: Option<usize>,
}

/// File name used when no output path is given.
///
/// Whitespace and characters that are not allowed in file names become underscores, so the
/// result always names a file in the current directory.
pub fn default_output(topic: &str) -> PathBuf {
  let name: String = topic
    .trim()
    .chars()
    .map(|c| match c {
      '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
      c if c.is_whitespace() || c.is_control() => '_',
      c => c,
    })
    .collect();
  PathBuf::from(format!("literature_review_{name}.pdf"))
}

/// Function for the [`Commands::Review`] in the CLI.
pub async fn review<I: UserInteraction>(
  interaction: &I,
  config: Config,
  review_options: ReviewOptions,
) -> Result<()> {
  let ReviewOptions { topic, output, limit } = review_options;
  let query = SearchQuery::new(&topic)?;
  let output = output.unwrap_or_else(|| default_output(query.as_str()));
  let config = match limit {
    Some(limit) => config.with_result_limit(limit),
    None => config,
  };
  let literafy = Literafy::from_config(config)?;

  if output.exists()
    && !interaction
      .confirm(&format!("{} already exists, do you want to overwrite it?", output.display()))?
  {
    interaction.reply(ResponseContent::Info("Nothing written. Choose another file with --output"))?;
    return Ok(());
  }

  interaction.reply(ResponseContent::Working(&format!(
    "Writing a literature review on \"{query}\", this can take a few minutes"
  )))?;
  let artifact = literafy.review(query.as_str()).await?;

  tokio::fs::write(&output, &artifact.bytes).await?;
  interaction.reply(ResponseContent::Success(&format!(
    "Saved review to {} ({} bytes)",
    output.display(),
    artifact.bytes.len()
  )))
}

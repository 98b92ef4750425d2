//! Module for previewing search results for a topic.

use super::*;

/// Options for [`Commands::Search`].
#[derive(Args, Clone)]
pub struct SearchOptions {
  /// Research topic
  pub topic: String,

  /// Maximum number of papers to fetch
  #[arg(long, short)]
  pub limit: Option<usize>,
}

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search<I: UserInteraction>(
  interaction: &I,
  config: Config,
  search_options: SearchOptions,
) -> Result<()> {
  let SearchOptions { topic, limit } = search_options;
  let query = SearchQuery::new(&topic)?;
  let config = match limit {
    Some(limit) => config.with_result_limit(limit),
    None => config,
  };
  let literafy = Literafy::from_config(config)?;

  let records = literafy.search(query.as_str()).await?;
  if records.is_empty() {
    interaction.reply(ResponseContent::Info(&format!("No papers found for \"{query}\"")))
  } else {
    interaction
      .reply(ResponseContent::Info(&format!("Found {} papers for \"{query}\":", records.len())))?;
    interaction.reply(ResponseContent::Records(&records))
  }
}

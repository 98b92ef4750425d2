//! Module for setting up a [`literafy`] configuration.

use super::*;

/// Function for the [`Commands::Init`] in the CLI.
///
/// Writes the commented default configuration to `path`, asking first if a file is
/// already there.
pub async fn init<I: UserInteraction>(interaction: &I, path: &Path) -> Result<()> {
  if path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {}, do you want to overwrite it?",
      path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Pass a different location with --config",
    ))?;
    return Ok(());
  }

  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, DEFAULT_CONFIG).await?;

  interaction.reply(ResponseContent::Success(&format!(
    "Wrote default configuration to {}",
    path.display()
  )))?;
  interaction.reply(ResponseContent::Info(&format!(
    "Add your API keys to the file, or export {SERPAPI_KEY_VAR} and {MISTRAL_KEY_VAR}"
  )))?;
  Ok(())
}

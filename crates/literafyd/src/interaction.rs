//! Terminal input and output for the CLI commands.

use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for progress messages
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch character for tree structure
pub static ITEM_PREFIX: &str = "├─";
/// Leaf character for tree structure (end of branch)
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line for tree structure
pub static CONTINUE_PREFIX: &str = "│  ";

/// Something a command wants to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Normalized search results, numbered from 1
  Records(&'a [PaperRecord]),
  /// A long-running step has started
  Working(&'a str),
  /// The command finished its work
  Success(&'a str),
  /// The command failed
  Error(&'a LiterafydError),
  /// Anything else worth mentioning
  Info(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction over the process' terminal.
pub struct Terminal {
  /// Answer every question with "yes" without asking
  accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal interaction, optionally skipping all prompts.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{message}", style(PROMPT_PREFIX).cyan()))
        .default(false)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Records(records) => {
        let last = records.len().saturating_sub(1);
        for (position, record) in records.iter().enumerate() {
          let (branch, indent) = if position == last {
            (LAST_ITEM_PREFIX, "   ")
          } else {
            (ITEM_PREFIX, CONTINUE_PREFIX)
          };
          println!(
            "{branch} {} {}",
            style(format!("[{}]", position + 1)).dim(),
            style(&record.title).white().bold()
          );
          if !record.summary_info.is_empty() {
            println!("{indent}{}", style(&record.summary_info).yellow());
          }
          if !record.link.is_empty() {
            println!("{indent}{}", style(&record.link).blue().underlined());
          }
        }
      },
      ResponseContent::Working(message) =>
        println!("{} {message}", style(WORKING_PREFIX).cyan()),
      ResponseContent::Success(message) =>
        println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Error(error) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red()),
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).blue()),
    }
    Ok(())
  }
}

//! Terminal output and confirmations.

use console::style;
use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Marker for a watched row
pub static WATCHED_MARK: &str = "●";
/// Marker for an unwatched row
pub static UNWATCHED_MARK: &str = "○";
/// Marker for a row whose log entry can't be read
pub static UNREADABLE_MARK: &str = "?";
/// Branch character for listings
pub static ITEM_PREFIX: &str = "├─";
/// Leaf character for the last row of a listing
pub static LAST_ITEM_PREFIX: &str = "└─";

/// A message for the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Neutral information.
  Info(&'a str),
  /// An operation finished.
  Success(&'a str),
  /// Something the user should know about but that didn't stop the command.
  Warning(&'a str),
  /// Plain listing line, printed as-is.
  Line(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question; defaults to no.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Shows a message.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(Confirm::new().with_prompt(message).default(false).interact()?)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).cyan()),
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Warning(message) =>
        println!("{} {}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
      ResponseContent::Line(line) => println!("{line}"),
    }
    Ok(())
  }
}

/// Tree prefix for row `index` of `len`.
pub fn item_prefix(index: usize, len: usize) -> &'static str {
  if index + 1 == len {
    LAST_ITEM_PREFIX
  } else {
    ITEM_PREFIX
  }
}

/// Watched marker for a row.
pub fn watched_mark(watched: bool) -> String {
  if watched {
    style(WATCHED_MARK).green().to_string()
  } else {
    style(UNWATCHED_MARK).dim().to_string()
  }
}

/// Marker for a listing row; `None` when the stored flag can't be read.
pub fn row_mark(watched: Option<bool>) -> String {
  match watched {
    Some(watched) => watched_mark(watched),
    None => style(UNREADABLE_MARK).red().to_string(),
  }
}

use chrono::NaiveDate;
use tracing::warn;
use treklist::{
  error::TrekError,
  log::{LogField, LogValue},
  model::validate_identifier,
};

use super::*;

pub mod catalog;
pub mod log;
pub mod poster;
pub mod stats;
pub mod transfer;

pub use self::catalog::{episodes, movies, series};
pub use self::log::{get, set, status, watch};
pub use poster::poster;
pub use stats::stats;
pub use transfer::{export, import};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Show catalog totals and how much of it you've watched
  Stats,

  /// List the series in the catalog
  Series,

  /// List a series' episodes with their watched state
  Episodes {
    /// Series abbreviation, e.g. "TOS" or "TNG"
    abbreviation: String,
  },

  /// List the movies in release order with their watched state
  Movies,

  /// Show the watched log entry for an episode, movie or series
  Status {
    /// IMDb identifier, e.g. "tt0708447"
    imdb_id: String,
  },

  /// Read a single watched log field
  Get {
    /// IMDb identifier
    imdb_id: String,

    /// Field name: "watched" or "last_watched"
    field: String,
  },

  /// Write a single watched log field
  Set {
    /// IMDb identifier
    imdb_id: String,

    /// Field name: "watched" or "last_watched"
    field: String,

    /// "true"/"false" for watched; a YYYY-MM-DD date or "clear" for last_watched
    value: String,
  },

  /// Mark an item watched
  Watch {
    /// IMDb identifier
    imdb_id: String,
  },

  /// Mark an item not watched
  Unwatch {
    /// IMDb identifier
    imdb_id: String,
  },

  /// Write an item's poster image to a file
  Poster {
    /// IMDb identifier
    imdb_id: String,

    /// Where to write the image
    out: PathBuf,
  },

  /// Save a copy of your watched log
  Export {
    /// Destination file
    path: PathBuf,
  },

  /// Replace your watched log with a saved copy
  Import {
    /// Log file to import
    path: PathBuf,
  },
}

/// Renders a last-watched date with the configured format.
fn format_date(session: &Session, date: Option<NaiveDate>) -> String {
  match date {
    Some(date) => date.format(&session.settings().display.date_format).to_string(),
    None => "-".to_string(),
  }
}

/// Keeps an unreadable stored log value to its own row: logs it and yields `None`.
fn readable<T>(value: treklist::error::Result<T>) -> Result<Option<T>> {
  match value {
    Ok(value) => Ok(Some(value)),
    Err(e @ TrekError::InvalidLogValue { .. }) => {
      warn!("{e}");
      Ok(None)
    },
    Err(e) => Err(e.into()),
  }
}

/// Watched marker and last-watched column for one listing row.
fn row_state(session: &Session, imdb_id: &str) -> Result<(Option<bool>, String)> {
  let watched = readable(session.log().watched(imdb_id))?;
  let last = match readable(session.log().last_watched(imdb_id))? {
    Some(date) => format_date(session, date),
    None => UNREADABLE_MARK.to_string(),
  };
  Ok((watched, last))
}

/// Title of the catalog item `imdb_id`, if the catalog knows it.
fn item_title(session: &Session, imdb_id: &str) -> Option<String> {
  let catalog = session.catalog();
  if let Some(episode) = catalog.episode(imdb_id) {
    return Some(format!("{} {} {}", episode.abbreviation, episode.code(), episode.title));
  }
  if let Some(movie) = catalog.movie(imdb_id) {
    return Some(movie.title.clone());
  }
  catalog
    .series()
    .iter()
    .find(|listing| listing.series.imdb_id == imdb_id)
    .map(|listing| listing.series.title.clone())
}

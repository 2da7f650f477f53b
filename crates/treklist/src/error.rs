//! Error types for the treklist library.
//!
//! Every fallible operation in the crate returns [`TrekError`]. The variants fall into
//! a few groups:
//! - Caller errors: a malformed identifier or log field name, rejected before any storage access
//! - Catalog data errors: runtime or release strings that don't parse
//! - Storage errors: SQLite and file system failures, passed through as-is
//! - Startup errors: a missing reference table or an unreadable settings file
//!
//! # Examples
//!
//! ```
//! use treklist::{error::TrekError, log::LogField};
//!
//! match "rating".parse::<LogField>() {
//!   Err(TrekError::InvalidField(name)) => println!("no such log field: {name}"),
//!   Err(e) => println!("other error: {e}"),
//!   Ok(field) => println!("field: {field}"),
//! }
//! ```

use thiserror::Error;

use super::*;

/// Error type alias used for the [`treklist`](crate) crate.
pub type Result<T> = core::result::Result<T, TrekError>;

/// Errors that can occur when working with the catalog or the watched log.
#[derive(Error, Debug)]
pub enum TrekError {
  /// The identifier is not of the form `tt` followed by at least seven digits.
  #[error("Invalid identifier format: {0:?}")]
  InvalidIdentifier(String),

  /// A log field name other than `watched` or `last_watched` was requested.
  #[error("Unknown log field {0:?}, expected `watched` or `last_watched`")]
  InvalidField(String),

  /// A value stored in the log could not be interpreted for its field.
  ///
  /// Null-like values are normalized to the field default, so this only fires for
  /// genuinely foreign content, e.g. a `last_watched` of `"yesterday"`.
  #[error("Log entry {imdb_id} holds an unreadable {field} value: {value}")]
  InvalidLogValue {
    /// Identifier of the offending row.
    imdb_id: String,
    /// Field that failed to read.
    field:   log::LogField,
    /// The raw stored value, rendered for display.
    value:   String,
  },

  /// User-entered text isn't a valid value for the log field.
  #[error("{value:?} is not a valid {field} value")]
  InvalidInput {
    /// Field the text was meant for.
    field: log::LogField,
    /// The text as entered.
    value: String,
  },

  /// The file is not a usable watched log: not SQLite, no conforming `log` table, or
  /// identifiers logged more than once.
  #[error("{} is not a TrekList log file", .0.display())]
  InvalidLogFile(PathBuf),

  /// A catalog runtime is neither `N/A` nor a digit-bearing string.
  #[error("Malformed runtime {0:?}")]
  MalformedRuntime(String),

  /// A date string failed to parse.
  #[error(transparent)]
  MalformedDate(#[from] chrono::ParseError),

  /// The requested catalog item or poster doesn't exist.
  #[error("Not found")]
  NotFound,

  /// The reference database lacks one of the catalog tables.
  #[error("Reference database is missing the `{0}` table")]
  MissingReferenceTable(&'static str),

  /// A SQLite operation failed.
  ///
  /// This wraps errors from the `rusqlite` crate, covering:
  /// - Opening or creating database files
  /// - SQL and schema errors
  /// - Type conversion errors
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the data directory fails
  /// - Copying the log file in or out fails
  /// - Permission errors occur
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The settings file is not valid TOML or doesn't match the settings layout.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A settings value is out of range.
  #[error("{0}")]
  Config(String),
}

//! Instructions executed against the [`UserLog`].
//!
//! Each instruction validates its identifier before touching storage, so a malformed
//! identifier never reaches a query. Writes are single-field upserts that commit on their own.
//!
//! # Examples
//!
//! ```no_run
//! use treklist::{
//!   log::{Get, LogField, Set, UserLog},
//!   prelude::*,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut log = UserLog::open("log.db")?;
//! Set::watched("tt0708447", true).execute(&mut log)?;
//! let value = Get::field("tt0708447", LogField::Watched).execute(&mut log)?;
//! assert_eq!(value.as_watched(), Some(true));
//!
//! // Reads also work through a shared borrow
//! let log = &log;
//! assert_eq!(Get::field("tt0708447", LogField::Watched).read(log)?, value);
//! # Ok(())
//! # }
//! ```

use super::*;

/// An operation on the watched log.
pub trait LogInstruction {
  /// What the instruction yields.
  type Output;

  /// Runs the instruction against `log`.
  fn execute(&self, log: &mut UserLog) -> Result<Self::Output>;
}

/// Reads one field of one entry.
#[derive(Debug, Clone)]
pub struct Get {
  /// Identifier to read.
  imdb_id: String,
  /// Field to read.
  field:   LogField,
}

impl Get {
  /// Reads `field` of `imdb_id`.
  pub fn field(imdb_id: impl Into<String>, field: LogField) -> Self {
    Self { imdb_id: imdb_id.into(), field }
  }

  /// Runs the read against a shared handle on `log`.
  ///
  /// [`LogInstruction::execute`] takes the log mutably so reads and writes share one entry
  /// point; use this where only a shared borrow is available.
  pub fn read(&self, log: &UserLog) -> Result<LogValue> { self.query(&log.conn) }

  /// Runs the read on `conn`. Missing rows and null-like values yield the field default.
  fn query(&self, conn: &Connection) -> Result<LogValue> {
    validate_identifier(&self.imdb_id)?;
    let sql = match self.field {
      LogField::Watched => "SELECT watched FROM log WHERE imdb_id = ?1",
      LogField::LastWatched => "SELECT last_watched FROM log WHERE imdb_id = ?1",
    };
    let stored: Option<Value> =
      conn.prepare_cached(sql)?.query_row([&self.imdb_id], |row| row.get(0)).optional()?;
    trace!("Read {} for {}: {stored:?}", self.field, self.imdb_id);

    let Some(stored) = stored else {
      return Ok(self.field.default_value());
    };
    Ok(match self.field {
      LogField::Watched => LogValue::Watched(normalize_watched(&self.imdb_id, stored)?),
      LogField::LastWatched =>
        LogValue::LastWatched(normalize_last_watched(&self.imdb_id, stored)?),
    })
  }
}

impl LogInstruction for Get {
  type Output = LogValue;

  fn execute(&self, log: &mut UserLog) -> Result<Self::Output> { self.read(log) }
}

/// Writes one field of one entry, creating the entry if it doesn't exist.
#[derive(Debug, Clone)]
pub struct Set {
  /// Identifier to write.
  imdb_id: String,
  /// Field and value to store.
  value:   LogValue,
}

impl Set {
  /// Stores `value` for `imdb_id`.
  pub fn value(imdb_id: impl Into<String>, value: LogValue) -> Self {
    Self { imdb_id: imdb_id.into(), value }
  }

  /// Marks `imdb_id` watched or unwatched.
  pub fn watched(imdb_id: impl Into<String>, watched: bool) -> Self {
    Self::value(imdb_id, LogValue::Watched(watched))
  }

  /// Sets the last-watched date of `imdb_id`; `None` clears it.
  pub fn last_watched(imdb_id: impl Into<String>, date: Option<NaiveDate>) -> Self {
    Self::value(imdb_id, LogValue::LastWatched(date))
  }
}

impl LogInstruction for Set {
  type Output = ();

  fn execute(&self, log: &mut UserLog) -> Result<Self::Output> {
    validate_identifier(&self.imdb_id)?;
    let changed = match self.value {
      LogValue::Watched(watched) => log.conn.execute(
        "INSERT INTO log (imdb_id, watched) VALUES (?1, ?2)
         ON CONFLICT(imdb_id) DO UPDATE SET watched = excluded.watched",
        params![self.imdb_id, watched],
      )?,
      LogValue::LastWatched(date) => log.conn.execute(
        "INSERT INTO log (imdb_id, watched, last_watched) VALUES (?1, 0, ?2)
         ON CONFLICT(imdb_id) DO UPDATE SET last_watched = excluded.last_watched",
        params![self.imdb_id, date],
      )?,
    };
    trace!("Set {} for {} to {} ({changed} row)", self.value.field(), self.imdb_id, self.value);
    Ok(())
  }
}

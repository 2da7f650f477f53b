//! The user's watched log.
//!
//! The log is a small SQLite database with a single `log` table holding, per catalog
//! identifier, whether the item has been watched and when it was last watched. Rows are created
//! lazily: an identifier the user never touched has no row and reads back the field defaults
//! (`watched = false`, no `last_watched`).
//!
//! Log files written by older releases may hold null-like values (`NULL`, `NaN`, `"NaT"`, empty
//! text) where a flag or date was never set. Every read path normalizes those to the field
//! default.
//!
//! Reads and writes are expressed as [`LogInstruction`]s ([`Get`] and [`Set`]), with typed
//! shortcuts on [`UserLog`] for the common cases.
//!
//! # Examples
//!
//! ```no_run
//! # use treklist::log::{LogField, LogValue, UserLog};
//! # use chrono::NaiveDate;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut log = UserLog::open("log.db")?;
//!
//! assert!(!log.watched("tt0708447")?);
//! log.set_watched("tt0708447", true)?;
//! log.set_last_watched("tt0708447", NaiveDate::from_ymd_opt(2024, 5, 1))?;
//!
//! // Field names coming from a UI are parsed and validated up front
//! let field: LogField = "last_watched".parse()?;
//! println!("{}", log.get("tt0708447", field)?);
//!
//! // Clearing the date stores NULL
//! log.set("tt0708447", LogValue::LastWatched(None))?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use rusqlite::types::Value;

use super::*;

pub mod instruction;

pub use self::instruction::*;

/// Schema of the log database.
pub const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/log.sql"));

/// Text accepted in place of a date to clear `last_watched`.
pub const CLEAR: &str = "clear";

/// Columns a `log` table must have.
const LOG_COLUMNS: [&str; 3] = ["imdb_id", "watched", "last_watched"];

/// Text values older log files use for "never set".
const NULL_MARKERS: [&str; 5] = ["", "nan", "nat", "none", "null"];

/// A column of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogField {
  /// Whether the item has been watched.
  Watched,
  /// When the item was last watched.
  LastWatched,
}

impl LogField {
  /// Column name in the `log` table.
  pub fn as_str(self) -> &'static str {
    match self {
      LogField::Watched => "watched",
      LogField::LastWatched => "last_watched",
    }
  }

  /// Value read for an identifier with no log entry.
  pub fn default_value(self) -> LogValue {
    match self {
      LogField::Watched => LogValue::Watched(false),
      LogField::LastWatched => LogValue::LastWatched(None),
    }
  }
}

impl Display for LogField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for LogField {
  type Err = TrekError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "watched" => Ok(LogField::Watched),
      "last_watched" => Ok(LogField::LastWatched),
      _ => Err(TrekError::InvalidField(s.to_string())),
    }
  }
}

/// The value of one log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogValue {
  /// The watched flag.
  Watched(bool),
  /// The last-watched date; `None` when never set or cleared.
  LastWatched(Option<NaiveDate>),
}

impl LogValue {
  /// Which field this value belongs to.
  pub fn field(&self) -> LogField {
    match self {
      LogValue::Watched(_) => LogField::Watched,
      LogValue::LastWatched(_) => LogField::LastWatched,
    }
  }

  /// Parses user-entered text for `field`.
  ///
  /// `watched` takes `true`/`false` (or `yes`/`no`, `1`/`0`). `last_watched` takes an ISO
  /// `YYYY-MM-DD` date, or [`CLEAR`] to remove the date.
  pub fn parse(field: LogField, input: &str) -> Result<Self> {
    let input = input.trim();
    match field {
      LogField::Watched => match input.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(LogValue::Watched(true)),
        "false" | "no" | "0" => Ok(LogValue::Watched(false)),
        _ => Err(TrekError::InvalidInput { field, value: input.to_string() }),
      },
      LogField::LastWatched if input.eq_ignore_ascii_case(CLEAR) => Ok(LogValue::LastWatched(None)),
      LogField::LastWatched => Ok(LogValue::LastWatched(Some(NaiveDate::from_str(input)?))),
    }
  }

  /// The flag, if this is a watched value.
  pub fn as_watched(&self) -> Option<bool> {
    match self {
      LogValue::Watched(watched) => Some(*watched),
      LogValue::LastWatched(_) => None,
    }
  }

  /// The date, if this is a last-watched value that is set.
  pub fn as_last_watched(&self) -> Option<NaiveDate> {
    match self {
      LogValue::LastWatched(date) => *date,
      LogValue::Watched(_) => None,
    }
  }
}

impl Display for LogValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      LogValue::Watched(watched) => write!(f, "{watched}"),
      LogValue::LastWatched(Some(date)) => write!(f, "{date}"),
      LogValue::LastWatched(None) => f.write_str("-"),
    }
  }
}

/// One row of the log, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogEntry {
  /// Catalog identifier the entry belongs to.
  pub imdb_id:      String,
  /// Whether the item has been watched.
  pub watched:      bool,
  /// When the item was last watched.
  pub last_watched: Option<NaiveDate>,
}

/// Identifiers the log marks watched, read from the `watched` column alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchedSet {
  /// Identifiers marked watched.
  pub watched:    HashSet<String>,
  /// Identifiers whose stored flag couldn't be read. They count as unwatched.
  pub unreadable: Vec<String>,
}

/// Handle on the user's log database.
pub struct UserLog {
  /// Read-write connection to the log file.
  conn: Connection,
  /// Where the log file lives.
  path: PathBuf,
}

impl UserLog {
  /// Opens the log at `path`, creating the file and `log` table if needed.
  ///
  /// An existing file whose `log` table lacks the expected columns is rejected with
  /// [`TrekError::InvalidLogFile`].
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Opening user log at {}", path.display());
    let conn = Connection::open(path)?;
    let invalid = |_| TrekError::InvalidLogFile(path.to_path_buf());
    if !has_log_table(&conn).map_err(invalid)? && table_exists(&conn).map_err(invalid)? {
      return Err(TrekError::InvalidLogFile(path.to_path_buf()));
    }
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn, path: path.to_path_buf() })
  }

  /// Location of the log file.
  pub fn path(&self) -> &Path { &self.path }

  /// Reads `field` for `imdb_id`, falling back to the field default when there's no entry.
  pub fn get(&self, imdb_id: &str, field: LogField) -> Result<LogValue> {
    Get::field(imdb_id, field).read(self)
  }

  /// Writes a single field for `imdb_id`, creating the entry if needed.
  pub fn set(&mut self, imdb_id: &str, value: LogValue) -> Result<()> {
    Set::value(imdb_id, value).execute(self)
  }

  /// Whether `imdb_id` is marked watched.
  pub fn watched(&self, imdb_id: &str) -> Result<bool> {
    Ok(self.get(imdb_id, LogField::Watched)?.as_watched().unwrap_or(false))
  }

  /// When `imdb_id` was last watched.
  pub fn last_watched(&self, imdb_id: &str) -> Result<Option<NaiveDate>> {
    Ok(self.get(imdb_id, LogField::LastWatched)?.as_last_watched())
  }

  /// Marks `imdb_id` watched or unwatched.
  pub fn set_watched(&mut self, imdb_id: &str, watched: bool) -> Result<()> {
    self.set(imdb_id, LogValue::Watched(watched))
  }

  /// Sets or, with `None`, clears the last-watched date of `imdb_id`.
  pub fn set_last_watched(&mut self, imdb_id: &str, date: Option<NaiveDate>) -> Result<()> {
    self.set(imdb_id, LogValue::LastWatched(date))
  }

  /// The full entry for `imdb_id`, if one exists.
  pub fn entry(&self, imdb_id: &str) -> Result<Option<UserLogEntry>> {
    validate_identifier(imdb_id)?;
    let mut stmt = self
      .conn
      .prepare_cached("SELECT imdb_id, watched, last_watched FROM log WHERE imdb_id = ?1")?;
    let raw = stmt.query_row([imdb_id], raw_entry).optional()?;
    raw.map(normalize_entry).transpose()
  }

  /// Every identifier marked watched.
  ///
  /// A row whose flag can't be read is logged, counted as unwatched and listed in
  /// [`WatchedSet::unreadable`]; it doesn't affect the other rows.
  pub fn watched_set(&self) -> Result<WatchedSet> {
    let mut stmt = self.conn.prepare_cached("SELECT imdb_id, watched FROM log ORDER BY imdb_id")?;
    let rows = stmt
      .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Value>(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut set = WatchedSet::default();
    for (imdb_id, stored) in rows {
      match normalize_watched(&imdb_id, stored) {
        Ok(true) => {
          set.watched.insert(imdb_id);
        },
        Ok(false) => {},
        Err(e) => {
          warn!("{e}, counting it as unwatched");
          set.unreadable.push(imdb_id);
        },
      }
    }
    Ok(set)
  }

  /// Every entry in the log, ordered by identifier.
  pub fn entries(&self) -> Result<Vec<UserLogEntry>> {
    let mut stmt =
      self.conn.prepare_cached("SELECT imdb_id, watched, last_watched FROM log ORDER BY imdb_id")?;
    let raw = stmt.query_map([], raw_entry)?.collect::<rusqlite::Result<Vec<_>>>()?;
    raw.into_iter().map(normalize_entry).collect()
  }
}

/// Checks that `path` is a log [`UserLog::open`] would accept, without modifying it.
///
/// The file must be SQLite, hold a `log` table with the expected columns, and log each
/// identifier at most once.
pub fn validate_log_file(path: &Path) -> Result<()> {
  let invalid = |_| TrekError::InvalidLogFile(path.to_path_buf());
  let conn = Connection::open_with_flags(
    path,
    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
  )
  .map_err(invalid)?;
  if !has_log_table(&conn).map_err(invalid)? {
    return Err(TrekError::InvalidLogFile(path.to_path_buf()));
  }
  if let Some(imdb_id) = duplicate_identifier(&conn).map_err(invalid)? {
    debug!("{} logs {imdb_id} more than once", path.display());
    return Err(TrekError::InvalidLogFile(path.to_path_buf()));
  }
  Ok(())
}

/// An identifier with more than one row, if any. Such a log can't take the unique index.
fn duplicate_identifier(conn: &Connection) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT imdb_id FROM log GROUP BY imdb_id HAVING COUNT(*) > 1 LIMIT 1",
      [],
      |row| row.get(0),
    )
    .optional()
}

/// Whether a `log` table exists at all.
fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'log')",
    [],
    |row| row.get(0),
  )
}

/// Whether a `log` table with every expected column exists.
fn has_log_table(conn: &Connection) -> rusqlite::Result<bool> {
  let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('log')")?;
  let columns = stmt.query_map([], |row| row.get::<_, String>(0))?.collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(LOG_COLUMNS.iter().all(|column| columns.iter().any(|c| c == column)))
}

/// A log row before normalization.
type RawEntry = (String, Value, Value);

/// Reads the three log columns without interpreting them.
fn raw_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Normalizes both fields of a raw row.
fn normalize_entry((imdb_id, watched, last_watched): RawEntry) -> Result<UserLogEntry> {
  Ok(UserLogEntry {
    watched: normalize_watched(&imdb_id, watched)?,
    last_watched: normalize_last_watched(&imdb_id, last_watched)?,
    imdb_id,
  })
}

/// Whether a stored text value means "never set".
fn is_null_marker(text: &str) -> bool {
  let text = text.trim().to_ascii_lowercase();
  NULL_MARKERS.contains(&text.as_str())
}

/// Interprets a stored `watched` value. Null-like values read as `false`.
pub(crate) fn normalize_watched(imdb_id: &str, value: Value) -> Result<bool> {
  let invalid = |value: String| TrekError::InvalidLogValue {
    imdb_id: imdb_id.to_string(),
    field: LogField::Watched,
    value,
  };
  match value {
    Value::Null => Ok(false),
    Value::Integer(n) => Ok(n != 0),
    Value::Real(x) if x.is_nan() => {
      trace!("Normalized NaN watched flag for {imdb_id}");
      Ok(false)
    },
    Value::Real(x) => Ok(x != 0.0),
    Value::Text(text) if is_null_marker(&text) => {
      trace!("Normalized {text:?} watched flag for {imdb_id}");
      Ok(false)
    },
    Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
      "1" | "true" => Ok(true),
      "0" | "false" => Ok(false),
      _ => Err(invalid(text)),
    },
    Value::Blob(bytes) => Err(invalid(format!("<{} byte blob>", bytes.len()))),
  }
}

/// Interprets a stored `last_watched` value. Null-like values read as `None`.
///
/// Accepts ISO dates and the `YYYY-MM-DD HH:MM:SS` timestamps some older log files hold.
pub(crate) fn normalize_last_watched(imdb_id: &str, value: Value) -> Result<Option<NaiveDate>> {
  let invalid = |value: String| TrekError::InvalidLogValue {
    imdb_id: imdb_id.to_string(),
    field: LogField::LastWatched,
    value,
  };
  match value {
    Value::Null => Ok(None),
    Value::Real(x) if x.is_nan() => {
      trace!("Normalized NaN last_watched for {imdb_id}");
      Ok(None)
    },
    Value::Text(text) if is_null_marker(&text) => {
      trace!("Normalized {text:?} last_watched for {imdb_id}");
      Ok(None)
    },
    Value::Text(text) => {
      let trimmed = text.trim();
      NaiveDate::from_str(trimmed)
        .or_else(|_| {
          chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|t| t.date())
        })
        .map(Some)
        .map_err(|_| invalid(text))
    },
    Value::Integer(n) => Err(invalid(n.to_string())),
    Value::Real(x) => Err(invalid(x.to_string())),
    Value::Blob(bytes) => Err(invalid(format!("<{} byte blob>", bytes.len()))),
  }
}

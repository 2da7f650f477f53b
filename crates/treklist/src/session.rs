//! Startup bootstrap and the per-process session.
//!
//! [`Session::start`] runs once when the application launches:
//! 1. Resolve the per-user data directory and create it if absent
//! 2. Seed an empty watched log there if none exists
//! 3. Seed the default settings file if none exists
//! 4. Load the settings
//! 5. Open the reference catalog and the watched log, and snapshot the catalog
//!
//! Seeding never replaces an existing file. Any failure along the way is fatal: the caller gets
//! the error and no session.
//!
//! The session also owns the log file operations. [`Session::save_log_as`] copies the live log
//! out; [`Session::load_log_from`] replaces it and hands back a [`RestartRequired`] signal,
//! consuming the session so its handles can't be used on the replaced file. Both copies go
//! through a temporary file in the destination directory followed by a rename, so a failed copy
//! never leaves a truncated file behind.
//!
//! # Examples
//!
//! ```no_run
//! # use treklist::session::{Session, SessionPaths};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::start(SessionPaths::default())?;
//! session.save_log_as("backup.db")?;
//!
//! let restart = session.load_log_from("backup.db")?;
//! println!("log replaced at {}, restart to continue", restart.log_path().display());
//! # Ok(())
//! # }
//! ```

use std::fs::File;

use tempfile::NamedTempFile;

use crate::{
  catalog::Catalog,
  log::{self, validate_log_file, UserLog},
  reference::ReferenceStore,
  settings::{Settings, DEFAULT_SETTINGS},
};

use super::*;

/// File name of the watched log inside the data directory.
pub const LOG_FILE: &str = "log.db";
/// File name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Where a session keeps and finds its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
  /// Per-user writable directory holding the log and settings.
  pub data_dir:  PathBuf,
  /// The bundled reference catalog.
  pub reference: PathBuf,
}

impl Default for SessionPaths {
  fn default() -> Self {
    Self { data_dir: Self::default_data_dir(), reference: ReferenceStore::bundled_path() }
  }
}

impl SessionPaths {
  /// Returns the default per-user data directory.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/treklist`
  /// - On macOS: `~/Library/Application Support/treklist`
  /// - On Windows: `%APPDATA%\treklist`
  /// - Fallback: `./treklist` in the current directory
  pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("treklist")
  }

  /// Uses `data_dir` in place of the per-user directory.
  pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
    self.data_dir = data_dir.into();
    self
  }

  /// Uses the catalog at `reference` in place of the bundled one.
  pub fn with_reference(mut self, reference: impl Into<PathBuf>) -> Self {
    self.reference = reference.into();
    self
  }

  /// Path of the watched log.
  pub fn log_path(&self) -> PathBuf { self.data_dir.join(LOG_FILE) }

  /// Path of the settings file.
  pub fn settings_path(&self) -> PathBuf { self.data_dir.join(SETTINGS_FILE) }
}

/// Prepares the data directory and loads the settings.
///
/// Creates the directory, seeds the log and settings files when they're missing, then loads
/// the settings. Existing files are left untouched.
pub fn bootstrap(paths: &SessionPaths) -> Result<Settings> {
  fs::create_dir_all(&paths.data_dir)?;

  let log_path = paths.log_path();
  if !log_path.exists() {
    debug!("Seeding empty log at {}", log_path.display());
    seed_log(&log_path)?;
  }

  let settings_path = paths.settings_path();
  if !settings_path.exists() {
    debug!("Seeding default settings at {}", settings_path.display());
    let mut tmp = NamedTempFile::new_in(&paths.data_dir)?;
    io::Write::write_all(tmp.as_file_mut(), DEFAULT_SETTINGS.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(&settings_path).map_err(io::Error::from)?;
  }

  Settings::load(&settings_path)
}

/// Writes a fresh log database to `path`, failing rather than replacing an existing file.
fn seed_log(path: &Path) -> Result<()> {
  let tmp = NamedTempFile::new_in(parent_dir(path))?;
  {
    let conn = Connection::open(tmp.path())?;
    conn.execute_batch(log::SCHEMA)?;
  }
  tmp.persist_noclobber(path).map_err(io::Error::from)?;
  Ok(())
}

/// Copies `source` to `destination` through a temporary file beside the destination.
fn copy_atomically(source: &Path, destination: &Path) -> Result<()> {
  let mut input = File::open(source)?;
  let mut tmp = NamedTempFile::new_in(parent_dir(destination))?;
  let bytes = io::copy(&mut input, tmp.as_file_mut())?;
  tmp.as_file().sync_all()?;
  tmp.persist(destination).map_err(io::Error::from)?;
  debug!("Copied {bytes} bytes from {} to {}", source.display(), destination.display());
  Ok(())
}

/// Directory containing `path`, treating a bare file name as relative to the working directory.
fn parent_dir(path: &Path) -> &Path {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  }
}

/// Returned by [`Session::load_log_from`]: the log file was replaced and the application has to
/// start a new session to pick it up.
#[must_use = "the replaced log is only read by a new session"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartRequired {
  /// The live log path that now holds the imported content.
  log_path: PathBuf,
}

impl RestartRequired {
  /// The live log path that now holds the imported content.
  pub fn log_path(&self) -> &Path { &self.log_path }
}

/// Everything the presentation layer needs for one run of the application.
pub struct Session {
  /// Resolved file locations.
  paths:     SessionPaths,
  /// Loaded settings.
  settings:  Settings,
  /// Read-only catalog handle.
  reference: ReferenceStore,
  /// Snapshot of the catalog with statistics.
  catalog:   Catalog,
  /// The user's watched log.
  log:       UserLog,
}

impl Session {
  /// Bootstraps the data directory, then opens the catalog and the watched log.
  pub fn start(paths: SessionPaths) -> Result<Self> {
    let settings = bootstrap(&paths)?;
    let reference = ReferenceStore::open(&paths.reference)?;
    let catalog = Catalog::load(&reference)?;
    let log = UserLog::open(paths.log_path())?;
    debug!("Session started in {}", paths.data_dir.display());
    Ok(Self { paths, settings, reference, catalog, log })
  }

  /// Resolved file locations.
  pub fn paths(&self) -> &SessionPaths { &self.paths }

  /// Loaded settings.
  pub fn settings(&self) -> &Settings { &self.settings }

  /// The reference catalog, for poster lookups.
  pub fn reference(&self) -> &ReferenceStore { &self.reference }

  /// The catalog snapshot.
  pub fn catalog(&self) -> &Catalog { &self.catalog }

  /// The watched log.
  pub fn log(&self) -> &UserLog { &self.log }

  /// The watched log, for writes.
  pub fn log_mut(&mut self) -> &mut UserLog { &mut self.log }

  /// Re-reads the catalog and recomputes its statistics.
  pub fn reload_catalog(&mut self) -> Result<()> {
    self.catalog = Catalog::load(&self.reference)?;
    Ok(())
  }

  /// Copies the live watched log to `destination`.
  pub fn save_log_as(&self, destination: impl AsRef<Path>) -> Result<()> {
    copy_atomically(self.log.path(), destination.as_ref())
  }

  /// Replaces the live watched log with the log file at `source`.
  ///
  /// `source` must be a readable log file; anything else is rejected before the live log is
  /// touched. The session is consumed either way, so start a new one afterwards.
  pub fn load_log_from(self, source: impl AsRef<Path>) -> Result<RestartRequired> {
    let source = source.as_ref();
    validate_log_file(source)?;

    let Session { paths, log, reference, .. } = self;
    drop(log);
    drop(reference);

    let log_path = paths.log_path();
    copy_atomically(source, &log_path)?;
    debug!("Imported log from {}", source.display());
    Ok(RestartRequired { log_path })
  }
}

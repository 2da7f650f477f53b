//! Error type for the `treklist` command line front end.

use thiserror::Error;

/// Result alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, TreklistdError>;

/// Errors the CLI can run into.
#[derive(Error, Debug)]
pub enum TreklistdError {
  /// Failures from the catalog, log or session.
  #[error(transparent)]
  Trek(#[from] treklist::error::TrekError),

  /// A prompt couldn't be shown or answered.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Writing output failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

//! Catalog and watched-log storage for the TrekList episode tracker.
//!
//! `treklist` is the data layer behind TrekList, providing:
//!
//! - Read-only access to the bundled Star Trek catalog (series, episodes, movies)
//! - Summary statistics over the catalog (counts and total runtime)
//! - A per-user watched log with a watched flag and last-watched date
//! - First-run bootstrap of the per-user data directory and settings
//! - Export and import of the watched log
//!
//! # Getting Started
//!
//! ```no_run
//! use treklist::{log::LogField, prelude::*, session::Session};
//!
//! fn main() -> Result<(), TrekError> {
//!   let mut session = Session::start(Default::default())?;
//!
//!   let stats = session.catalog().stats();
//!   println!("{} episodes across {} series", stats.episode_count, stats.series_count);
//!
//!   session.log_mut().set_watched("tt0708447", true)?;
//!   let watched = session.log().get("tt0708447", LogField::Watched)?;
//!   println!("watched: {watched}");
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: Catalog record types and identifier validation
//! - [`reference`]: The read-only reference database
//! - [`catalog`]: Catalog snapshot, statistics and per-item lookup
//! - [`runtime`]: Runtime string parsing and day/hour/minute breakdown
//! - [`log`]: The user's watched log
//! - [`settings`]: The per-user settings file
//! - [`session`]: Startup bootstrap and log export/import
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fmt::Display,
  fs,
  io,
  path::{Path, PathBuf},
  str::FromStr,
};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod catalog;
pub mod error;
pub mod log;
pub mod model;
pub mod reference;
pub mod runtime;
pub mod session;
pub mod settings;

use crate::{error::*, model::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use treklist::{log::Set, prelude::*, session::Session};
///
/// fn example() -> Result<(), TrekError> {
///   let mut session = Session::start(Default::default())?;
///   Set::watched("tt0708447", true).execute(session.log_mut())?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{error::TrekError, log::LogInstruction};
}

//! Command line front end for the TrekList episode tracker.
//!
//! This crate is the presentation layer over the `treklist` library. It supports:
//! - Catalog summaries and listings of series, episodes and movies
//! - Reading and writing an item's watched flag and last-watched date
//! - Extracting poster images
//! - Exporting and importing the watched log
//!
//! # Usage
//!
//! ```bash
//! # Catalog totals and progress
//! treklist stats
//!
//! # Episodes of The Original Series
//! treklist episodes TOS
//!
//! # Mark an episode watched, then inspect it
//! treklist watch tt0708447
//! treklist status tt0708447
//!
//! # Clear a last-watched date
//! treklist set tt0708447 last_watched clear
//!
//! # Back up and restore the log
//! treklist export ~/trek-log.db
//! treklist import ~/trek-log.db
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Parser, Subcommand};
use console::style;
use tracing::trace;
use tracing_subscriber::EnvFilter;
use treklist::session::{Session, SessionPaths};

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Track which Star Trek episodes and movies you've watched")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Directory holding the watched log and settings. Defaults to the platform-specific per-user
  /// data directory.
  #[arg(long, global = true, hide = true)]
  data_dir: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .with_writer(std::io::stderr)
    .init();
}

/// Entry point for the `treklist` CLI application
///
/// Bootstraps the session (data directory, settings, catalog, watched log) and runs the
/// requested command against it. Failing to start the session is fatal.
fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let paths = match &cli.data_dir {
    Some(data_dir) => SessionPaths::default().with_data_dir(data_dir),
    None => SessionPaths::default(),
  };
  trace!("Starting session with {paths:?}");

  let mut session = match Session::start(paths) {
    Ok(session) => session,
    Err(e) => {
      eprintln!("{} Failed to start TrekList: {e}", style(ERROR_PREFIX).red());
      return Err(e.into());
    },
  };

  match cli.command.clone() {
    Commands::Stats => stats(&cli, &session),
    Commands::Series => series(&cli, &session),
    Commands::Episodes { abbreviation } => episodes(&cli, &session, &abbreviation),
    Commands::Movies => movies(&cli, &session),
    Commands::Status { imdb_id } => status(&cli, &session, &imdb_id),
    Commands::Get { imdb_id, field } => get(&cli, &session, &imdb_id, &field),
    Commands::Set { imdb_id, field, value } => set(&cli, &mut session, &imdb_id, &field, &value),
    Commands::Watch { imdb_id } => watch(&cli, &mut session, &imdb_id, true),
    Commands::Unwatch { imdb_id } => watch(&cli, &mut session, &imdb_id, false),
    Commands::Poster { imdb_id, out } => poster(&cli, &session, &imdb_id, &out),
    Commands::Export { path } => export(&cli, &session, &path),
    Commands::Import { path } => import(&cli, session, &path),
  }
}

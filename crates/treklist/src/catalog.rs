//! In-memory snapshot of the catalog and its summary statistics.
//!
//! [`Catalog::load`] reads every series, episode and movie from the [`ReferenceStore`] in one
//! pass and derives the counts and total runtime shown on the summary page. Nothing here is
//! persisted; a reload recomputes everything.
//!
//! Rows with unreadable data don't stop the load. A runtime that is neither `N/A` nor carries
//! digits contributes nothing to the total and is recorded as a [`DataWarning`], as is a movie
//! release date that doesn't parse.
//!
//! # Examples
//!
//! ```no_run
//! # use treklist::{catalog::Catalog, reference::ReferenceStore};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ReferenceStore::open(ReferenceStore::bundled_path())?;
//! let catalog = Catalog::load(&store)?;
//! let stats = catalog.stats();
//! println!("{} episodes, {}", stats.episode_count, stats.runtime());
//! for warning in catalog.warnings() {
//!   eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
  log::{UserLog, WatchedSet},
  reference::ReferenceStore,
  runtime::{format_runtime, Runtime, RuntimeBreakdown},
};

use super::*;

/// A series together with its episodes in `(season, episode)` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesListing {
  /// The series row.
  pub series:   CatalogSeries,
  /// Its episodes.
  pub episodes: Vec<CatalogEpisode>,
}

/// Counts and total runtime across the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
  /// Number of series.
  pub series_count:          usize,
  /// Number of episodes across all series.
  pub episode_count:         usize,
  /// Number of movies.
  pub movie_count:           usize,
  /// Sum of every readable episode and movie runtime.
  pub total_runtime_minutes: u64,
}

impl CatalogStats {
  /// The total runtime as days, hours and minutes.
  pub fn runtime(&self) -> RuntimeBreakdown { format_runtime(self.total_runtime_minutes) }
}

/// A catalog row whose data couldn't be read. The rest of the catalog is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
  /// The runtime is neither `N/A` nor digit-bearing; it counts as zero.
  MalformedRuntime {
    /// Identifier of the row.
    imdb_id: String,
    /// The runtime as stored.
    runtime: String,
  },
  /// A movie release date isn't in `DD Mon YYYY` form; the movie sorts last.
  MalformedRelease {
    /// Identifier of the movie.
    imdb_id:  String,
    /// The release date as stored.
    released: String,
  },
}

impl Display for DataWarning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DataWarning::MalformedRuntime { imdb_id, runtime } =>
        write!(f, "{imdb_id}: malformed runtime {runtime:?}"),
      DataWarning::MalformedRelease { imdb_id, released } =>
        write!(f, "{imdb_id}: malformed release date {released:?}"),
    }
  }
}

/// How much of the catalog the user has watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchProgress {
  /// Episodes marked watched.
  pub episodes_watched: usize,
  /// Movies marked watched.
  pub movies_watched:   usize,
  /// Summed runtime of everything marked watched.
  pub watched_minutes:  u64,
  /// Log entries whose watched flag couldn't be read, counted as unwatched.
  pub unreadable:       usize,
}

/// Snapshot of the reference catalog with derived statistics.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  /// Series in catalog order, each with its episodes.
  series:   Vec<SeriesListing>,
  /// Movies in release order.
  movies:   Vec<CatalogMovie>,
  /// Derived counts and runtime.
  stats:    CatalogStats,
  /// Rows that failed to read cleanly.
  warnings: Vec<DataWarning>,
}

impl Catalog {
  /// Reads the whole catalog from `store` and computes its statistics.
  ///
  /// Only storage failures are errors. Malformed runtimes and release dates become
  /// [`DataWarning`]s, each also logged at `warn` level.
  pub fn load(store: &ReferenceStore) -> Result<Self> {
    let mut warnings = Vec::new();
    let mut total_runtime_minutes = 0u64;

    let mut series = Vec::new();
    for entry in store.list_series()? {
      let episodes = store.list_episodes(&entry.abbreviation)?;
      for episode in &episodes {
        total_runtime_minutes +=
          u64::from(runtime_minutes(&episode.imdb_id, &episode.runtime, &mut warnings));
      }
      series.push(SeriesListing { series: entry, episodes });
    }

    let mut dated = Vec::new();
    let mut undated = Vec::new();
    for movie in store.list_movies()? {
      total_runtime_minutes +=
        u64::from(runtime_minutes(&movie.imdb_id, &movie.runtime, &mut warnings));
      match movie.release_date() {
        Ok(date) => dated.push((date, movie)),
        Err(_) => {
          warn!("Movie {} has a malformed release date {:?}", movie.imdb_id, movie.released);
          warnings.push(DataWarning::MalformedRelease {
            imdb_id:  movie.imdb_id.clone(),
            released: movie.released.clone(),
          });
          undated.push(movie);
        },
      }
    }
    // Stable, so equal dates keep catalog order.
    dated.sort_by_key(|(date, _)| *date);
    let movies: Vec<CatalogMovie> =
      dated.into_iter().map(|(_, movie)| movie).chain(undated).collect();

    let stats = CatalogStats {
      series_count: series.len(),
      episode_count: series.iter().map(|s| s.episodes.len()).sum(),
      movie_count: movies.len(),
      total_runtime_minutes,
    };
    debug!(
      "Loaded catalog: {} series, {} episodes, {} movies, {} minutes, {} warnings",
      stats.series_count,
      stats.episode_count,
      stats.movie_count,
      stats.total_runtime_minutes,
      warnings.len()
    );

    Ok(Self { series, movies, stats, warnings })
  }

  /// Derived counts and runtime.
  pub fn stats(&self) -> CatalogStats { self.stats }

  /// Rows that failed to read cleanly during the load.
  pub fn warnings(&self) -> &[DataWarning] { &self.warnings }

  /// All series with their episodes, in catalog order.
  pub fn series(&self) -> &[SeriesListing] { &self.series }

  /// All movies, earliest release first.
  pub fn movies(&self) -> &[CatalogMovie] { &self.movies }

  /// The series with the given abbreviation.
  pub fn series_by_abbreviation(&self, abbreviation: &str) -> Option<&SeriesListing> {
    self.series.iter().find(|listing| listing.series.abbreviation == abbreviation)
  }

  /// Episodes of the series with the given abbreviation, empty if there's no such series.
  pub fn episodes(&self, abbreviation: &str) -> &[CatalogEpisode] {
    self.series_by_abbreviation(abbreviation).map(|listing| listing.episodes.as_slice()).unwrap_or(&[])
  }

  /// The episode with the given identifier, from any series.
  pub fn episode(&self, imdb_id: &str) -> Option<&CatalogEpisode> {
    self.series.iter().flat_map(|listing| &listing.episodes).find(|e| e.imdb_id == imdb_id)
  }

  /// The movie with the given identifier.
  pub fn movie(&self, imdb_id: &str) -> Option<&CatalogMovie> {
    self.movies.iter().find(|movie| movie.imdb_id == imdb_id)
  }

  /// Which catalog table `imdb_id` belongs to, if any.
  pub fn kind_of(&self, imdb_id: &str) -> Option<PosterKind> {
    if self.series.iter().any(|listing| listing.series.imdb_id == imdb_id) {
      Some(PosterKind::Series)
    } else if self.episode(imdb_id).is_some() {
      Some(PosterKind::Episode)
    } else if self.movie(imdb_id).is_some() {
      Some(PosterKind::Movie)
    } else {
      None
    }
  }

  /// Tallies the episodes and movies `log` marks as watched.
  ///
  /// Only the watched flags are read. An entry with an unreadable flag counts as unwatched and
  /// shows up in [`WatchProgress::unreadable`]; only storage failures are errors.
  pub fn progress(&self, log: &UserLog) -> Result<WatchProgress> {
    let WatchedSet { watched, unreadable } = log.watched_set()?;

    let mut progress = WatchProgress { unreadable: unreadable.len(), ..Default::default() };
    for episode in self.series.iter().flat_map(|listing| &listing.episodes) {
      if watched.contains(&episode.imdb_id) {
        progress.episodes_watched += 1;
        progress.watched_minutes += u64::from(quiet_minutes(&episode.runtime));
      }
    }
    for movie in &self.movies {
      if watched.contains(&movie.imdb_id) {
        progress.movies_watched += 1;
        progress.watched_minutes += u64::from(quiet_minutes(&movie.runtime));
      }
    }
    Ok(progress)
  }
}

/// Minutes for one row's runtime, recording a warning if it's malformed.
fn runtime_minutes(imdb_id: &str, runtime: &str, warnings: &mut Vec<DataWarning>) -> u32 {
  match runtime.parse::<Runtime>() {
    Ok(runtime) => runtime.minutes(),
    Err(_) => {
      warn!("Catalog item {imdb_id} has a malformed runtime {runtime:?}");
      warnings.push(DataWarning::MalformedRuntime {
        imdb_id: imdb_id.to_string(),
        runtime: runtime.to_string(),
      });
      0
    },
  }
}

/// Minutes for a runtime already reported during the load.
fn quiet_minutes(runtime: &str) -> u32 { runtime.parse::<Runtime>().map(Runtime::minutes).unwrap_or(0) }

//! The bundled, read-only catalog database.
//!
//! The reference database ships next to the executable and holds three tables:
//! - `series`: one row per series, keyed by IMDb identifier and abbreviation
//! - `episodes`: every episode of every series, keyed by parent abbreviation, season and episode
//! - `mov`: the feature films
//!
//! It is opened once with SQLite's read-only flags and never written to. Every query is
//! parameterized, including the choice of episode namespace.
//!
//! # Examples
//!
//! ```no_run
//! # use treklist::reference::ReferenceStore;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ReferenceStore::open(ReferenceStore::bundled_path())?;
//! for series in store.list_series()? {
//!   let episodes = store.list_episodes(&series.abbreviation)?;
//!   println!("{}: {} episodes", series.title, episodes.len());
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// Schema of the reference database.
pub const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/reference.sql"));

/// Tables the catalog can't do without.
const REQUIRED_TABLES: [&str; 3] = ["series", "episodes", "mov"];

/// Read-only handle on the catalog database.
pub struct ReferenceStore {
  /// SQLite connection opened with `SQLITE_OPEN_READ_ONLY`.
  conn: Connection,
}

impl ReferenceStore {
  /// Opens the catalog database at `path` read-only.
  ///
  /// Fails if the file doesn't exist, isn't a SQLite database, or lacks one of the catalog
  /// tables. Any of these is fatal for the application.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Opening reference database at {}", path.display());
    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    for table in REQUIRED_TABLES {
      let present: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
      )?;
      if !present {
        return Err(TrekError::MissingReferenceTable(table));
      }
    }

    Ok(Self { conn })
  }

  /// Location of the catalog bundled with the application: `data/treklist.db` beside the
  /// running executable, or under the working directory if that can't be determined.
  pub fn bundled_path() -> PathBuf {
    std::env::current_exe()
      .ok()
      .and_then(|exe| exe.parent().map(Path::to_path_buf))
      .unwrap_or_else(|| PathBuf::from("."))
      .join("data")
      .join("treklist.db")
  }

  /// All series, in catalog order.
  pub fn list_series(&self) -> Result<Vec<CatalogSeries>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT imdb_id, title, abbreviation, year, total_seasons
       FROM series
       ORDER BY rowid",
    )?;
    let series = stmt
      .query_map([], |row| {
        Ok(CatalogSeries {
          imdb_id:       row.get(0)?,
          title:         row.get(1)?,
          abbreviation:  row.get(2)?,
          year:          row.get(3)?,
          total_seasons: row.get(4)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    trace!("Read {} series", series.len());
    Ok(series)
  }

  /// Episodes of the series with the given abbreviation, ordered by season then episode.
  ///
  /// An abbreviation the catalog doesn't know yields no episodes.
  pub fn list_episodes(&self, abbreviation: &str) -> Result<Vec<CatalogEpisode>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT imdb_id, series, season, episode, title, plot, released, runtime
       FROM episodes
       WHERE series = ?1
       ORDER BY season ASC, episode ASC",
    )?;
    let episodes = stmt
      .query_map([abbreviation], |row| {
        Ok(CatalogEpisode {
          imdb_id:      row.get(0)?,
          abbreviation: row.get(1)?,
          season:       row.get(2)?,
          episode:      row.get(3)?,
          title:        row.get(4)?,
          plot:         row.get(5)?,
          released:     row.get(6)?,
          runtime:      row.get(7)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    trace!("Read {} episodes for {abbreviation}", episodes.len());
    Ok(episodes)
  }

  /// All movies, in catalog order.
  pub fn list_movies(&self) -> Result<Vec<CatalogMovie>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT imdb_id, title, released, plot, director, runtime
       FROM mov
       ORDER BY rowid",
    )?;
    let movies = stmt
      .query_map([], |row| {
        Ok(CatalogMovie {
          imdb_id:  row.get(0)?,
          title:    row.get(1)?,
          released: row.get(2)?,
          plot:     row.get(3)?,
          director: row.get(4)?,
          runtime:  row.get(5)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    trace!("Read {} movies", movies.len());
    Ok(movies)
  }

  /// Poster image bytes for the item `imdb_id` in the table named by `kind`.
  ///
  /// Returns [`TrekError::NotFound`] if there's no such item or it has no poster.
  pub fn poster(&self, kind: PosterKind, imdb_id: &str) -> Result<Vec<u8>> {
    let sql = match kind {
      PosterKind::Series => "SELECT poster FROM series WHERE imdb_id = ?1",
      PosterKind::Episode => "SELECT poster FROM episodes WHERE imdb_id = ?1",
      PosterKind::Movie => "SELECT poster FROM mov WHERE imdb_id = ?1",
    };
    let poster: Option<Option<Vec<u8>>> =
      self.conn.prepare_cached(sql)?.query_row([imdb_id], |row| row.get(0)).optional()?;
    poster.flatten().ok_or(TrekError::NotFound)
  }
}

//! Catalog record types.
//!
//! These mirror the rows of the bundled reference database. They are read once and never
//! mutated; poster blobs are left out and fetched on demand through
//! [`ReferenceStore::poster`](crate::reference::ReferenceStore::poster).

use super::*;

lazy_static! {
  /// `tt` followed by at least seven digits.
  static ref IMDB_ID: Regex = Regex::new(r"^tt[0-9]{7,}$").unwrap();
}

/// Format used by the catalog for movie release dates, e.g. `"08 Dec 1979"`.
pub const RELEASE_DATE_FORMAT: &str = "%d %b %Y";

/// Checks that `imdb_id` is a well-formed catalog identifier.
///
/// ```
/// use treklist::model::validate_identifier;
///
/// assert!(validate_identifier("tt0060028").is_ok());
/// assert!(validate_identifier("0060028").is_err());
/// ```
pub fn validate_identifier(imdb_id: &str) -> Result<&str> {
  if IMDB_ID.is_match(imdb_id) {
    Ok(imdb_id)
  } else {
    Err(TrekError::InvalidIdentifier(imdb_id.to_string()))
  }
}

/// A series in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeries {
  /// IMDb identifier of the series.
  pub imdb_id:       String,
  /// Display title.
  pub title:         String,
  /// Short code such as `TOS`, used as the namespace for the series' episodes.
  pub abbreviation:  String,
  /// Year range the series aired, e.g. `"1966–1969"`.
  pub year:          String,
  /// Number of seasons.
  pub total_seasons: u32,
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEpisode {
  /// IMDb identifier of the episode.
  pub imdb_id:      String,
  /// Abbreviation of the parent series.
  pub abbreviation: String,
  /// Season number, starting at 1.
  pub season:       u32,
  /// Episode number within the season, starting at 1.
  pub episode:      u32,
  /// Episode title.
  pub title:        String,
  /// Plot summary.
  pub plot:         String,
  /// Release date as written in the catalog.
  pub released:     String,
  /// Runtime as written in the catalog, `"N/A"` or `"<n> min"`.
  pub runtime:      String,
}

impl CatalogEpisode {
  /// Short `S01E03` style label.
  pub fn code(&self) -> String { format!("S{:02}E{:02}", self.season, self.episode) }
}

/// A feature film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMovie {
  /// IMDb identifier of the movie.
  pub imdb_id:  String,
  /// Movie title.
  pub title:    String,
  /// Release date as written in the catalog, in [`RELEASE_DATE_FORMAT`].
  pub released: String,
  /// Plot summary.
  pub plot:     String,
  /// Director credit.
  pub director: String,
  /// Runtime as written in the catalog.
  pub runtime:  String,
}

impl CatalogMovie {
  /// Parses [`CatalogMovie::released`] into a calendar date.
  pub fn release_date(&self) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(self.released.trim(), RELEASE_DATE_FORMAT)?)
  }
}

/// Which catalog table an identifier (and its poster) lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosterKind {
  /// The `series` table.
  Series,
  /// The `episodes` table.
  Episode,
  /// The `mov` table.
  Movie,
}

//! The per-user settings file.
//!
//! Settings live in `settings.toml` in the data directory. A commented default is written there
//! on first run (see [`DEFAULT_SETTINGS`]); afterwards the file belongs to the user. Missing keys
//! take their defaults, unknown keys are rejected so typos don't go unnoticed.

use chrono::format::{Item, StrftimeItems};

use super::*;

/// The settings template bundled with the application.
pub const DEFAULT_SETTINGS: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/settings.toml"));

/// Everything configurable in TrekList.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  /// How listings are shown.
  pub display: DisplaySettings,
  /// How the watched log is updated.
  pub log:     LogSettings,
}

/// Listing and poster options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
  /// Leave watched episodes and movies out of listings.
  pub hide_watched: bool,
  /// Poster width in pixels.
  pub poster_width: u32,
  /// `strftime` pattern for last-watched dates.
  pub date_format:  String,
}

impl Default for DisplaySettings {
  fn default() -> Self {
    Self { hide_watched: false, poster_width: 300, date_format: "%Y-%m-%d".to_string() }
  }
}

/// Watched-log options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
  /// Record today as the last-watched date when marking something watched.
  pub stamp_on_watch: bool,
}

impl Default for LogSettings {
  fn default() -> Self { Self { stamp_on_watch: true } }
}

impl Settings {
  /// Reads and validates the settings file at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading settings from {}", path.display());
    fs::read_to_string(path)?.parse()
  }

  /// Checks values the TOML layout alone can't constrain.
  fn validate(self) -> Result<Self> {
    if self.display.poster_width == 0 {
      return Err(TrekError::Config("display.poster_width must be at least 1".to_string()));
    }
    let date_format = &self.display.date_format;
    if date_format.trim().is_empty()
      || StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error))
    {
      return Err(TrekError::Config(format!("display.date_format {date_format:?} is not valid")));
    }
    Ok(self)
  }
}

impl FromStr for Settings {
  type Err = TrekError;

  fn from_str(s: &str) -> Result<Self> { toml::from_str::<Settings>(s)?.validate() }
}

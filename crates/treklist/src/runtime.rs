//! Runtime strings and runtime totals.
//!
//! The catalog records runtimes as free text: `"N/A"` when unknown, otherwise something like
//! `"45 min"`. [`Runtime`] turns those into minutes and [`RuntimeBreakdown`] splits a total into
//! days, hours and minutes for display.

use super::*;

lazy_static! {
  /// Everything that isn't an ASCII digit.
  static ref NON_DIGITS: Regex = Regex::new(r"[^0-9]").unwrap();
}

/// Catalog marker for an unknown runtime.
pub const UNAVAILABLE: &str = "N/A";

/// Minutes per day.
const MINUTES_PER_DAY: u64 = 1440;
/// Minutes per hour.
const MINUTES_PER_HOUR: u64 = 60;

/// A parsed catalog runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
  /// The catalog has no runtime for this item.
  Unavailable,
  /// A known runtime.
  Minutes(u32),
}

impl Runtime {
  /// Minutes this runtime contributes to a total. Unavailable runtimes contribute nothing.
  pub fn minutes(self) -> u32 {
    match self {
      Runtime::Unavailable => 0,
      Runtime::Minutes(minutes) => minutes,
    }
  }
}

impl FromStr for Runtime {
  type Err = TrekError;

  /// Strips every non-digit and reads what's left as minutes, so `"45 min"` is 45.
  ///
  /// `"N/A"` is [`Runtime::Unavailable`]. A string with no digits at all is malformed.
  fn from_str(s: &str) -> Result<Self> {
    if s.trim() == UNAVAILABLE {
      return Ok(Runtime::Unavailable);
    }
    let digits = NON_DIGITS.replace_all(s, "");
    if digits.is_empty() {
      return Err(TrekError::MalformedRuntime(s.to_string()));
    }
    digits.parse().map(Runtime::Minutes).map_err(|_| TrekError::MalformedRuntime(s.to_string()))
  }
}

/// A minute total split into whole days, hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeBreakdown {
  /// Whole days.
  pub days:    u64,
  /// Whole hours left after the days.
  pub hours:   u64,
  /// Minutes left after the hours.
  pub minutes: u64,
}

impl Display for RuntimeBreakdown {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} days, {} hours, {} minutes", self.days, self.hours, self.minutes)
  }
}

/// Splits `total_minutes` into days, hours and minutes, flooring at each step.
///
/// ```
/// use treklist::runtime::{format_runtime, RuntimeBreakdown};
///
/// assert_eq!(format_runtime(1500), RuntimeBreakdown { days: 1, hours: 1, minutes: 0 });
/// ```
pub fn format_runtime(total_minutes: u64) -> RuntimeBreakdown {
  let days = total_minutes / MINUTES_PER_DAY;
  let rest = total_minutes % MINUTES_PER_DAY;
  RuntimeBreakdown { days, hours: rest / MINUTES_PER_HOUR, minutes: rest % MINUTES_PER_HOUR }
}

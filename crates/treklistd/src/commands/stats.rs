//! Module for the catalog summary.

use treklist::runtime::format_runtime;

use super::*;

/// Function for the [`Commands::Stats`] in the CLI.
pub fn stats<I: UserInteraction>(interaction: &I, session: &Session) -> Result<()> {
  let catalog = session.catalog();
  let stats = catalog.stats();
  let progress = catalog.progress(session.log())?;

  interaction.reply(ResponseContent::Info(&format!(
    "Catalog: {} series, {} episodes, {} movies",
    stats.series_count, stats.episode_count, stats.movie_count
  )))?;
  interaction.reply(ResponseContent::Info(&format!("Total runtime: {}", stats.runtime())))?;
  interaction.reply(ResponseContent::Info(&format!(
    "Watched: {} of {} episodes, {} of {} movies ({})",
    progress.episodes_watched,
    stats.episode_count,
    progress.movies_watched,
    stats.movie_count,
    format_runtime(progress.watched_minutes)
  )))?;

  if progress.unreadable > 0 {
    interaction.reply(ResponseContent::Warning(&format!(
      "{} log entries couldn't be read and count as unwatched",
      progress.unreadable
    )))?;
  }
  for warning in catalog.warnings() {
    interaction.reply(ResponseContent::Warning(&warning.to_string()))?;
  }
  Ok(())
}

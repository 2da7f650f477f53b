//! Module for listing the catalog.

use console::style;

use super::*;

/// Function for the [`Commands::Series`] in the CLI.
pub fn series<I: UserInteraction>(interaction: &I, session: &Session) -> Result<()> {
  let listings = session.catalog().series();
  for (index, listing) in listings.iter().enumerate() {
    let series = &listing.series;
    interaction.reply(ResponseContent::Line(&format!(
      "{} {:<4} {} ({}, {} seasons, {} episodes)",
      item_prefix(index, listings.len()),
      style(&series.abbreviation).cyan().bold(),
      series.title,
      series.year,
      series.total_seasons,
      listing.episodes.len()
    )))?;
  }
  Ok(())
}

/// Function for the [`Commands::Episodes`] in the CLI.
pub fn episodes<I: UserInteraction>(
  interaction: &I,
  session: &Session,
  abbreviation: &str,
) -> Result<()> {
  let Some(listing) = session.catalog().series_by_abbreviation(abbreviation) else {
    interaction.reply(ResponseContent::Warning(&format!("No series abbreviated {abbreviation:?}")))?;
    return Ok(());
  };

  let hide_watched = session.settings().display.hide_watched;
  let mut rows = Vec::new();
  for episode in &listing.episodes {
    let (watched, last) = row_state(session, &episode.imdb_id)?;
    if hide_watched && watched == Some(true) {
      continue;
    }
    rows.push(format!(
      "{} {} {:<40} {:>8}  {}  {}",
      row_mark(watched),
      style(episode.code()).cyan(),
      episode.title,
      episode.runtime,
      last,
      style(&episode.imdb_id).dim()
    ));
  }

  interaction.reply(ResponseContent::Info(&format!(
    "{} ({} of {} episodes shown)",
    listing.series.title,
    rows.len(),
    listing.episodes.len()
  )))?;
  for (index, row) in rows.iter().enumerate() {
    interaction.reply(ResponseContent::Line(&format!("{} {row}", item_prefix(index, rows.len()))))?;
  }
  Ok(())
}

/// Function for the [`Commands::Movies`] in the CLI.
pub fn movies<I: UserInteraction>(interaction: &I, session: &Session) -> Result<()> {
  let hide_watched = session.settings().display.hide_watched;
  let mut rows = Vec::new();
  for movie in session.catalog().movies() {
    let (watched, last) = row_state(session, &movie.imdb_id)?;
    if hide_watched && watched == Some(true) {
      continue;
    }
    rows.push(format!(
      "{} {:<45} {:<12} {:>8}  {}  {}",
      row_mark(watched),
      movie.title,
      movie.released,
      movie.runtime,
      last,
      style(&movie.imdb_id).dim()
    ));
  }

  for (index, row) in rows.iter().enumerate() {
    interaction.reply(ResponseContent::Line(&format!("{} {row}", item_prefix(index, rows.len()))))?;
  }
  Ok(())
}

//! Module for reading and writing the watched log.

use super::*;

/// Function for the [`Commands::Status`] in the CLI.
pub fn status<I: UserInteraction>(interaction: &I, session: &Session, imdb_id: &str) -> Result<()> {
  let title = item_title(session, imdb_id).unwrap_or_else(|| "not in the catalog".to_string());
  interaction.reply(ResponseContent::Info(&format!("{imdb_id}: {title}")))?;

  match session.log().entry(imdb_id)? {
    Some(entry) => {
      let state = if entry.watched { "watched" } else { "not watched" };
      interaction.reply(ResponseContent::Line(&format!(
        "{} {state}, last watched {}",
        watched_mark(entry.watched),
        format_date(session, entry.last_watched)
      )))?;
    },
    None => interaction.reply(ResponseContent::Line(&format!(
      "{} not watched, no log entry yet",
      watched_mark(false)
    )))?,
  }
  Ok(())
}

/// Function for the [`Commands::Get`] in the CLI.
pub fn get<I: UserInteraction>(
  interaction: &I,
  session: &Session,
  imdb_id: &str,
  field: &str,
) -> Result<()> {
  let field: LogField = field.parse()?;
  let value = session.log().get(imdb_id, field)?;
  interaction.reply(ResponseContent::Line(&value.to_string()))
}

/// Function for the [`Commands::Set`] in the CLI.
pub fn set<I: UserInteraction>(
  interaction: &I,
  session: &mut Session,
  imdb_id: &str,
  field: &str,
  value: &str,
) -> Result<()> {
  let field: LogField = field.parse()?;
  let value = LogValue::parse(field, value)?;
  session.log_mut().set(imdb_id, value)?;
  interaction.reply(ResponseContent::Success(&format!("Set {field} of {imdb_id} to {value}")))
}

/// Function for the [`Commands::Watch`] and [`Commands::Unwatch`] in the CLI.
///
/// Marking an item watched also records today's date when `log.stamp_on_watch` is set.
pub fn watch<I: UserInteraction>(
  interaction: &I,
  session: &mut Session,
  imdb_id: &str,
  watched: bool,
) -> Result<()> {
  validate_identifier(imdb_id)?;
  if item_title(session, imdb_id).is_none() {
    interaction.reply(ResponseContent::Warning(&format!("{imdb_id} is not in the catalog")))?;
  }

  let stamp = watched && session.settings().log.stamp_on_watch;
  session.log_mut().set_watched(imdb_id, watched)?;
  if stamp {
    let today = chrono::Local::now().date_naive();
    session.log_mut().set_last_watched(imdb_id, Some(today))?;
  }

  let message =
    if watched { format!("Marked {imdb_id} watched") } else { format!("Marked {imdb_id} not watched") };
  interaction.reply(ResponseContent::Success(&message))
}

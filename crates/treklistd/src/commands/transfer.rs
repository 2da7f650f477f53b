//! Module for exporting and importing the watched log.

use std::path::Path;

use super::*;

/// Function for the [`Commands::Export`] in the CLI.
pub fn export<I: UserInteraction>(interaction: &I, session: &Session, path: &Path) -> Result<()> {
  session.save_log_as(path)?;
  interaction
    .reply(ResponseContent::Success(&format!("Saved your watched log to {}", path.display())))
}

/// Function for the [`Commands::Import`] in the CLI.
///
/// The session is consumed by the import. This process exits right after, so the next launch
/// is the restart that picks up the imported log.
pub fn import<I: UserInteraction>(interaction: &I, session: Session, path: &Path) -> Result<()> {
  if !interaction.confirm(&format!(
    "Replace your watched log with {}? Your current log will be overwritten.",
    path.display()
  ))? {
    interaction.reply(ResponseContent::Info("Import cancelled"))?;
    return Ok(());
  }

  let restart = session.load_log_from(path)?;
  interaction.reply(ResponseContent::Success(&format!(
    "Imported {} into {}; it takes effect the next time TrekList starts",
    path.display(),
    restart.log_path().display()
  )))
}

//! Module for extracting poster images.

use std::path::Path;

use treklist::error::TrekError;

use super::*;

/// Function for the [`Commands::Poster`] in the CLI.
pub fn poster<I: UserInteraction>(
  interaction: &I,
  session: &Session,
  imdb_id: &str,
  out: &Path,
) -> Result<()> {
  validate_identifier(imdb_id)?;
  let kind = session.catalog().kind_of(imdb_id).ok_or(TrekError::NotFound)?;
  let bytes = session.reference().poster(kind, imdb_id)?;
  std::fs::write(out, &bytes)?;
  interaction.reply(ResponseContent::Success(&format!(
    "Wrote {} byte poster for {imdb_id} to {}",
    bytes.len(),
    out.display()
  )))
}

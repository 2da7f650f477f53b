use std::fs;

use treklist::settings::{Settings, DEFAULT_SETTINGS};

use super::*;

#[traced_test]
#[test]
fn test_start_bootstraps_data_dir() {
  let (paths, _dir) = setup_paths();
  assert!(!paths.data_dir.exists());

  let session = Session::start(paths.clone()).unwrap();
  assert!(paths.data_dir.is_dir());
  assert!(paths.log_path().exists());
  assert_eq!(fs::read_to_string(paths.settings_path()).unwrap(), DEFAULT_SETTINGS);
  assert_eq!(session.settings(), &Settings::default());
  assert_eq!(session.catalog().stats().episode_count, 35);
  assert!(session.log().entries().unwrap().is_empty());
}

#[traced_test]
#[test]
fn test_start_keeps_existing_files() {
  let (paths, _dir) = setup_paths();
  {
    let mut session = Session::start(paths.clone()).unwrap();
    session.log_mut().set_watched("tt0708447", true).unwrap();
  }
  fs::write(paths.settings_path(), "[display]\nhide_watched = true\n").unwrap();

  let session = Session::start(paths.clone()).unwrap();
  assert!(session.log().watched("tt0708447").unwrap());
  assert!(session.settings().display.hide_watched);
  assert_eq!(
    fs::read_to_string(paths.settings_path()).unwrap(),
    "[display]\nhide_watched = true\n"
  );
}

#[traced_test]
#[test]
fn test_missing_reference_is_fatal() {
  let (paths, dir) = setup_paths();
  let paths = paths.with_reference(dir.path().join("missing.db"));

  assert!(matches!(Session::start(paths), Err(TrekError::Sqlite(_))));
}

#[traced_test]
#[test]
fn test_corrupt_reference_is_fatal() {
  let (paths, dir) = setup_paths();
  let corrupt = dir.path().join("corrupt.db");
  fs::write(&corrupt, b"this is not a database, it is a tribble").unwrap();

  assert!(Session::start(paths.with_reference(corrupt)).is_err());
}

#[traced_test]
#[test]
fn test_malformed_settings_are_fatal() {
  let (paths, _dir) = setup_paths();
  fs::create_dir_all(&paths.data_dir).unwrap();
  fs::write(paths.settings_path(), "[display]\nhide_watched = maybe\n").unwrap();

  assert!(matches!(Session::start(paths.clone()), Err(TrekError::TomlDe(_))));
  // Bootstrap didn't replace the user's file
  assert_eq!(
    fs::read_to_string(paths.settings_path()).unwrap(),
    "[display]\nhide_watched = maybe\n"
  );
}

#[traced_test]
#[test]
fn test_save_then_load_round_trip() -> anyhow::Result<()> {
  let (paths, dir) = setup_paths();
  let mut session = Session::start(paths)?;
  session.log_mut().set_watched("tt0708400", true)?;
  session.log_mut().set_last_watched("tt0708400", Some(date(2024, 5, 1)))?;
  session.log_mut().set_last_watched("tt0708401", Some(date(2023, 1, 2)))?;
  session.log_mut().set_watched("tt0084726", true)?;
  session.log_mut().set_watched("tt0079945", false)?;
  let saved = session.log().entries()?;

  let backup = dir.path().join("backup.db");
  session.save_log_as(&backup)?;
  // Later edits don't leak into the backup
  session.log_mut().set_watched("tt0708402", true)?;

  let (fresh_paths, _fresh_dir) = setup_paths();
  let fresh = Session::start(fresh_paths.clone())?;
  assert!(fresh.log().entries()?.is_empty());

  let restart = fresh.load_log_from(&backup)?;
  assert_eq!(restart.log_path(), fresh_paths.log_path());

  let restarted = Session::start(fresh_paths)?;
  assert_eq!(restarted.log().entries()?, saved);
  assert_eq!(restarted.log().last_watched("tt0708400")?, Some(date(2024, 5, 1)));
  assert!(!restarted.log().watched("tt0708402")?);
  Ok(())
}

#[traced_test]
#[test]
fn test_load_rejects_non_log_file() {
  let (paths, dir) = setup_paths();
  let mut session = Session::start(paths.clone()).unwrap();
  session.log_mut().set_watched("tt0708447", true).unwrap();

  let bogus = dir.path().join("bogus.db");
  fs::write(&bogus, "watched everything").unwrap();
  assert!(matches!(session.load_log_from(&bogus), Err(TrekError::InvalidLogFile(_))));

  // The live log is untouched
  let session = Session::start(paths).unwrap();
  assert!(session.log().watched("tt0708447").unwrap());
}

#[traced_test]
#[test]
fn test_load_rejects_log_with_repeated_entries() {
  let (paths, dir) = setup_paths();
  let mut session = Session::start(paths.clone()).unwrap();
  session.log_mut().set_watched("tt0708447", true).unwrap();

  let legacy = dir.path().join("legacy.db");
  Connection::open(&legacy)
    .unwrap()
    .execute_batch(
      "CREATE TABLE log (imdb_id TEXT, watched REAL, last_watched TEXT);
       INSERT INTO log VALUES ('tt0708400', 1.0, NULL);
       INSERT INTO log VALUES ('tt0708400', 0.0, '2021-01-01');",
    )
    .unwrap();
  assert!(matches!(session.load_log_from(&legacy), Err(TrekError::InvalidLogFile(p)) if p == legacy));

  // The live log still opens and keeps its entries
  let session = Session::start(paths).unwrap();
  assert!(session.log().watched("tt0708447").unwrap());
  assert!(!session.log().watched("tt0708400").unwrap());
}

#[traced_test]
#[test]
fn test_save_to_missing_directory_fails_cleanly() {
  let (paths, dir) = setup_paths();
  let session = Session::start(paths).unwrap();

  let destination = dir.path().join("no").join("such").join("dir").join("backup.db");
  assert!(matches!(session.save_log_as(&destination), Err(TrekError::Io(_))));
  assert!(!destination.exists());
}

#[traced_test]
#[test]
fn test_reload_catalog() {
  let (paths, _dir) = setup_paths();
  let reference = paths.reference.clone();
  let mut session = Session::start(paths).unwrap();
  assert_eq!(session.catalog().stats().movie_count, 2);

  ReferenceBuilder::create(&reference).movie(
    "tt0088170",
    "Star Trek III: The Search for Spock",
    "01 Jun 1984",
    "105 min",
  );
  session.reload_catalog().unwrap();
  assert_eq!(session.catalog().stats().movie_count, 3);
  assert_eq!(session.catalog().stats().total_runtime_minutes, 1785 + 105);
}

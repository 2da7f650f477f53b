use treklist::log::{Get, Set};

use super::*;

#[traced_test]
#[test]
fn test_unwritten_identifier_reads_defaults() {
  let (log, _path, _dir) = setup_log();

  assert_eq!(log.get("tt0708447", LogField::Watched).unwrap(), LogValue::Watched(false));
  assert_eq!(log.get("tt0708447", LogField::LastWatched).unwrap(), LogValue::LastWatched(None));
  assert!(log.entry("tt0708447").unwrap().is_none());
  assert!(log.entries().unwrap().is_empty());
}

#[traced_test]
#[test]
fn test_set_then_get_watched() {
  let (mut log, _path, _dir) = setup_log();

  log.set("tt0708447", LogValue::Watched(true)).unwrap();
  assert_eq!(log.get("tt0708447", LogField::Watched).unwrap(), LogValue::Watched(true));
  assert!(log.watched("tt0708447").unwrap());

  log.set_watched("tt0708447", false).unwrap();
  assert!(!log.watched("tt0708447").unwrap());
}

#[traced_test]
#[test]
fn test_set_then_clear_last_watched() {
  let (mut log, _path, _dir) = setup_log();

  let value = LogValue::parse(LogField::LastWatched, "2024-05-01").unwrap();
  log.set("tt0708447", value).unwrap();
  assert_eq!(log.last_watched("tt0708447").unwrap(), Some(date(2024, 5, 1)));

  let clear = LogValue::parse(LogField::LastWatched, treklist::log::CLEAR).unwrap();
  log.set("tt0708447", clear).unwrap();
  assert_eq!(log.get("tt0708447", LogField::LastWatched).unwrap(), LogValue::LastWatched(None));
}

#[traced_test]
#[test]
fn test_first_write_fills_other_field_with_default() {
  let (mut log, _path, _dir) = setup_log();

  log.set_last_watched("tt0708447", Some(date(2023, 12, 24))).unwrap();
  assert!(!log.watched("tt0708447").unwrap());

  log.set_watched("tt0060028", true).unwrap();
  assert_eq!(log.last_watched("tt0060028").unwrap(), None);

  // Updating one field leaves the other alone
  log.set_watched("tt0708447", true).unwrap();
  assert_eq!(log.entry("tt0708447").unwrap().unwrap().last_watched, Some(date(2023, 12, 24)));
}

#[traced_test]
#[test]
fn test_repeated_set_keeps_one_row() {
  let (mut log, path, _dir) = setup_log();

  log.set_watched("tt0708447", true).unwrap();
  log.set_watched("tt0708447", true).unwrap();
  log.set_last_watched("tt0708447", Some(date(2024, 1, 1))).unwrap();

  assert_eq!(log.entries().unwrap().len(), 1);
  let rows: i64 = Connection::open(&path)
    .unwrap()
    .query_row("SELECT COUNT(*) FROM log WHERE imdb_id = ?1", ["tt0708447"], |row| row.get(0))
    .unwrap();
  assert_eq!(rows, 1);
}

#[traced_test]
#[test]
fn test_malformed_identifier_is_rejected() {
  let (mut log, _path, _dir) = setup_log();

  for bad in ["", "708447", "tt708", "tt0708447'; DELETE FROM log; --"] {
    assert!(matches!(log.set_watched(bad, true), Err(TrekError::InvalidIdentifier(_))));
    assert!(matches!(log.get(bad, LogField::Watched), Err(TrekError::InvalidIdentifier(_))));
    assert!(matches!(log.entry(bad), Err(TrekError::InvalidIdentifier(_))));
  }
  assert!(log.entries().unwrap().is_empty());
}

#[traced_test]
#[test]
fn test_malformed_field_is_rejected() {
  assert!(matches!("last-watched".parse::<LogField>(), Err(TrekError::InvalidField(_))));
  assert!(matches!("".parse::<LogField>(), Err(TrekError::InvalidField(_))));
}

#[traced_test]
#[test]
fn test_instructions() {
  let (mut log, _path, _dir) = setup_log();

  Set::watched("tt0708447", true).execute(&mut log).unwrap();
  Set::last_watched("tt0708447", Some(date(2024, 5, 1))).execute(&mut log).unwrap();

  let watched = Get::field("tt0708447", LogField::Watched).execute(&mut log).unwrap();
  assert_eq!(watched.as_watched(), Some(true));
  let last = Get::field("tt0708447", LogField::LastWatched).execute(&mut log).unwrap();
  assert_eq!(last.as_last_watched(), Some(date(2024, 5, 1)));

  let result = Set::watched("nope", true).execute(&mut log);
  assert!(matches!(result, Err(TrekError::InvalidIdentifier(_))));
}

#[traced_test]
#[test]
fn test_get_through_shared_borrow() {
  let (mut log, _path, _dir) = setup_log();
  log.set_watched("tt0708447", true).unwrap();

  let log = &log;
  let value = Get::field("tt0708447", LogField::Watched).read(log).unwrap();
  assert_eq!(value, LogValue::Watched(true));
  let unset = Get::field("tt0708448", LogField::LastWatched).read(log).unwrap();
  assert_eq!(unset, LogValue::LastWatched(None));
}

#[traced_test]
#[test]
fn test_entries_persist_across_reopen() {
  let (mut log, path, _dir) = setup_log();
  log.set_watched("tt0708447", true).unwrap();
  log.set_last_watched("tt0708447", Some(date(2024, 5, 1))).unwrap();
  log.set_watched("tt0060028", false).unwrap();
  let before = log.entries().unwrap();
  drop(log);

  let log = UserLog::open(&path).unwrap();
  assert_eq!(log.entries().unwrap(), before);
  assert_eq!(before.iter().map(|e| e.imdb_id.as_str()).collect::<Vec<_>>(), vec![
    "tt0060028",
    "tt0708447"
  ]);
}

#[traced_test]
#[test]
fn test_legacy_null_values_read_as_defaults() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("log.db");
  {
    // Layout written by older releases: no primary key, nothing NOT NULL
    let conn = Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE log (imdb_id TEXT, watched REAL, last_watched TEXT);
         INSERT INTO log VALUES ('tt0708401', NULL, NULL);
         INSERT INTO log VALUES ('tt0708402', 1.0, 'NaT');
         INSERT INTO log VALUES ('tt0708403', 0.0, '2022-03-04 00:00:00');
         INSERT INTO log VALUES ('tt0708404', 'nan', '');",
      )
      .unwrap();
  }

  let mut log = UserLog::open(&path).unwrap();
  assert!(!log.watched("tt0708401").unwrap());
  assert_eq!(log.last_watched("tt0708401").unwrap(), None);
  assert!(log.watched("tt0708402").unwrap());
  assert_eq!(log.last_watched("tt0708402").unwrap(), None);
  assert!(!log.watched("tt0708403").unwrap());
  assert_eq!(log.last_watched("tt0708403").unwrap(), Some(date(2022, 3, 4)));
  assert!(!log.watched("tt0708404").unwrap());
  assert_eq!(log.last_watched("tt0708404").unwrap(), None);

  let entries = log.entries().unwrap();
  assert_eq!(entries.len(), 4);
  assert!(!entries[0].watched);

  // Upserts work against the old layout too
  log.set_watched("tt0708401", true).unwrap();
  log.set_watched("tt0708405", true).unwrap();
  assert!(log.watched("tt0708401").unwrap());
  assert_eq!(log.entries().unwrap().len(), 5);
}

#[traced_test]
#[test]
fn test_unreadable_stored_value_is_reported() {
  let (log, path, _dir) = setup_log();
  Connection::open(&path)
    .unwrap()
    .execute("INSERT INTO log VALUES ('tt0708447', 1, 'stardate 41153.7')", [])
    .unwrap();

  assert!(log.watched("tt0708447").unwrap());
  assert!(matches!(
    log.last_watched("tt0708447"),
    Err(TrekError::InvalidLogValue { field: LogField::LastWatched, .. })
  ));
}

#[traced_test]
#[test]
fn test_incompatible_log_table_is_rejected() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("log.db");
  Connection::open(&path).unwrap().execute_batch("CREATE TABLE log (id INTEGER, seen TEXT);").unwrap();

  assert!(matches!(UserLog::open(&path), Err(TrekError::InvalidLogFile(p)) if p == path));
}

#[traced_test]
#[test]
fn test_non_database_file_is_rejected() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("log.db");
  std::fs::write(&path, "Captain's log, supplemental. This is not SQLite at all.").unwrap();

  let err = UserLog::open(&path).err().unwrap();
  assert!(matches!(&err, TrekError::InvalidLogFile(p) if *p == path));
  assert_eq!(err.to_string(), format!("{} is not a TrekList log file", path.display()));
}

#[traced_test]
#[test]
fn test_watched_set_skips_unreadable_flags() {
  let (mut log, path, _dir) = setup_log();
  log.set_watched("tt0708400", true).unwrap();
  log.set_watched("tt0708402", false).unwrap();
  Connection::open(&path)
    .unwrap()
    .execute_batch(
      "INSERT INTO log VALUES ('tt0708401', 1, 'stardate 41153.7');
       INSERT INTO log VALUES ('tt0708403', 'maybe', NULL);",
    )
    .unwrap();

  let set = log.watched_set().unwrap();
  let mut watched: Vec<&str> = set.watched.iter().map(String::as_str).collect();
  watched.sort_unstable();
  assert_eq!(watched, vec!["tt0708400", "tt0708401"]);
  assert_eq!(set.unreadable, vec!["tt0708403".to_string()]);
}

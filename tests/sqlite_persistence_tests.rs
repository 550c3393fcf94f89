#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use nexflow::{Schedule, ScheduleConfig, ScheduleMetadata, ScheduleStore, SqliteScheduleStore};
use tempfile::NamedTempFile;

#[test]
fn sqlite_store_round_trip_schedule() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteScheduleStore::new(file.path()).unwrap();

    let started = NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let mut metadata = ScheduleMetadata::new(started);
    metadata.project_name = "SQLite Project".into();

    let mut schedule = Schedule::new_with_metadata(metadata.clone(), ScheduleConfig::default());
    schedule.add("Design", 5.0, None).expect("insert Design");
    schedule.add("Build", 10.0, Some("Design")).expect("insert Build");
    schedule.add("Build", 2.0, Some("Approval")).expect("insert Build again");
    schedule.mark_done("Design", started).expect("complete Design");

    store.save_schedule(&schedule).unwrap();
    let loaded = store.load_schedule().unwrap().expect("schedule stored");

    assert_eq!(loaded.metadata(), &metadata);
    assert_eq!(loaded.tasks(), schedule.tasks());
    assert!(loaded.completed().contains("Design"));
    assert_eq!(loaded.completed().len(), 1);
}

#[test]
fn empty_store_loads_nothing() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteScheduleStore::new(file.path()).unwrap();
    assert!(store.load_schedule().unwrap().is_none());
}

#[test]
fn saving_again_replaces_previous_session() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteScheduleStore::new(file.path()).unwrap();

    let mut first = Schedule::new();
    first.add("Old", 1.0, None).unwrap();
    store.save_schedule(&first).unwrap();

    let mut second = Schedule::new();
    second.add("New", 2.0, None).unwrap();
    store.save_schedule(&second).unwrap();

    let loaded = store.load_schedule().unwrap().unwrap();
    assert_eq!(loaded.tasks().len(), 1);
    assert_eq!(loaded.tasks()[0].name, "New");
    assert!(loaded.completed().is_empty());
}

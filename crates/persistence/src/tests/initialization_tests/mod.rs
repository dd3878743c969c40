// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use time::macros::datetime;

use crate::tests::{TempDatabase, create_student};
use crate::{Persistence, PersistenceError, PoolSettings, format_timestamp};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
    assert!(persistence.ping().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let db1: Persistence = Persistence::new_in_memory().unwrap();
    let db2: Persistence = Persistence::new_in_memory().unwrap();

    create_student(&db1, "2021001", "Ayesha");

    assert_eq!(db1.list_users().unwrap().len(), 1);
    assert_eq!(db2.list_users().unwrap().len(), 0);
}

#[test]
fn test_migrations_seed_sections() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    let names: Vec<String> = persistence
        .list_sections()
        .unwrap()
        .into_iter()
        .map(|section| section.name)
        .collect();
    assert_eq!(names, vec!["A", "B", "C", "D", "E", "F"]);
    assert!(persistence.section_exists(1).unwrap());
    assert!(!persistence.section_exists(99).unwrap());
}

#[test]
fn test_clones_share_the_same_database() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clone: Persistence = persistence.clone();

    create_student(&persistence, "2021001", "Ayesha");
    assert!(clone.get_student("2021001").unwrap().is_some());
}

#[test]
fn test_file_database_persists_across_reopen() {
    let database: TempDatabase = TempDatabase::new("reopen");
    let settings: PoolSettings = PoolSettings {
        max_size: 2,
        ..PoolSettings::default()
    };

    {
        let persistence: Persistence = database.open(&settings);
        create_student(&persistence, "2021001", "Ayesha");
    }

    let reopened: Persistence = database.open(&settings);
    assert!(reopened.get_student("2021001").unwrap().is_some());
}

#[test]
fn test_timestamps_are_stored_as_utc_text() {
    assert_eq!(
        format_timestamp(datetime!(2026-03-02 14:05:09 +5)).unwrap(),
        "2026-03-02 09:05:09"
    );
    assert_eq!(
        format_timestamp(datetime!(2026-01-01 00:00:00.75 UTC)).unwrap(),
        "2026-01-01 00:00:00"
    );
}

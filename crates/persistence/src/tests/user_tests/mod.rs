// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and profile persistence tests.

use std::time::Duration;

use attendance_domain::{FacultyId, RegistrationNumber, RoleProfile};
use diesel::{Connection, RunQueryDsl, SqliteConnection};

use crate::tests::{PASSWORD, TempDatabase, create_faculty, create_student};
use crate::{Persistence, PersistenceError, PoolSettings, UserData};

fn student_profile(registration_number: &str) -> RoleProfile {
    RoleProfile::Student {
        registration_number: RegistrationNumber::parse(registration_number).unwrap(),
        faculty_name: String::from("FCSE"),
    }
}

#[test]
fn test_create_student_writes_user_and_profile() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = create_student(&persistence, "2021123", "Ayesha Khan");

    let user: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(user.name, "Ayesha Khan");
    assert_eq!(user.email, "u2021123@giki.edu.pk");
    assert_eq!(user.role, "student");
    assert_eq!(user.role_id(), Some("2021123"));
    assert_eq!(user.faculty_name.as_deref(), Some("FCSE"));
    assert!(user.faculty_id.is_none());

    let student = persistence.get_student("2021123").unwrap().unwrap();
    assert_eq!(student.user_id, user_id);
    assert_eq!(student.name, "Ayesha Khan");
}

#[test]
fn test_create_faculty_profile() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_faculty(&persistence, "12345", "ahmed");

    let user: UserData = persistence
        .get_user_by_email("ahmed@giki.edu.pk")
        .unwrap()
        .unwrap();
    assert_eq!(user.role, "faculty");
    assert_eq!(user.role_id(), Some("12345"));
    assert_eq!(user.department.as_deref(), Some("Computer Science"));
}

#[test]
fn test_password_is_stored_hashed() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021123", "Ayesha Khan");

    let credentials = persistence
        .get_credentials_by_email("u2021123@giki.edu.pk")
        .unwrap()
        .unwrap();
    assert_ne!(credentials.password_hash, PASSWORD);
    assert!(persistence.verify_password(PASSWORD, Some(&credentials.password_hash)));
    assert!(!persistence.verify_password("wrong", Some(&credentials.password_hash)));
}

#[test]
fn test_verify_password_without_hash_is_false() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(!persistence.verify_password(PASSWORD, None));
}

#[test]
fn test_duplicate_email_reports_constraint() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021123", "Ayesha Khan");

    let err: PersistenceError = persistence
        .create_user(
            "Someone Else",
            "u2021123@giki.edu.pk",
            PASSWORD,
            &student_profile("2021999"),
        )
        .unwrap_err();
    assert_eq!(err.unique_constraint(), Some("users.email"));
}

#[test]
fn test_duplicate_registration_number_rolls_back_user() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021123", "Ayesha Khan");

    let err: PersistenceError = persistence
        .create_user(
            "Someone Else",
            "u2021999@giki.edu.pk",
            PASSWORD,
            &student_profile("2021123"),
        )
        .unwrap_err();
    assert_eq!(
        err.unique_constraint(),
        Some("students.registration_number")
    );
    assert!(
        persistence
            .get_user_by_email("u2021999@giki.edu.pk")
            .unwrap()
            .is_none(),
        "user row must be rolled back with the profile"
    );
}

#[test]
fn test_duplicate_faculty_id_reports_constraint() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_faculty(&persistence, "12345", "ahmed");

    let err: PersistenceError = persistence
        .create_user(
            "Dr Sara",
            "sara@giki.edu.pk",
            PASSWORD,
            &RoleProfile::Faculty {
                faculty_id: FacultyId::parse("12345").unwrap(),
                department: String::from("Physics"),
            },
        )
        .unwrap_err();
    assert_eq!(err.unique_constraint(), Some("faculty.faculty_id"));
}

#[test]
fn test_second_admin_is_rejected() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_user("Admin", "admin@giki.edu.pk", PASSWORD, &RoleProfile::Admin)
        .unwrap();

    let err: PersistenceError = persistence
        .create_user("Other", "other@giki.edu.pk", PASSWORD, &RoleProfile::Admin)
        .unwrap_err();
    assert_eq!(err.unique_constraint(), Some("admins.singleton"));
    assert_eq!(persistence.list_users().unwrap().len(), 1);
}

#[test]
fn test_update_password() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021123", "Ayesha Khan");

    persistence
        .update_password("u2021123@giki.edu.pk", "N3wPassword")
        .unwrap();
    let credentials = persistence
        .get_credentials_by_email("u2021123@giki.edu.pk")
        .unwrap()
        .unwrap();
    assert!(persistence.verify_password("N3wPassword", Some(&credentials.password_hash)));

    assert!(matches!(
        persistence.update_password("nobody@giki.edu.pk", "N3wPassword"),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_list_users_orders_by_role_then_name() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021002", "Zara");
    create_student(&persistence, "2021001", "Ali");
    create_faculty(&persistence, "12345", "ahmed");

    let roles_and_names: Vec<(String, String)> = persistence
        .list_users()
        .unwrap()
        .into_iter()
        .map(|user| (user.role, user.name))
        .collect();
    assert_eq!(
        roles_and_names,
        vec![
            (String::from("faculty"), String::from("Dr ahmed")),
            (String::from("student"), String::from("Ali")),
            (String::from("student"), String::from("Zara")),
        ]
    );
}

#[test]
fn test_concurrent_duplicate_email_admits_exactly_one() {
    let database: TempDatabase = TempDatabase::new("concurrent_email");
    let persistence: Persistence = database.open(&PoolSettings::default());

    let results: Vec<Result<i64, PersistenceError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let persistence: Persistence = persistence.clone();
                scope.spawn(move || {
                    persistence.create_user(
                        "Ayesha",
                        "u2021001@giki.edu.pk",
                        PASSWORD,
                        &student_profile(&format!("20210{i:02}")),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.unique_constraint(), Some("users.email"), "{err:?}");
    }
    assert_eq!(persistence.list_users().unwrap().len(), 1);
}

#[test]
fn test_concurrent_admin_registration_admits_exactly_one() {
    let database: TempDatabase = TempDatabase::new("concurrent_admin");
    let persistence: Persistence = database.open(&PoolSettings::default());

    let results: Vec<Result<i64, PersistenceError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let persistence: Persistence = persistence.clone();
                scope.spawn(move || {
                    persistence.create_user(
                        "System Admin",
                        &format!("admin{i}@giki.edu.pk"),
                        PASSWORD,
                        &RoleProfile::Admin,
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.unique_constraint(), Some("admins.singleton"), "{err:?}");
    }
    // Losing transactions leave no orphaned user rows
    assert_eq!(persistence.list_users().unwrap().len(), 1);
}

#[test]
fn test_write_under_held_lock_reports_busy() {
    let database: TempDatabase = TempDatabase::new("busy");
    let persistence: Persistence = database.open(&PoolSettings {
        max_size: 2,
        connection_timeout: Duration::from_millis(300),
    });
    create_student(&persistence, "2021001", "Ayesha");

    let mut holder: SqliteConnection = SqliteConnection::establish(database.path_str()).unwrap();
    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut holder)
        .unwrap();

    let result = persistence.update_password("u2021001@giki.edu.pk", "Fresh1Pass");
    assert!(
        matches!(result, Err(PersistenceError::DatabaseBusy(_))),
        "{result:?}"
    );

    diesel::sql_query("ROLLBACK").execute(&mut holder).unwrap();
    persistence
        .update_password("u2021001@giki.edu.pk", "Fresh1Pass")
        .unwrap();
}

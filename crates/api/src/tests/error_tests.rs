// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use attendance_domain::{DomainError, Role};
use attendance_persistence::PersistenceError;

use crate::{ApiError, ErrorKind, translate_domain_error, translate_persistence_error};

fn conflict_rule(err: PersistenceError) -> String {
    match translate_persistence_error(err) {
        ApiError::Conflict { rule, .. } => rule,
        other => panic!("expected conflict, got {other:?}"),
    }
}

fn unique(constraint: &str) -> PersistenceError {
    PersistenceError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[test]
fn test_unique_violations_map_to_named_conflicts() {
    assert_eq!(conflict_rule(unique("users.email")), "duplicate_email");
    assert_eq!(
        conflict_rule(unique("students.registration_number")),
        "duplicate_registration_number"
    );
    assert_eq!(
        conflict_rule(unique("faculty.faculty_id")),
        "duplicate_faculty_id"
    );
    assert_eq!(
        conflict_rule(unique("admins.singleton")),
        "admin_already_exists"
    );
    assert_eq!(conflict_rule(unique("courses.code")), "duplicate_course_code");
    assert_eq!(
        conflict_rule(unique(
            "student_course.course_id, student_course.registration_number"
        )),
        "duplicate_enrollment"
    );
    assert_eq!(conflict_rule(unique("other.column")), "unique_constraint");
}

#[test]
fn test_unavailable_database_maps_to_service_unavailable() {
    let timeout = translate_persistence_error(PersistenceError::PoolTimeout(String::from(
        "timed out",
    )));
    let refused = translate_persistence_error(PersistenceError::DatabaseConnectionFailed(
        String::from("refused"),
    ));
    let locked = translate_persistence_error(PersistenceError::DatabaseBusy(String::from(
        "database is locked",
    )));

    assert_eq!(timeout.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(refused.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(locked.kind(), ErrorKind::ServiceUnavailable);
}

#[test]
fn test_storage_failures_are_internal() {
    let err = translate_persistence_error(PersistenceError::QueryFailed(String::from("boom")));

    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn test_not_enrolled_is_a_validation_error() {
    let err = translate_persistence_error(PersistenceError::NotEnrolled {
        registration_number: String::from("2021001"),
    });

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("2021001"));
}

#[test]
fn test_domain_errors_name_the_offending_field() {
    let err = translate_domain_error(DomainError::InvalidStatus(String::from("Late")));
    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("status"),
            message: String::from(
                "Invalid attendance status 'Late': must be Present, Absent or Leave"
            ),
        }
    );

    let err = translate_domain_error(DomainError::MissingProfileField {
        role: Role::Faculty,
        field: "department",
    });
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "department"));
}

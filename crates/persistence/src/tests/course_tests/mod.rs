// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course and enrollment persistence tests.

use attendance_domain::AttendanceStatus;
use time::OffsetDateTime;

use crate::tests::{create_course, create_faculty, create_session, create_student};
use crate::{AttendanceMark, CourseData, NewCourse, Persistence, PersistenceError};

fn setup() -> (Persistence, CourseData) {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_faculty(&persistence, "12345", "ahmed");
    let course: CourseData = create_course(&persistence, "CS201", "12345");
    (persistence, course)
}

#[test]
fn test_create_course_returns_stored_row() {
    let (_persistence, course) = setup();
    assert_eq!(course.code, "CS201");
    assert_eq!(course.section_name.as_deref(), Some("A"));
    assert_eq!(course.faculty_id, "12345");
    assert_eq!(course.credit_hours, 3);
}

#[test]
fn test_duplicate_course_code_reports_constraint() {
    let (persistence, _course) = setup();
    let err: PersistenceError = persistence
        .create_course(&NewCourse {
            code: "CS201",
            title: "Another",
            credit_hours: 2,
            section_id: None,
            faculty_id: "12345",
            description: Some("dup"),
            semester: "Fall 2026",
        })
        .unwrap_err();
    assert_eq!(err.unique_constraint(), Some("courses.code"));
}

#[test]
fn test_course_owner_must_exist() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let err: PersistenceError = persistence
        .create_course(&NewCourse {
            code: "CS201",
            title: "Orphan",
            credit_hours: 3,
            section_id: None,
            faculty_id: "99999",
            description: None,
            semester: "Fall 2026",
        })
        .unwrap_err();
    assert!(matches!(err, PersistenceError::ForeignKeyViolation(_)));
}

#[test]
fn test_duplicate_enrollment_keeps_single_row() {
    let (persistence, course) = setup();
    create_student(&persistence, "2021001", "Ayesha");

    persistence.enroll_student(course.course_id, "2021001").unwrap();
    let err: PersistenceError = persistence
        .enroll_student(course.course_id, "2021001")
        .unwrap_err();

    assert!(
        err.unique_constraint()
            .is_some_and(|constraint| constraint.starts_with("student_course."))
    );
    assert_eq!(
        persistence
            .list_enrolled_students(course.course_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_enrolled_students_ordered_by_name() {
    let (persistence, course) = setup();
    create_student(&persistence, "2021003", "Zainab");
    create_student(&persistence, "2021001", "Bilal");
    create_student(&persistence, "2021002", "Bilal");
    for reg in ["2021003", "2021001", "2021002"] {
        persistence.enroll_student(course.course_id, reg).unwrap();
    }

    let order: Vec<String> = persistence
        .list_enrolled_students(course.course_id)
        .unwrap()
        .into_iter()
        .map(|student| student.registration_number)
        .collect();
    assert_eq!(order, vec!["2021001", "2021002", "2021003"]);
    assert!(persistence.is_enrolled(course.course_id, "2021002").unwrap());
    assert!(!persistence.is_enrolled(course.course_id, "2021999").unwrap());
}

#[test]
fn test_delete_enrollment() {
    let (persistence, course) = setup();
    create_student(&persistence, "2021001", "Ayesha");
    let enrollment = persistence.enroll_student(course.course_id, "2021001").unwrap();

    assert_eq!(
        persistence
            .get_enrollment(enrollment.enrollment_id)
            .unwrap()
            .map(|e| e.course_id),
        Some(course.course_id)
    );
    assert!(persistence.delete_enrollment(enrollment.enrollment_id).unwrap());
    assert!(!persistence.delete_enrollment(enrollment.enrollment_id).unwrap());
    assert!(persistence.get_enrollment(enrollment.enrollment_id).unwrap().is_none());
}

#[test]
fn test_list_student_courses_includes_instructor() {
    let (persistence, course) = setup();
    create_student(&persistence, "2021001", "Ayesha");
    persistence.enroll_student(course.course_id, "2021001").unwrap();

    let courses = persistence.list_student_courses("2021001").unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].code, "CS201");
    assert_eq!(courses[0].instructor_name, "Dr ahmed");
    assert_eq!(courses[0].section_name.as_deref(), Some("A"));

    assert!(persistence.list_student_courses("2021999").unwrap().is_empty());
}

#[test]
fn test_faculty_course_summary_counts() {
    let (persistence, course) = setup();
    let other: CourseData = create_course(&persistence, "CS301", "12345");
    create_student(&persistence, "2021001", "Ayesha");
    create_student(&persistence, "2021002", "Bilal");
    persistence.enroll_student(course.course_id, "2021001").unwrap();
    persistence.enroll_student(course.course_id, "2021002").unwrap();

    let session = create_session(&persistence, &course, "2026-03-02", "09:00");
    persistence
        .mark_attendance(
            &session,
            &[
                AttendanceMark {
                    registration_number: String::from("2021001"),
                    status: AttendanceStatus::Present,
                },
                AttendanceMark {
                    registration_number: String::from("2021002"),
                    status: AttendanceStatus::Leave,
                },
            ],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let summaries = persistence.list_courses_for_faculty("12345").unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].course.course_id, course.course_id);
    assert_eq!(summaries[0].student_count, 2);
    assert_eq!(summaries[0].present, 1);
    assert_eq!(summaries[0].leave, 1);
    assert_eq!(summaries[0].absent, 0);
    assert_eq!(summaries[1].course.course_id, other.course_id);
    assert_eq!(summaries[1].student_count, 0);

    assert!(persistence.list_courses_for_faculty("54321").unwrap().is_empty());
}

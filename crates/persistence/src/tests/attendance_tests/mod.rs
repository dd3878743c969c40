// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Class session and attendance persistence tests.

use attendance_domain::AttendanceStatus;
use time::OffsetDateTime;

use crate::tests::{create_course, create_faculty, create_session, create_student};
use crate::{
    AttendanceMark, CourseData, CourseSessionData, NewCourseSession, Persistence,
    PersistenceError,
};

fn mark(registration_number: &str, status: AttendanceStatus) -> AttendanceMark {
    AttendanceMark {
        registration_number: registration_number.to_string(),
        status,
    }
}

fn setup() -> (Persistence, CourseData) {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_faculty(&persistence, "12345", "ahmed");
    let course: CourseData = create_course(&persistence, "CS201", "12345");
    create_student(&persistence, "2021001", "Ayesha");
    create_student(&persistence, "2021002", "Bilal");
    persistence.enroll_student(course.course_id, "2021001").unwrap();
    persistence.enroll_student(course.course_id, "2021002").unwrap();
    (persistence, course)
}

#[test]
fn test_duplicate_session_code_reports_constraint() {
    let (persistence, course) = setup();
    let session: CourseSessionData = create_session(&persistence, &course, "2026-03-02", "09:00");

    let err: PersistenceError = persistence
        .create_session(&NewCourseSession {
            session_code: &session.session_code,
            course_id: course.course_id,
            session_date: "2026-03-02",
            start_time: "11:00",
            duration_minutes: 50,
        })
        .unwrap_err();
    assert_eq!(
        err.unique_constraint(),
        Some("course_sessions.session_code")
    );
}

#[test]
fn test_sessions_listed_in_date_order_with_marked_counts() {
    let (persistence, course) = setup();
    let later = create_session(&persistence, &course, "2026-03-09", "09:00");
    let earlier = create_session(&persistence, &course, "2026-03-02", "11:00");
    let same_day_first = create_session(&persistence, &course, "2026-03-02", "08:00");

    persistence
        .mark_attendance(
            &earlier,
            &[mark("2021001", AttendanceStatus::Present)],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let summaries = persistence.list_sessions_for_course(course.course_id).unwrap();
    let ids: Vec<i64> = summaries.iter().map(|s| s.session.session_id).collect();
    assert_eq!(
        ids,
        vec![
            same_day_first.session_id,
            earlier.session_id,
            later.session_id
        ]
    );
    assert_eq!(summaries[1].marked, 1);
    assert_eq!(summaries[0].marked, 0);
    assert_eq!(
        persistence.get_session(later.session_id).unwrap(),
        Some(later)
    );
}

#[test]
fn test_remarking_overwrites_status() {
    let (persistence, course) = setup();
    let session = create_session(&persistence, &course, "2026-03-02", "09:00");

    persistence
        .mark_attendance(
            &session,
            &[mark("2021001", AttendanceStatus::Absent)],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap();
    persistence
        .mark_attendance(
            &session,
            &[mark("2021001", AttendanceStatus::Present)],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let report = persistence.course_attendance(course.course_id).unwrap();
    let ayesha = &report.students[0];
    assert_eq!(ayesha.registration_number, "2021001");
    assert_eq!(ayesha.present, 1);
    assert_eq!(ayesha.absent, 0);

    let sessions = persistence.list_sessions_for_course(course.course_id).unwrap();
    assert_eq!(sessions[0].marked, 1, "re-marking must not add a record");
}

#[test]
fn test_unenrolled_student_fails_whole_batch() {
    let (persistence, course) = setup();
    create_student(&persistence, "2021009", "Outsider");
    let session = create_session(&persistence, &course, "2026-03-02", "09:00");

    let err: PersistenceError = persistence
        .mark_attendance(
            &session,
            &[
                mark("2021001", AttendanceStatus::Present),
                mark("2021009", AttendanceStatus::Present),
            ],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        PersistenceError::NotEnrolled {
            registration_number: String::from("2021009")
        }
    );

    let sessions = persistence.list_sessions_for_course(course.course_id).unwrap();
    assert_eq!(sessions[0].marked, 0, "no record may be written");
}

#[test]
fn test_course_attendance_counts_all_sessions() {
    let (persistence, course) = setup();
    let s1 = create_session(&persistence, &course, "2026-03-02", "09:00");
    let s2 = create_session(&persistence, &course, "2026-03-04", "09:00");
    let s3 = create_session(&persistence, &course, "2026-03-06", "09:00");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    persistence
        .mark_attendance(&s1, &[mark("2021001", AttendanceStatus::Present)], "12345", now)
        .unwrap();
    persistence
        .mark_attendance(&s2, &[mark("2021001", AttendanceStatus::Present)], "12345", now)
        .unwrap();
    persistence
        .mark_attendance(&s3, &[mark("2021001", AttendanceStatus::Leave)], "12345", now)
        .unwrap();

    let report = persistence.course_attendance(course.course_id).unwrap();
    assert_eq!(report.total_sessions, 3);
    assert_eq!(report.students.len(), 2);
    assert_eq!(report.students[0].present, 2);
    assert_eq!(report.students[0].leave, 1);
    assert_eq!(report.students[1].registration_number, "2021002");
    assert_eq!(report.students[1].present, 0);
}

#[test]
fn test_student_session_attendance_reports_unmarked_as_none() {
    let (persistence, course) = setup();
    let s1 = create_session(&persistence, &course, "2026-03-02", "09:00");
    let s2 = create_session(&persistence, &course, "2026-03-04", "09:00");

    persistence
        .mark_attendance(
            &s2,
            &[mark("2021001", AttendanceStatus::Leave)],
            "12345",
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let rows = persistence
        .student_session_attendance(course.course_id, "2021001")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].session_id, s1.session_id);
    assert_eq!(rows[0].status, None);
    assert_eq!(rows[1].session_id, s2.session_id);
    assert_eq!(rows[1].status.as_deref(), Some("Leave"));
}

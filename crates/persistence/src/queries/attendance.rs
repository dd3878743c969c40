// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Class session and attendance queries.

use std::collections::HashMap;

use diesel::dsl::count;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{
    CourseAttendanceData, CourseSessionData, SessionAttendanceData, SessionSummaryData,
    StudentAttendanceCounts,
};
use crate::diesel_schema::{
    attendance, attendance_status, course_sessions, student_course, students, users,
};
use crate::error::PersistenceError;
use crate::queries::StatusCounts;

/// Retrieves a class session by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<Option<CourseSessionData>, PersistenceError> {
    debug!(session_id, "Looking up class session");

    Ok(course_sessions::table
        .filter(course_sessions::session_id.eq(session_id))
        .select(CourseSessionData::as_select())
        .first(conn)
        .optional()?)
}

fn sessions_for_course(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Vec<CourseSessionData>, PersistenceError> {
    Ok(course_sessions::table
        .filter(course_sessions::course_id.eq(course_id))
        .order((
            course_sessions::session_date.asc(),
            course_sessions::start_time.asc(),
            course_sessions::session_id.asc(),
        ))
        .select(CourseSessionData::as_select())
        .load(conn)?)
}

/// Lists a course's sessions in date and time order with the number of
/// records marked against each.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sessions_for_course(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Vec<SessionSummaryData>, PersistenceError> {
    let sessions: Vec<CourseSessionData> = sessions_for_course(conn, course_id)?;

    let marked: HashMap<i64, i64> = attendance::table
        .filter(attendance::course_id.eq(course_id))
        .group_by(attendance::session_id)
        .select((attendance::session_id, count(attendance::attendance_id)))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(sessions
        .into_iter()
        .map(|session| SessionSummaryData {
            marked: marked.get(&session.session_id).copied().unwrap_or(0),
            session,
        })
        .collect())
}

/// Counts the sessions of a course.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_sessions(conn: &mut SqliteConnection, course_id: i64) -> Result<i64, PersistenceError> {
    Ok(course_sessions::table
        .filter(course_sessions::course_id.eq(course_id))
        .count()
        .get_result(conn)?)
}

/// Aggregates per-status record counts for every student enrolled in a
/// course, ordered by name then registration number.
///
/// Records of students who are no longer enrolled are not reported.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn course_attendance(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<CourseAttendanceData, PersistenceError> {
    let total_sessions: i64 = count_sessions(conn, course_id)?;

    let enrolled: Vec<(String, String)> = student_course::table
        .inner_join(
            students::table
                .on(students::registration_number.eq(student_course::registration_number)),
        )
        .inner_join(users::table.on(users::user_id.eq(students::user_id)))
        .filter(student_course::course_id.eq(course_id))
        .order((users::name.asc(), student_course::registration_number.asc()))
        .select((student_course::registration_number, users::name))
        .load(conn)?;

    let status_rows: Vec<(String, String, i64)> = attendance::table
        .inner_join(attendance_status::table)
        .filter(attendance::course_id.eq(course_id))
        .group_by((attendance::registration_number, attendance_status::label))
        .select((
            attendance::registration_number,
            attendance_status::label,
            count(attendance::attendance_id),
        ))
        .load(conn)?;

    let mut counts: HashMap<String, StatusCounts> = HashMap::new();
    for (registration_number, label, n) in status_rows {
        counts.entry(registration_number).or_default().add(&label, n);
    }

    let students: Vec<StudentAttendanceCounts> = enrolled
        .into_iter()
        .map(|(registration_number, name)| {
            let tally: StatusCounts = counts
                .get(&registration_number)
                .copied()
                .unwrap_or_default();
            StudentAttendanceCounts {
                registration_number,
                name,
                present: tally.present,
                absent: tally.absent,
                leave: tally.leave,
            }
        })
        .collect();

    Ok(CourseAttendanceData {
        total_sessions,
        students,
    })
}

/// Lists every session of a course with one student's status for it.
/// Sessions without a record carry `status: None`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn student_session_attendance(
    conn: &mut SqliteConnection,
    course_id: i64,
    registration_number: &str,
) -> Result<Vec<SessionAttendanceData>, PersistenceError> {
    let sessions: Vec<CourseSessionData> = sessions_for_course(conn, course_id)?;

    let statuses: HashMap<i64, String> = attendance::table
        .inner_join(attendance_status::table)
        .filter(attendance::course_id.eq(course_id))
        .filter(attendance::registration_number.eq(registration_number))
        .select((attendance::session_id, attendance_status::label))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();

    Ok(sessions
        .into_iter()
        .map(|session| SessionAttendanceData {
            status: statuses.get(&session.session_id).cloned(),
            session_id: session.session_id,
            session_code: session.session_code,
            session_date: session.session_date,
            start_time: session.start_time,
        })
        .collect())
}

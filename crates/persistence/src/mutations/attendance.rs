// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Class session and attendance mutations.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use tracing::{debug, info};

use crate::data_models::{AttendanceMark, CourseSessionData, NewCourseSession};
use crate::diesel_schema::{attendance, attendance_status, course_sessions, student_course};
use crate::error::PersistenceError;

/// Inserts a class session.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the session code is taken.
pub fn create_session(
    conn: &mut SqliteConnection,
    session: &NewCourseSession<'_>,
) -> Result<CourseSessionData, PersistenceError> {
    let created: CourseSessionData = diesel::insert_into(course_sessions::table)
        .values(session)
        .returning(CourseSessionData::as_returning())
        .get_result(conn)?;

    info!(
        session_id = created.session_id,
        session_code = %created.session_code,
        course_id = created.course_id,
        "Class session created"
    );
    Ok(created)
}

/// Upserts a batch of attendance records for one session.
///
/// Every student must be enrolled in the session's course; otherwise
/// nothing is written. Records are keyed on
/// `(registration_number, session_id)` so re-marking overwrites.
///
/// # Errors
///
/// Returns `PersistenceError::NotEnrolled` for the first student not in
/// the course, or an error if any write fails.
pub fn mark_attendance(
    conn: &mut SqliteConnection,
    session: &CourseSessionData,
    marks: &[AttendanceMark],
    marked_by: &str,
    marked_date: &str,
    marked_time: &str,
) -> Result<usize, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let status_ids: HashMap<String, i64> = attendance_status::table
            .select((attendance_status::label, attendance_status::status_id))
            .load::<(String, i64)>(conn)?
            .into_iter()
            .collect();

        let enrolled: HashSet<String> = student_course::table
            .filter(student_course::course_id.eq(session.course_id))
            .select(student_course::registration_number)
            .load::<String>(conn)?
            .into_iter()
            .collect();

        if let Some(mark) = marks
            .iter()
            .find(|mark| !enrolled.contains(&mark.registration_number))
        {
            return Err(PersistenceError::NotEnrolled {
                registration_number: mark.registration_number.clone(),
            });
        }

        for mark in marks {
            let status_id: i64 = *status_ids.get(mark.status.label()).ok_or_else(|| {
                PersistenceError::NotFound(format!("Attendance status {}", mark.status))
            })?;

            debug!(
                registration_number = %mark.registration_number,
                status = %mark.status,
                "Upserting attendance record"
            );

            diesel::insert_into(attendance::table)
                .values((
                    attendance::registration_number.eq(&mark.registration_number),
                    attendance::course_id.eq(session.course_id),
                    attendance::session_id.eq(session.session_id),
                    attendance::status_id.eq(status_id),
                    attendance::marked_date.eq(marked_date),
                    attendance::marked_time.eq(marked_time),
                    attendance::marked_by.eq(marked_by),
                ))
                .on_conflict((attendance::registration_number, attendance::session_id))
                .do_update()
                .set((
                    attendance::status_id.eq(excluded(attendance::status_id)),
                    attendance::marked_date.eq(excluded(attendance::marked_date)),
                    attendance::marked_time.eq(excluded(attendance::marked_time)),
                    attendance::marked_by.eq(excluded(attendance::marked_by)),
                ))
                .execute(conn)?;
        }

        info!(
            session_id = session.session_id,
            marked = marks.len(),
            marked_by,
            "Attendance saved"
        );
        Ok(marks.len())
    })
}

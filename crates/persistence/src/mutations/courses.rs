// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course and enrollment mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::{EnrollmentData, NewCourse};
use crate::diesel_schema::{courses, student_course};
use crate::error::PersistenceError;

/// Inserts a course and returns its ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the code is taken.
pub fn create_course(
    conn: &mut SqliteConnection,
    course: &NewCourse<'_>,
) -> Result<i64, PersistenceError> {
    let course_id: i64 = diesel::insert_into(courses::table)
        .values(course)
        .returning(courses::course_id)
        .get_result(conn)?;

    info!(course_id, code = course.code, faculty_id = course.faculty_id, "Course created");
    Ok(course_id)
}

/// Enrolls a student in a course.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the student is already
/// enrolled.
pub fn enroll_student(
    conn: &mut SqliteConnection,
    course_id: i64,
    registration_number: &str,
) -> Result<EnrollmentData, PersistenceError> {
    let (enrollment_id, course_id, registration_number, enrolled_at): (i64, i64, String, String) =
        diesel::insert_into(student_course::table)
            .values((
                student_course::course_id.eq(course_id),
                student_course::registration_number.eq(registration_number),
            ))
            .returning((
                student_course::enrollment_id,
                student_course::course_id,
                student_course::registration_number,
                student_course::enrolled_at,
            ))
            .get_result(conn)?;

    info!(enrollment_id, course_id, %registration_number, "Student enrolled");
    Ok(EnrollmentData {
        enrollment_id,
        course_id,
        registration_number,
        enrolled_at,
    })
}

/// Deletes an enrollment. Returns whether a row was removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(student_course::table)
        .filter(student_course::enrollment_id.eq(enrollment_id))
        .execute(conn)?;

    if deleted > 0 {
        info!(enrollment_id, "Enrollment removed");
    }
    Ok(deleted > 0)
}

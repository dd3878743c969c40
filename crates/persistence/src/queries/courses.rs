// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section, course and enrollment queries.

use std::collections::HashMap;

use diesel::dsl::count;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{
    CourseData, CourseSummaryData, EnrolledStudentData, EnrollmentData, SectionData,
    StudentCourseData,
};
use crate::diesel_schema::{
    attendance, attendance_status, courses, faculty, sections, student_course, students, users,
};
use crate::error::PersistenceError;
use crate::queries::StatusCounts;

type CourseRow = (
    i64,
    String,
    String,
    i32,
    Option<i64>,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
);

macro_rules! courses_with_section {
    () => {
        courses::table.left_join(sections::table).select((
            courses::course_id,
            courses::code,
            courses::title,
            courses::credit_hours,
            courses::section_id,
            sections::name.nullable(),
            courses::faculty_id,
            courses::description,
            courses::semester,
            courses::created_at,
        ))
    };
}

fn course_from_row(row: CourseRow) -> CourseData {
    let (
        course_id,
        code,
        title,
        credit_hours,
        section_id,
        section_name,
        faculty_id,
        description,
        semester,
        created_at,
    ) = row;
    CourseData {
        course_id,
        code,
        title,
        credit_hours,
        section_id,
        section_name,
        faculty_id,
        description,
        semester,
        created_at,
    }
}

/// Lists the seeded sections.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sections(conn: &mut SqliteConnection) -> Result<Vec<SectionData>, PersistenceError> {
    let rows: Vec<(i64, String)> = sections::table
        .order(sections::section_id.asc())
        .select((sections::section_id, sections::name))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(section_id, name)| SectionData { section_id, name })
        .collect())
}

/// Returns whether a section exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn section_exists(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> Result<bool, PersistenceError> {
    let found: i64 = sections::table
        .filter(sections::section_id.eq(section_id))
        .count()
        .get_result(conn)?;
    Ok(found > 0)
}

/// Retrieves a course by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the course is not found.
pub fn get_course(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Option<CourseData>, PersistenceError> {
    debug!(course_id, "Looking up course");

    let row: Option<CourseRow> = courses_with_section!()
        .filter(courses::course_id.eq(course_id))
        .first(conn)
        .optional()?;
    Ok(row.map(course_from_row))
}

/// Lists the courses owned by a faculty member with live enrollment and
/// attendance counts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_courses_for_faculty(
    conn: &mut SqliteConnection,
    faculty_id: &str,
) -> Result<Vec<CourseSummaryData>, PersistenceError> {
    let rows: Vec<CourseRow> = courses_with_section!()
        .filter(courses::faculty_id.eq(faculty_id))
        .order(courses::code.asc())
        .load(conn)?;
    let course_ids: Vec<i64> = rows.iter().map(|row| row.0).collect();

    let student_counts: HashMap<i64, i64> = student_course::table
        .filter(student_course::course_id.eq_any(&course_ids))
        .group_by(student_course::course_id)
        .select((
            student_course::course_id,
            count(student_course::enrollment_id),
        ))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    let status_rows: Vec<(i64, String, i64)> = attendance::table
        .inner_join(attendance_status::table)
        .filter(attendance::course_id.eq_any(&course_ids))
        .group_by((attendance::course_id, attendance_status::label))
        .select((
            attendance::course_id,
            attendance_status::label,
            count(attendance::attendance_id),
        ))
        .load(conn)?;

    let mut status_counts: HashMap<i64, StatusCounts> = HashMap::new();
    for (course_id, label, n) in status_rows {
        status_counts.entry(course_id).or_default().add(&label, n);
    }

    Ok(rows
        .into_iter()
        .map(course_from_row)
        .map(|course| {
            let counts: StatusCounts = status_counts
                .get(&course.course_id)
                .copied()
                .unwrap_or_default();
            CourseSummaryData {
                student_count: student_counts.get(&course.course_id).copied().unwrap_or(0),
                present: counts.present,
                absent: counts.absent,
                leave: counts.leave,
                course,
            }
        })
        .collect())
}

/// Retrieves an enrollment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<Option<EnrollmentData>, PersistenceError> {
    let row: Option<(i64, i64, String, String)> = student_course::table
        .filter(student_course::enrollment_id.eq(enrollment_id))
        .select((
            student_course::enrollment_id,
            student_course::course_id,
            student_course::registration_number,
            student_course::enrolled_at,
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(
        |(enrollment_id, course_id, registration_number, enrolled_at)| EnrollmentData {
            enrollment_id,
            course_id,
            registration_number,
            enrolled_at,
        },
    ))
}

/// Returns whether a student is enrolled in a course.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_enrolled(
    conn: &mut SqliteConnection,
    course_id: i64,
    registration_number: &str,
) -> Result<bool, PersistenceError> {
    let found: i64 = student_course::table
        .filter(student_course::course_id.eq(course_id))
        .filter(student_course::registration_number.eq(registration_number))
        .count()
        .get_result(conn)?;
    Ok(found > 0)
}

/// Lists the students enrolled in a course ordered by name, then
/// registration number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_enrolled_students(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Vec<EnrolledStudentData>, PersistenceError> {
    let rows: Vec<(i64, String, String, String, String, String)> = student_course::table
        .inner_join(
            students::table
                .on(students::registration_number.eq(student_course::registration_number)),
        )
        .inner_join(users::table.on(users::user_id.eq(students::user_id)))
        .filter(student_course::course_id.eq(course_id))
        .order((users::name.asc(), student_course::registration_number.asc()))
        .select((
            student_course::enrollment_id,
            student_course::registration_number,
            users::name,
            users::email,
            students::faculty_name,
            student_course::enrolled_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(enrollment_id, registration_number, name, email, faculty_name, enrolled_at)| {
                EnrolledStudentData {
                    enrollment_id,
                    registration_number,
                    name,
                    email,
                    faculty_name,
                    enrolled_at,
                }
            },
        )
        .collect())
}

/// Lists the courses a student is enrolled in with the instructor's name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_student_courses(
    conn: &mut SqliteConnection,
    registration_number: &str,
) -> Result<Vec<StudentCourseData>, PersistenceError> {
    let rows: Vec<(
        i64,
        i64,
        String,
        String,
        i32,
        String,
        Option<String>,
        String,
        String,
        String,
    )> = student_course::table
        .inner_join(courses::table)
        .left_join(sections::table.on(courses::section_id.eq(sections::section_id.nullable())))
        .inner_join(faculty::table.on(faculty::faculty_id.eq(courses::faculty_id)))
        .inner_join(users::table.on(users::user_id.eq(faculty::user_id)))
        .filter(student_course::registration_number.eq(registration_number))
        .order(courses::code.asc())
        .select((
            student_course::enrollment_id,
            courses::course_id,
            courses::code,
            courses::title,
            courses::credit_hours,
            courses::semester,
            sections::name.nullable(),
            courses::faculty_id,
            users::name,
            student_course::enrolled_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(
                enrollment_id,
                course_id,
                code,
                title,
                credit_hours,
                semester,
                section_name,
                faculty_id,
                instructor_name,
                enrolled_at,
            )| StudentCourseData {
                enrollment_id,
                course_id,
                code,
                title,
                credit_hours,
                semester,
                section_name,
                faculty_id,
                instructor_name,
                enrolled_at,
            },
        )
        .collect())
}

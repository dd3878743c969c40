// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use attendance_domain::{AttendanceStatus, Role};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diesel_schema::{course_sessions, courses};

/// A user joined with whichever profile row their role carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub registration_number: Option<String>,
    pub faculty_name: Option<String>,
    pub faculty_id: Option<String>,
    pub department: Option<String>,
    pub created_at: String,
}

impl UserData {
    /// The role-specific identifier: registration number for students,
    /// faculty ID for faculty, nothing for the admin.
    #[must_use]
    pub fn role_id(&self) -> Option<&str> {
        match self.role.parse::<Role>() {
            Ok(Role::Student) => self.registration_number.as_deref(),
            Ok(Role::Faculty) => self.faculty_id.as_deref(),
            _ => None,
        }
    }
}

/// Login material for one account.
#[derive(Debug, Clone)]
pub struct CredentialData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}

/// A student profile with the owning account's name and e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentData {
    pub user_id: i64,
    pub registration_number: String,
    pub name: String,
    pub email: String,
    pub faculty_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    pub section_id: i64,
    pub name: String,
}

/// Values for a new course row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourse<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub credit_hours: i32,
    pub section_id: Option<i64>,
    pub faculty_id: &'a str,
    pub description: Option<&'a str>,
    pub semester: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseData {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    pub section_id: Option<i64>,
    pub section_name: Option<String>,
    pub faculty_id: String,
    pub description: Option<String>,
    pub semester: String,
    pub created_at: String,
}

/// A course with its enrollment count and per-status record counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummaryData {
    pub course: CourseData,
    pub student_count: i64,
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentData {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub registration_number: String,
    pub enrolled_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledStudentData {
    pub enrollment_id: i64,
    pub registration_number: String,
    pub name: String,
    pub email: String,
    pub faculty_name: String,
    pub enrolled_at: String,
}

/// A course a student is enrolled in, with the instructor's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourseData {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    pub semester: String,
    pub section_name: Option<String>,
    pub faculty_id: String,
    pub instructor_name: String,
    pub enrolled_at: String,
}

/// Values for a new class session row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = course_sessions)]
pub struct NewCourseSession<'a> {
    pub session_code: &'a str,
    pub course_id: i64,
    pub session_date: &'a str,
    pub start_time: &'a str,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = course_sessions)]
pub struct CourseSessionData {
    pub session_id: i64,
    pub session_code: String,
    pub course_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub duration_minutes: i32,
    pub created_at: String,
}

/// A session with the number of attendance records marked against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummaryData {
    pub session: CourseSessionData,
    pub marked: i64,
}

/// One entry of an attendance batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMark {
    pub registration_number: String,
    pub status: AttendanceStatus,
}

/// Per-status record counts for one enrolled student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAttendanceCounts {
    pub registration_number: String,
    pub name: String,
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
}

/// Attendance counts for every enrolled student of a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAttendanceData {
    pub total_sessions: i64,
    pub students: Vec<StudentAttendanceCounts>,
}

/// One session of a course and the student's status for it, if marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAttendanceData {
    pub session_id: i64,
    pub session_code: String,
    pub session_date: String,
    pub start_time: String,
    pub status: Option<String>,
}

// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests are deserialized straight from JSON bodies. Every response
//! carries `success: true`; failures are rendered by the server layer.

use serde::{Deserialize, Serialize};

// ============================================================================
// Accounts
// ============================================================================

/// API request to register an account.
///
/// Which optional fields are required depends on `role`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `student`, `faculty` or `admin`.
    pub role: String,
    /// Required for students.
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Required for students.
    #[serde(default)]
    pub faculty_name: Option<String>,
    /// Required for faculty.
    #[serde(default)]
    pub faculty_id: Option<String>,
    /// Required for faculty.
    #[serde(default)]
    pub department: Option<String>,
}

/// An account with its role-specific profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub faculty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub department: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Token expiry, RFC 3339.
    pub expires_at: String,
    pub user: UserView,
}

/// API response for `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub success: bool,
    pub users: Vec<UserView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// A success flag and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Sections, courses and enrollments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub section_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSectionsResponse {
    pub success: bool,
    pub sections: Vec<SectionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    #[serde(default)]
    pub section_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    pub semester: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    pub section_id: Option<i64>,
    pub section_name: Option<String>,
    /// Faculty ID of the owning instructor.
    pub faculty_id: String,
    pub description: Option<String>,
    pub semester: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourseResponse {
    pub success: bool,
    pub course: CourseInfo,
}

/// A course with live enrollment and attendance figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummaryInfo {
    #[serde(flatten)]
    pub course: CourseInfo,
    pub student_count: i64,
    /// Mean record score, 0.0 to 100.0, one decimal place.
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListCoursesResponse {
    pub success: bool,
    pub courses: Vec<CourseSummaryInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnrollStudentRequest {
    pub course_id: i64,
    pub registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub registration_number: String,
    pub enrolled_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudentResponse {
    pub success: bool,
    pub message: String,
    pub enrollment: EnrollmentInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledStudentInfo {
    pub enrollment_id: i64,
    pub registration_number: String,
    pub name: String,
    pub email: String,
    pub faculty_name: String,
    pub enrolled_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnrolledStudentsResponse {
    pub success: bool,
    pub course_id: i64,
    pub students: Vec<EnrolledStudentInfo>,
}

/// A course as seen from a student's enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourseInfo {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCoursesResponse {
    pub success: bool,
    pub registration_number: String,
    pub courses: Vec<StudentCourseInfo>,
}

// ============================================================================
// Sessions and attendance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateSessionRequest {
    pub course_id: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i64,
    pub session_code: String,
    pub course_id: i64,
    pub date: String,
    pub time: String,
    pub duration_minutes: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub success: bool,
    pub session: SessionInfo,
}

/// Whether attendance has been taken for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    AttendanceMarked,
}

impl SessionState {
    #[must_use]
    pub const fn from_marked(marked: i64) -> Self {
        if marked > 0 {
            Self::AttendanceMarked
        } else {
            Self::Created
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummaryInfo {
    #[serde(flatten)]
    pub session: SessionInfo,
    /// Number of attendance records for the session.
    pub marked: i64,
    pub state: SessionState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub success: bool,
    pub course_id: i64,
    pub sessions: Vec<SessionSummaryInfo>,
}

/// One entry of an attendance batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceRecordRequest {
    pub registration_number: String,
    /// `Present`, `Absent` or `Leave`, case-insensitive.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveAttendanceRequest {
    pub session_id: i64,
    pub records: Vec<AttendanceRecordRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAttendanceResponse {
    pub success: bool,
    pub session_id: i64,
    /// Number of records written.
    pub marked: usize,
}

/// One row of a course attendance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendanceInfo {
    pub registration_number: String,
    pub student_name: String,
    pub total_sessions: u32,
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAttendanceResponse {
    pub success: bool,
    pub course_id: i64,
    pub course_code: String,
    pub total_sessions: u32,
    pub students: Vec<StudentAttendanceInfo>,
}

/// A student's status for one session; `status` is `None` when unmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAttendanceInfo {
    pub session_id: i64,
    pub session_code: String,
    pub date: String,
    pub time: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentCourseAttendanceResponse {
    pub success: bool,
    pub course_id: i64,
    pub course_code: String,
    pub registration_number: String,
    pub summary: StudentAttendanceInfo,
    pub sessions: Vec<SessionAttendanceInfo>,
}

/// A rendered CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested download file name.
    pub filename: String,
    pub body: String,
}

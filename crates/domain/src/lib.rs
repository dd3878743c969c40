// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendance;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use attendance::{AttendanceTally, attendance_rate, round_one_decimal};
pub use error::DomainError;
pub use types::{
    AttendanceStatus, CourseCode, EmailAddress, FacultyId, RegistrationNumber, Role, RoleProfile,
    SessionCode,
};
pub use validation::{
    format_date, format_time, parse_session_date, parse_session_time, validate_course_code,
    validate_credit_hours, validate_duration, validate_email_for_role, validate_faculty_id,
    validate_name, validate_registration_number, validate_semester,
};

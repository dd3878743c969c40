// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Role;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The role string is not one of `student`, `faculty` or `admin`.
    InvalidRole(String),
    /// The e-mail address does not match the pattern required for the role.
    InvalidEmailFormat {
        /// The role the address was validated against.
        role: Role,
        /// The rejected address.
        email: String,
    },
    /// A student registration number is not exactly seven digits.
    InvalidRegistrationNumber(String),
    /// A faculty identifier is not exactly five digits.
    InvalidFacultyId(String),
    /// A person or course name is empty or invalid.
    InvalidName(String),
    /// A role-specific profile field is missing or empty.
    MissingProfileField {
        /// The role requiring the field.
        role: Role,
        /// The missing field.
        field: &'static str,
    },
    /// A course code is malformed.
    InvalidCourseCode(String),
    /// Course credit hours are outside the accepted range.
    InvalidCreditHours(i32),
    /// A semester label is empty or too long.
    InvalidSemester(String),
    /// A session date could not be parsed.
    InvalidSessionDate(String),
    /// A session start time could not be parsed.
    InvalidSessionTime(String),
    /// A session duration is outside the accepted range.
    InvalidDuration(i32),
    /// An attendance status label is not one of the fixed labels.
    InvalidStatus(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => {
                write!(
                    f,
                    "Invalid role '{role}'. Must be 'student', 'faculty' or 'admin'"
                )
            }
            Self::InvalidEmailFormat { role, email } => match role {
                Role::Student => write!(
                    f,
                    "Invalid e-mail '{email}': students must use u<7 digits>@<university domain>"
                ),
                Role::Faculty | Role::Admin => write!(
                    f,
                    "Invalid e-mail '{email}': {role} accounts must use name@<university domain>"
                ),
            },
            Self::InvalidRegistrationNumber(value) => {
                write!(
                    f,
                    "Invalid registration number '{value}': must be exactly 7 digits"
                )
            }
            Self::InvalidFacultyId(value) => {
                write!(f, "Invalid faculty ID '{value}': must be exactly 5 digits")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::MissingProfileField { role, field } => {
                write!(f, "Field '{field}' is required for {role} accounts")
            }
            Self::InvalidCourseCode(msg) => write!(f, "Invalid course code: {msg}"),
            Self::InvalidCreditHours(hours) => {
                write!(f, "Invalid credit hours {hours}: must be between 1 and 6")
            }
            Self::InvalidSemester(msg) => write!(f, "Invalid semester: {msg}"),
            Self::InvalidSessionDate(value) => {
                write!(f, "Invalid session date '{value}': expected YYYY-MM-DD")
            }
            Self::InvalidSessionTime(value) => {
                write!(f, "Invalid session time '{value}': expected HH:MM")
            }
            Self::InvalidDuration(minutes) => {
                write!(
                    f,
                    "Invalid duration {minutes}: must be between 1 and 600 minutes"
                )
            }
            Self::InvalidStatus(label) => {
                write!(
                    f,
                    "Invalid attendance status '{label}': must be Present, Absent or Leave"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

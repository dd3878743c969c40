// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{
    validate_course_code, validate_email_for_role, validate_faculty_id,
    validate_registration_number,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// The role an account is registered with.
///
/// A role is fixed at registration and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student identified by a seven digit registration number.
    Student,
    /// A faculty member identified by a five digit faculty ID. Owns courses.
    Faculty,
    /// The single system administrator.
    Admin,
}

impl Role {
    /// Converts this role to its canonical lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the fixed attendance status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Attended the session. Scores 100.
    Present,
    /// Did not attend. Scores 0.
    Absent,
    /// Excused absence. Scores 50.
    Leave,
}

impl AttendanceStatus {
    /// All statuses in lookup-table order.
    pub const ALL: [Self; 3] = [Self::Present, Self::Absent, Self::Leave];

    /// The label stored in the `attendance_status` lookup table.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Leave => "Leave",
        }
    }

    /// The weight of this status in attendance percentages.
    #[must_use]
    pub const fn score(&self) -> u32 {
        match self {
            Self::Present => 100,
            Self::Leave => 50,
            Self::Absent => 0,
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = DomainError;

    /// Parses a status label case-insensitively. Unknown labels are rejected;
    /// there is no implicit default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "leave" => Ok(Self::Leave),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A normalized, role-validated e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates `raw` against the pattern required for `role` within
    /// `domain` and returns the lowercased address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmailFormat` if the address does not
    /// match the role's pattern.
    pub fn parse_for_role(raw: &str, role: Role, domain: &str) -> Result<Self, DomainError> {
        let normalized: String = raw.trim().to_ascii_lowercase();
        validate_email_for_role(&normalized, role, domain)?;
        Ok(Self(normalized))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A seven digit student registration number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Parses a registration number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRegistrationNumber` unless the trimmed
    /// value is exactly seven ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        validate_registration_number(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A five digit faculty identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacultyId(String);

impl FacultyId {
    /// Parses a faculty identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFacultyId` unless the trimmed value is
    /// exactly five ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        validate_faculty_id(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FacultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uppercase course code such as `CS101` or `MT-201`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseCode(String);

impl CourseCode {
    /// Parses and uppercases a course code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCourseCode` if the code is malformed.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized: String = raw.trim().to_ascii_uppercase();
        validate_course_code(&normalized)?;
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Role-specific registration payload.
///
/// Registration dispatches once on this variant to pick the validation
/// rules and the profile table that receives the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    Student {
        registration_number: RegistrationNumber,
        /// The academic faculty (school) the student belongs to.
        faculty_name: String,
    },
    Faculty {
        faculty_id: FacultyId,
        department: String,
    },
    Admin,
}

impl RoleProfile {
    /// The role this profile registers.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Faculty { .. } => Role::Faculty,
            Self::Admin => Role::Admin,
        }
    }

    /// The role-specific identifier carried in tokens, if the role has one.
    #[must_use]
    pub fn role_id(&self) -> Option<&str> {
        match self {
            Self::Student {
                registration_number,
                ..
            } => Some(registration_number.as_str()),
            Self::Faculty { faculty_id, .. } => Some(faculty_id.as_str()),
            Self::Admin => None,
        }
    }
}

/// A session code of the form `<COURSE>-<YYYYMMDD>-<NNNN>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionCode(String);

impl SessionCode {
    /// Derives a session code from the course code, the session date and a
    /// numeric suffix. Only the last four decimal digits of `suffix` are used.
    #[must_use]
    pub fn derive(course_code: &str, date: Date, suffix: u32) -> Self {
        Self(format!(
            "{}-{:04}{:02}{:02}-{:04}",
            course_code,
            date.year(),
            u8::from(date.month()),
            date.day(),
            suffix % 10_000
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

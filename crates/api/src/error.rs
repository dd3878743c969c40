// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API-level error types.
//!
//! These errors are explicit, stable, and suitable for external consumption.
//! Domain and persistence errors are translated here, in one place each.

use attendance_domain::DomainError;
use attendance_persistence::PersistenceError;

use crate::password_policy::PasswordPolicyError;
use crate::token::TokenError;

/// Coarse classification of an [`ApiError`], used by the HTTP layer to pick
/// a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Forbidden,
    ServiceUnavailable,
    Internal,
}

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed or the token is missing, invalid or expired.
    AuthenticationFailed { reason: String },
    /// The actor is authenticated but may not perform the action.
    Unauthorized {
        action: String,
        required_role: String,
    },
    /// A write conflicts with existing state.
    Conflict { rule: String, message: String },
    /// The request input is invalid.
    InvalidInput { field: String, message: String },
    /// A requested resource does not exist.
    ResourceNotFound {
        resource_type: String,
        message: String,
    },
    /// The database is temporarily unreachable.
    ServiceUnavailable { message: String },
    /// An internal error occurred.
    Internal { message: String },
    /// The password does not satisfy the password policy.
    PasswordPolicyViolation { message: String },
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => {
                ErrorKind::Validation
            }
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::AuthenticationFailed { .. } => ErrorKind::Auth,
            Self::Unauthorized { .. } => ErrorKind::Forbidden,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn conflict(rule: &str, message: impl Into<String>) -> Self {
        Self::Conflict {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role}")
            }
            Self::Conflict { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::ServiceUnavailable { message }
            | Self::PasswordPolicyViolation { message } => write!(f, "{message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The actor could not be authenticated.
    AuthenticationFailed { reason: String },
    /// The actor lacks the role or ownership the action requires.
    Unauthorized {
        action: String,
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed | TokenError::BadSignature | TokenError::Expired => {
                Self::AuthenticationFailed {
                    reason: String::from("Invalid or expired token"),
                }
            }
            TokenError::InvalidKey | TokenError::Encoding(_) => Self::AuthenticationFailed {
                reason: String::from("Token could not be processed"),
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidRole(_) => "role",
        DomainError::InvalidEmailFormat { .. } => "email",
        DomainError::InvalidRegistrationNumber(_) => "registration_number",
        DomainError::InvalidFacultyId(_) => "faculty_id",
        DomainError::InvalidName(_) => "name",
        DomainError::MissingProfileField { field, .. } => *field,
        DomainError::InvalidCourseCode(_) => "code",
        DomainError::InvalidCreditHours(_) => "credit_hours",
        DomainError::InvalidSemester(_) => "semester",
        DomainError::InvalidSessionDate(_) => "date",
        DomainError::InvalidSessionTime(_) => "time",
        DomainError::InvalidDuration(_) => "duration_minutes",
        DomainError::InvalidStatus(_) => "status",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Maps a violated UNIQUE constraint to the conflict rule and message
/// reported to clients.
fn unique_conflict(constraint: &str) -> ApiError {
    let (rule, message): (&str, &str) = match constraint {
        "users.email" => ("duplicate_email", "An account with this e-mail already exists"),
        "students.registration_number" => (
            "duplicate_registration_number",
            "A student with this registration number already exists",
        ),
        "faculty.faculty_id" => (
            "duplicate_faculty_id",
            "A faculty member with this faculty ID already exists",
        ),
        "admins.singleton" => ("admin_already_exists", "An admin account already exists"),
        "courses.code" => (
            "duplicate_course_code",
            "A course with this code already exists",
        ),
        "course_sessions.session_code" => (
            "session_code_collision",
            "Could not allocate a unique session code",
        ),
        c if c.starts_with("student_course.") => (
            "duplicate_enrollment",
            "Student is already enrolled in this course",
        ),
        _ => ("unique_constraint", "The record conflicts with an existing one"),
    };
    ApiError::conflict(rule, message)
}

/// Translates a persistence error into an API error.
///
/// Unique violations become conflicts named after the violated constraint.
/// Pool exhaustion, lock timeouts and connection failures become
/// `ServiceUnavailable`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation { constraint } => unique_conflict(&constraint),
        PersistenceError::PoolTimeout(msg)
        | PersistenceError::DatabaseBusy(msg)
        | PersistenceError::DatabaseConnectionFailed(msg) => {
            ApiError::ServiceUnavailable {
                message: format!("Database unavailable: {msg}"),
            }
        }
        PersistenceError::NotEnrolled {
            registration_number,
        } => ApiError::invalid_input(
            "registration_number",
            format!("Student {registration_number} is not enrolled in this course"),
        ),
        PersistenceError::InvalidVerificationCode => {
            ApiError::invalid_input("code", "Invalid or expired verification code")
        }
        PersistenceError::NotFound(msg) => ApiError::not_found("Record", format!("{msg} not found")),
        PersistenceError::ForeignKeyViolation(msg) => {
            ApiError::invalid_input("reference", format!("Referenced record does not exist: {msg}"))
        }
        other @ (PersistenceError::DatabaseError(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::HashingFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled) => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

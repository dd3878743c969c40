// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;

/// Prefix `SQLite` puts in front of the violated columns of a UNIQUE constraint.
const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

/// Messages `SQLite` reports for `SQLITE_BUSY` and `SQLITE_LOCKED` once the
/// busy timeout has run out.
const BUSY_MESSAGES: [&str; 2] = ["database is locked", "database table is locked"];

fn is_busy_message(message: &str) -> bool {
    BUSY_MESSAGES.iter().any(|busy| message.starts_with(busy))
}

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// No pooled connection became available before the checkout timeout.
    PoolTimeout(String),
    /// Another connection held the database lock past the busy timeout.
    DatabaseBusy(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A UNIQUE constraint rejected a write.
    ///
    /// `constraint` names the violated columns as `table.column`, for
    /// example `users.email` or
    /// `student_course.course_id, student_course.registration_number`.
    UniqueViolation { constraint: String },
    /// A FOREIGN KEY constraint rejected a write.
    ForeignKeyViolation(String),
    /// Password or code hashing failed.
    HashingFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A student in an attendance batch is not enrolled in the course.
    NotEnrolled { registration_number: String },
    /// No active verification code matched.
    InvalidVerificationCode,
    /// The requested resource was not found.
    NotFound(String),
}

impl PersistenceError {
    /// Returns the violated constraint if this is a unique violation.
    #[must_use]
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::PoolTimeout(msg) => write!(f, "Database connection pool timeout: {msg}"),
            Self::DatabaseBusy(msg) => write!(f, "Database busy: {msg}"),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::UniqueViolation { constraint } => {
                write!(f, "Unique constraint violated: {constraint}")
            }
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key constraint violated: {msg}"),
            Self::HashingFailed(msg) => write!(f, "Hashing failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotEnrolled {
                registration_number,
            } => write!(
                f,
                "Student {registration_number} is not enrolled in this course"
            ),
            Self::InvalidVerificationCode => write!(f, "Invalid or expired verification code"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                let message: &str = info.message();
                Self::UniqueViolation {
                    constraint: message
                        .strip_prefix(UNIQUE_FAILED_PREFIX)
                        .unwrap_or(message)
                        .to_string(),
                }
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(_, info) if is_busy_message(info.message()) => {
                Self::DatabaseBusy(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for PersistenceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::PoolTimeout(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::HashingFailed(err.to_string())
    }
}

// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the attendance tracking service.
//!
//! Accounts, courses, enrollments, class sessions, attendance records and
//! verification codes are stored in `SQLite` through Diesel. The schema is
//! created by embedded migrations at startup.
//!
//! ## Connections
//!
//! [`Persistence`] owns an r2d2 pool. Each public method checks out exactly
//! one connection for its duration and never nests a second checkout, so a
//! pool of size one (used for in-memory databases) cannot deadlock. A
//! checkout that exceeds the configured timeout returns
//! [`PersistenceError::PoolTimeout`].
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] creates a fresh shared-cache in-memory
//! database per call, named from an atomic counter so tests never collide.

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
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use attendance_domain::RoleProfile;
use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AttendanceMark, CourseAttendanceData, CourseData, CourseSessionData, CourseSummaryData,
    CredentialData, EnrolledStudentData, EnrollmentData, NewCourse, NewCourseSession,
    SectionData, SessionAttendanceData, SessionSummaryData, StudentAttendanceCounts,
    StudentCourseData, StudentData, UserData,
};
pub use error::PersistenceError;
pub use mutations::verification::MAX_CODE_ATTEMPTS;

use backend::sqlite::SqlitePool;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// bcrypt's minimum cost. In-memory databases only back tests, where
/// hashing speed matters more than work factor.
const IN_MEMORY_HASH_COST: u32 = 4;

/// Purpose tag stored with password reset codes.
pub const PASSWORD_RESET_PURPOSE: &str = "password_reset";

/// Connection pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of open connections.
    pub max_size: u32,
    /// How long a checkout waits for a free connection. Also used as the
    /// `SQLite` busy timeout.
    pub connection_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 8,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

/// Formats a timestamp the way `SQLite`'s `CURRENT_TIMESTAMP` does
/// (`YYYY-MM-DD HH:MM:SS`, UTC), so stored values compare as text.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be rendered.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|e| PersistenceError::QueryFailed(format!("Invalid timestamp {at}: {e}")))
}

/// Cloneable handle to the attendance database.
#[derive(Clone)]
pub struct Persistence {
    pool: SqlitePool,
    hash_cost: u32,
    /// Hash verified when a login names an unknown e-mail, so both failure
    /// paths do the same bcrypt work.
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("pool_size", &self.pool.max_size())
            .field("hash_cost", &self.hash_cost)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let pool: SqlitePool = backend::sqlite::build_pool(
            &shared_memory_url,
            1,
            PoolSettings::default().connection_timeout,
            true,
        )?;
        Self::initialize(pool, IN_MEMORY_HASH_COST, false)
    }

    /// Creates a persistence adapter over a file-based `SQLite` database,
    /// creating and migrating it as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(
        path: P,
        settings: &PoolSettings,
    ) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let pool: SqlitePool = backend::sqlite::build_pool(
            path_str,
            settings.max_size,
            settings.connection_timeout,
            false,
        )?;
        Self::initialize(pool, bcrypt::DEFAULT_COST, true)
    }

    fn initialize(pool: SqlitePool, hash_cost: u32, wal: bool) -> Result<Self, PersistenceError> {
        {
            let mut conn: PooledConnection<ConnectionManager<SqliteConnection>> = pool.get()?;
            if wal {
                backend::sqlite::enable_wal_mode(&mut conn)?;
            }
            backend::sqlite::run_migrations(&mut conn)?;
            backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;
        }

        let dummy_hash: String = bcrypt::hash("attendance-dummy-password", hash_cost)?;
        info!(hash_cost, "Persistence initialized");

        Ok(Self {
            pool,
            hash_cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError> {
        Ok(self.pool.get()?)
    }

    /// Checks that a connection can be obtained and answers a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable.
    pub fn ping(&self) -> Result<(), PersistenceError> {
        backend::sqlite::ping(&mut *self.conn()?)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut *self.conn()?)
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    /// Hashes a password or code with the configured bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    pub fn hash_secret(&self, secret: &str) -> Result<String, PersistenceError> {
        Ok(bcrypt::hash(secret, self.hash_cost)?)
    }

    /// Verifies `password` against `hash`.
    ///
    /// When `hash` is `None` the dummy hash is verified instead and the
    /// result is always `false`.
    #[must_use]
    pub fn verify_password(&self, password: &str, hash: Option<&str>) -> bool {
        match hash {
            Some(hash) => bcrypt::verify(password, hash).unwrap_or(false),
            None => {
                let _ = bcrypt::verify(password, &self.dummy_hash);
                false
            }
        }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user with its role profile and returns the new user ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` naming the violated
    /// constraint for a duplicate e-mail, registration number, faculty ID
    /// or second admin.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        profile: &RoleProfile,
    ) -> Result<i64, PersistenceError> {
        let password_hash: String = self.hash_secret(password)?;
        mutations::users::create_user(&mut *self.conn()?, name, email, &password_hash, profile)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut *self.conn()?, user_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut *self.conn()?, email)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialData>, PersistenceError> {
        queries::users::get_credentials_by_email(&mut *self.conn()?, email)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut *self.conn()?)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_student(
        &self,
        registration_number: &str,
    ) -> Result<Option<StudentData>, PersistenceError> {
        queries::users::get_student(&mut *self.conn()?, registration_number)
    }

    /// Hashes and stores a new password for the account.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the update fails.
    pub fn update_password(&self, email: &str, new_password: &str) -> Result<(), PersistenceError> {
        let password_hash: String = self.hash_secret(new_password)?;
        mutations::users::update_password(&mut *self.conn()?, email, &password_hash)
    }

    // ========================================================================
    // Sections, courses and enrollments
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_sections(&self) -> Result<Vec<SectionData>, PersistenceError> {
        queries::courses::list_sections(&mut *self.conn()?)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn section_exists(&self, section_id: i64) -> Result<bool, PersistenceError> {
        queries::courses::section_exists(&mut *self.conn()?, section_id)
    }

    /// Creates a course and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` for a duplicate code.
    pub fn create_course(&self, course: &NewCourse<'_>) -> Result<CourseData, PersistenceError> {
        let mut conn = self.conn()?;
        let course_id: i64 = mutations::courses::create_course(&mut conn, course)?;
        queries::courses::get_course(&mut conn, course_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Course {course_id}")))
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_course(&self, course_id: i64) -> Result<Option<CourseData>, PersistenceError> {
        queries::courses::get_course(&mut *self.conn()?, course_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_courses_for_faculty(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<CourseSummaryData>, PersistenceError> {
        queries::courses::list_courses_for_faculty(&mut *self.conn()?, faculty_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if already enrolled.
    pub fn enroll_student(
        &self,
        course_id: i64,
        registration_number: &str,
    ) -> Result<EnrollmentData, PersistenceError> {
        mutations::courses::enroll_student(&mut *self.conn()?, course_id, registration_number)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<EnrollmentData>, PersistenceError> {
        queries::courses::get_enrollment(&mut *self.conn()?, enrollment_id)
    }

    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool, PersistenceError> {
        mutations::courses::delete_enrollment(&mut *self.conn()?, enrollment_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_enrolled(
        &self,
        course_id: i64,
        registration_number: &str,
    ) -> Result<bool, PersistenceError> {
        queries::courses::is_enrolled(&mut *self.conn()?, course_id, registration_number)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_enrolled_students(
        &self,
        course_id: i64,
    ) -> Result<Vec<EnrolledStudentData>, PersistenceError> {
        queries::courses::list_enrolled_students(&mut *self.conn()?, course_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_student_courses(
        &self,
        registration_number: &str,
    ) -> Result<Vec<StudentCourseData>, PersistenceError> {
        queries::courses::list_student_courses(&mut *self.conn()?, registration_number)
    }

    // ========================================================================
    // Sessions and attendance
    // ========================================================================

    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the code is taken.
    pub fn create_session(
        &self,
        session: &NewCourseSession<'_>,
    ) -> Result<CourseSessionData, PersistenceError> {
        mutations::attendance::create_session(&mut *self.conn()?, session)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session(&self, session_id: i64) -> Result<Option<CourseSessionData>, PersistenceError> {
        queries::attendance::get_session(&mut *self.conn()?, session_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_sessions_for_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<SessionSummaryData>, PersistenceError> {
        queries::attendance::list_sessions_for_course(&mut *self.conn()?, course_id)
    }

    /// Upserts an attendance batch for `session` stamped with `marked_at`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotEnrolled` if any student is not in the
    /// course; nothing is written in that case.
    pub fn mark_attendance(
        &self,
        session: &CourseSessionData,
        marks: &[AttendanceMark],
        marked_by: &str,
        marked_at: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        let stamp: String = format_timestamp(marked_at)?;
        let (marked_date, marked_time) = stamp.split_once(' ').unwrap_or((stamp.as_str(), ""));
        mutations::attendance::mark_attendance(
            &mut *self.conn()?,
            session,
            marks,
            marked_by,
            marked_date,
            marked_time,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn course_attendance(&self, course_id: i64) -> Result<CourseAttendanceData, PersistenceError> {
        queries::attendance::course_attendance(&mut *self.conn()?, course_id)
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn student_session_attendance(
        &self,
        course_id: i64,
        registration_number: &str,
    ) -> Result<Vec<SessionAttendanceData>, PersistenceError> {
        queries::attendance::student_session_attendance(
            &mut *self.conn()?,
            course_id,
            registration_number,
        )
    }

    // ========================================================================
    // Verification codes
    // ========================================================================

    /// Stores the hash of a password reset code valid until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or a write fails.
    pub fn create_password_reset_code(
        &self,
        email: &str,
        code: &str,
        expires_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let code_hash: String = self.hash_secret(code)?;
        debug!(email, "Storing password reset code");
        mutations::verification::create_verification_code(
            &mut *self.conn()?,
            email,
            PASSWORD_RESET_PURPOSE,
            &code_hash,
            &format_timestamp(expires_at)?,
            &format_timestamp(now)?,
        )
    }

    /// Consumes a password reset code and sets the new password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidVerificationCode` if the code is
    /// wrong, expired or already used.
    pub fn reset_password_with_code(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let password_hash: String = self.hash_secret(new_password)?;
        mutations::verification::reset_password_with_code(
            &mut *self.conn()?,
            email,
            PASSWORD_RESET_PURPOSE,
            code,
            &password_hash,
            &format_timestamp(now)?,
        )
    }
}

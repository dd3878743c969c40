// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use attendance_domain::Role;
use attendance_persistence::{CourseData, Persistence, UserData};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::{ApiError, AuthError};
use crate::token::{TokenClaims, TokenError, TokenSigner};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid e-mail or password";

/// An authenticated user, as carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// Internal user ID.
    pub user_id: i64,
    pub role: Role,
    /// Registration number for students, faculty ID for faculty.
    pub role_id: Option<String>,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(user_id: i64, role: Role, role_id: Option<String>) -> Self {
        Self {
            user_id,
            role,
            role_id,
        }
    }

    /// The faculty ID of a faculty actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not faculty or its token carries no
    /// faculty ID.
    pub fn faculty_id(&self, action: &str) -> Result<&str, AuthError> {
        AuthorizationService::require_role(self, Role::Faculty, action)?;
        self.role_id
            .as_deref()
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Token carries no faculty ID"),
            })
    }
}

impl From<TokenClaims> for AuthenticatedActor {
    fn from(claims: TokenClaims) -> Self {
        Self::new(claims.sub, claims.role, claims.role_id)
    }
}

/// Authorization service for enforcing role and ownership rules.
///
/// Every check returns an error rather than filtering results, so a caller
/// without access sees a 403 and never an empty list.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor has `required`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for any other role.
    pub fn require_role(
        actor: &AuthenticatedActor,
        required: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == required {
            return Ok(());
        }
        warn!(
            user_id = actor.user_id,
            role = %actor.role,
            action,
            "Role check failed"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: format!("the {required} role"),
        })
    }

    /// Checks that the actor is the faculty member who owns `course`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the actor is not faculty or
    /// does not own the course.
    pub fn require_course_owner(
        actor: &AuthenticatedActor,
        course: &CourseData,
        action: &str,
    ) -> Result<(), AuthError> {
        let faculty_id: &str = actor.faculty_id(action)?;
        if faculty_id == course.faculty_id {
            return Ok(());
        }
        warn!(
            faculty_id,
            course_id = course.course_id,
            action,
            "Course ownership check failed"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: format!("ownership of course {}", course.code),
        })
    }

    /// Checks that the actor may read a student's records.
    ///
    /// Students may read only their own. Faculty and the admin may read any;
    /// course-scoped reads additionally check ownership.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if a student asks for another
    /// student's records.
    pub fn authorize_student_records(
        actor: &AuthenticatedActor,
        registration_number: &str,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Student if actor.role_id.as_deref() == Some(registration_number) => Ok(()),
            Role::Student => {
                warn!(
                    user_id = actor.user_id,
                    registration_number, action, "Student asked for another student's records"
                );
                Err(AuthError::Unauthorized {
                    action: action.to_string(),
                    required_role: String::from("the student's own account"),
                })
            }
            Role::Faculty | Role::Admin => Ok(()),
        }
    }
}

/// Authentication service for login and token verification.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Checks an e-mail and password and returns the matching user.
    ///
    /// An unknown e-mail still verifies a dummy hash, and both failure
    /// paths return the same message.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` with [`INVALID_CREDENTIALS`]
    /// if the credentials do not match, or an error if the lookup fails.
    pub fn login(
        persistence: &Persistence,
        email: &str,
        password: &str,
    ) -> Result<UserData, ApiError> {
        let email: String = email.trim().to_ascii_lowercase();
        let credentials = persistence
            .get_credentials_by_email(&email)
            .map_err(crate::error::translate_persistence_error)?;

        let verified: bool = persistence.verify_password(
            password,
            credentials.as_ref().map(|c| c.password_hash.as_str()),
        );

        let Some(credentials) = credentials.filter(|_| verified) else {
            warn!(email = %email, "Login failed");
            return Err(ApiError::AuthenticationFailed {
                reason: String::from(INVALID_CREDENTIALS),
            });
        };

        let user: UserData = persistence
            .get_user_by_id(credentials.user_id)
            .map_err(crate::error::translate_persistence_error)?
            .ok_or_else(|| ApiError::Internal {
                message: format!("User {} vanished during login", credentials.user_id),
            })?;

        info!(user_id = user.user_id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Verifies a bearer token and returns the actor it names.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is malformed,
    /// tampered with or expired.
    pub fn authenticate(
        signer: &TokenSigner,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedActor, AuthError> {
        let claims: TokenClaims = signer.verify(token, now).map_err(|e: TokenError| {
            debug!(error = %e, "Token rejected");
            AuthError::from(e)
        })?;
        Ok(AuthenticatedActor::from(claims))
    }
}

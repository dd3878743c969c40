// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration, login and the caller's own profile.

use attendance_domain::{
    DomainError, EmailAddress, FacultyId, RegistrationNumber, Role, RoleProfile, validate_name,
};
use attendance_persistence::{Persistence, UserData};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::config::ApiConfig;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::user_view;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
};

/// Returns a trimmed, non-empty profile field or a missing-field error.
fn required_field(
    value: Option<&String>,
    role: Role,
    field: &'static str,
) -> Result<String, ApiError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| translate_domain_error(DomainError::MissingProfileField { role, field }))
}

/// Builds the role profile for a registration.
fn build_profile(role: Role, request: &RegisterRequest) -> Result<RoleProfile, ApiError> {
    match role {
        Role::Student => {
            let raw: String = required_field(
                request.registration_number.as_ref(),
                role,
                "registration_number",
            )?;
            let registration_number: RegistrationNumber =
                RegistrationNumber::parse(&raw).map_err(translate_domain_error)?;
            let faculty_name: String =
                required_field(request.faculty_name.as_ref(), role, "faculty_name")?;
            Ok(RoleProfile::Student {
                registration_number,
                faculty_name,
            })
        }
        Role::Faculty => {
            let raw: String = required_field(request.faculty_id.as_ref(), role, "faculty_id")?;
            let faculty_id: FacultyId = FacultyId::parse(&raw).map_err(translate_domain_error)?;
            let department: String =
                required_field(request.department.as_ref(), role, "department")?;
            Ok(RoleProfile::Faculty {
                faculty_id,
                department,
            })
        }
        Role::Admin => Ok(RoleProfile::Admin),
    }
}

/// Registers an account with its role profile.
///
/// Validation runs in order: role, name, e-mail pattern for the role,
/// role-specific fields, then the password policy. Uniqueness is left to
/// the database constraints.
///
/// # Errors
///
/// Returns `InvalidInput` or `PasswordPolicyViolation` for bad input and
/// `Conflict` for a duplicate e-mail, registration number, faculty ID or a
/// second admin.
pub fn register(
    persistence: &Persistence,
    config: &ApiConfig,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let role: Role = request.role.parse().map_err(translate_domain_error)?;
    let name: &str = request.name.trim();
    validate_name(name).map_err(translate_domain_error)?;
    let email: EmailAddress = EmailAddress::parse_for_role(&request.email, role, &config.email_domain)
        .map_err(translate_domain_error)?;
    let profile: RoleProfile = build_profile(role, request)?;

    PasswordPolicy::default().validate(&request.password, email.as_str(), name)?;

    let user_id: i64 = persistence
        .create_user(name, email.as_str(), &request.password, &profile)
        .map_err(translate_persistence_error)?;
    let user: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("User {user_id} missing after registration"),
        })?;

    info!(user_id, role = %role, "Account registered");

    Ok(RegisterResponse {
        success: true,
        message: format!("Registered {} account for {}", role, user.email),
        user: user_view(user),
    })
}

/// Authenticates with e-mail and password and issues a bearer token.
///
/// # Errors
///
/// Returns `AuthenticationFailed` with the same message for an unknown
/// e-mail and a wrong password.
pub fn login(
    persistence: &Persistence,
    config: &ApiConfig,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let user: UserData = AuthenticationService::login(persistence, &request.email, &request.password)?;
    let role: Role = user.role.parse().map_err(|_| ApiError::Internal {
        message: format!("User {} has unknown role '{}'", user.user_id, user.role),
    })?;

    let (token, claims) = config
        .tokens
        .issue(user.user_id, role, user.role_id(), now)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to issue token: {e}"),
        })?;

    let expires_at: String = OffsetDateTime::from_unix_timestamp(claims.exp)
        .ok()
        .and_then(|at| at.format(&Rfc3339).ok())
        .ok_or_else(|| ApiError::Internal {
            message: format!("Token expiry {} is out of range", claims.exp),
        })?;

    Ok(LoginResponse {
        success: true,
        token,
        expires_at,
        user: user_view(user),
    })
}

/// Returns the caller's own account.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the account behind the token no
/// longer exists.
pub fn me(persistence: &Persistence, actor: &AuthenticatedActor) -> Result<MeResponse, ApiError> {
    let user: UserData = persistence
        .get_user_by_id(actor.user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from("Account no longer exists"),
        })?;

    Ok(MeResponse {
        success: true,
        user: user_view(user),
    })
}

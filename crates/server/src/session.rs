// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer token authentication and role gating.
//!
//! [`authenticate`] verifies the `Authorization: Bearer <token>` header and
//! stores the [`AuthenticatedActor`] in the request extensions. The role
//! layers run after it, and handlers read the actor with [`SessionActor`].

use attendance_api::{ApiError, AuthenticatedActor, AuthenticationService, AuthorizationService};
use attendance_domain::Role;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

fn unauthenticated(message: &str) -> HttpError {
    HttpError::new(StatusCode::UNAUTHORIZED, message)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, HttpError> {
    let value: &str = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            unauthenticated("Missing Authorization header")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            unauthenticated("Invalid Authorization header")
        })?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Authorization header is not a bearer token");
            unauthenticated("Invalid Authorization header format. Expected: 'Bearer <token>'")
        })
}

/// Verifies the bearer token and attaches the actor to the request.
///
/// # Errors
///
/// Returns 401 if the header is missing or the token is invalid or expired.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let actor: AuthenticatedActor = {
        let token: &str = bearer_token(request.headers())?;
        AuthenticationService::authenticate(&state.config.tokens, token, OffsetDateTime::now_utc())
            .map_err(|e| {
                warn!(error = %e, "Token validation failed");
                HttpError::from(ApiError::from(e))
            })?
    };

    debug!(user_id = actor.user_id, role = %actor.role, "Token validated");
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn check_role(request: &Request, role: Role) -> Result<(), HttpError> {
    let actor: &AuthenticatedActor = request
        .extensions()
        .get::<AuthenticatedActor>()
        .ok_or_else(|| unauthenticated("Authentication required"))?;
    AuthorizationService::require_role(actor, role, request.uri().path())
        .map_err(|e| HttpError::from(ApiError::from(e)))
}

/// Lets only faculty through.
///
/// # Errors
///
/// Returns 403 for any other role.
pub async fn require_faculty(request: Request, next: Next) -> Result<Response, HttpError> {
    check_role(&request, Role::Faculty)?;
    Ok(next.run(request).await)
}

/// Lets only the admin through.
///
/// # Errors
///
/// Returns 403 for any other role.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, HttpError> {
    check_role(&request, Role::Admin)?;
    Ok(next.run(request).await)
}

/// Extractor for the actor attached by [`authenticate`].
pub struct SessionActor(pub AuthenticatedActor);

impl<S> FromRequestParts<S> for SessionActor
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedActor>()
            .cloned()
            .map(Self)
            .ok_or_else(|| unauthenticated("Authentication required"))
    }
}

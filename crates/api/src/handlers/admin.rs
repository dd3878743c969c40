// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use attendance_domain::Role;
use attendance_persistence::Persistence;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::handlers::user_view;
use crate::request_response::{ListUsersResponse, UserView};

/// Lists every account, ordered by role then name. Admin only.
///
/// # Errors
///
/// Returns `Unauthorized` for anyone but the admin.
pub fn list_users(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "list_users")?;

    let users: Vec<UserView> = persistence
        .list_users()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(user_view)
        .collect();

    Ok(ListUsersResponse {
        success: true,
        users,
    })
}

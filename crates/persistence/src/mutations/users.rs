// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account mutations.

use attendance_domain::RoleProfile;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::{admins, faculty, students, users};
use crate::error::PersistenceError;

/// Creates a user and its role profile row in one transaction.
///
/// Uniqueness of the e-mail, registration number, faculty ID and the
/// single admin is enforced by the schema; a violation rolls back both
/// rows and surfaces as `PersistenceError::UniqueViolation`.
///
/// # Errors
///
/// Returns an error if either insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password_hash: &str,
    profile: &RoleProfile,
) -> Result<i64, PersistenceError> {
    let role: &str = profile.role().as_str();
    info!(email, role, "Creating user");

    let user_id: i64 = conn.immediate_transaction(|conn| {
        let user_id: i64 = diesel::insert_into(users::table)
            .values((
                users::name.eq(name),
                users::email.eq(email),
                users::password_hash.eq(password_hash),
                users::role.eq(role),
            ))
            .returning(users::user_id)
            .get_result(conn)?;

        match profile {
            RoleProfile::Student {
                registration_number,
                faculty_name,
            } => {
                diesel::insert_into(students::table)
                    .values((
                        students::user_id.eq(user_id),
                        students::registration_number.eq(registration_number.as_str()),
                        students::faculty_name.eq(faculty_name),
                    ))
                    .execute(conn)?;
            }
            RoleProfile::Faculty {
                faculty_id,
                department,
            } => {
                diesel::insert_into(faculty::table)
                    .values((
                        faculty::user_id.eq(user_id),
                        faculty::faculty_id.eq(faculty_id.as_str()),
                        faculty::department.eq(department),
                    ))
                    .execute(conn)?;
            }
            RoleProfile::Admin => {
                diesel::insert_into(admins::table)
                    .values(admins::user_id.eq(user_id))
                    .execute(conn)?;
            }
        }

        Ok::<i64, PersistenceError>(user_id)
    })?;

    info!(user_id, role, "User created");
    Ok(user_id)
}

/// Replaces a user's password hash.
///
/// # Errors
///
/// Returns an error if the update fails or the user does not exist.
pub fn update_password(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(users::table)
        .filter(users::email.eq(email))
        .set(users::password_hash.eq(password_hash))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("User {email}")));
    }

    info!(email, "Password updated");
    Ok(())
}

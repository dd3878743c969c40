// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and profile queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{CredentialData, StudentData, UserData};
use crate::diesel_schema::{faculty, students, users};
use crate::error::PersistenceError;

type UserRow = (
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Users left-joined with both profile tables. A user has at most one
/// profile row, so each user yields exactly one row.
macro_rules! users_with_profiles {
    () => {
        users::table
            .left_join(students::table)
            .left_join(faculty::table)
            .select((
                users::user_id,
                users::name,
                users::email,
                users::role,
                users::created_at,
                students::registration_number.nullable(),
                students::faculty_name.nullable(),
                faculty::faculty_id.nullable(),
                faculty::department.nullable(),
            ))
    };
}

fn user_from_row(row: UserRow) -> UserData {
    let (
        user_id,
        name,
        email,
        role,
        created_at,
        registration_number,
        faculty_name,
        faculty_id,
        department,
    ) = row;
    UserData {
        user_id,
        name,
        email,
        role,
        registration_number,
        faculty_name,
        faculty_id,
        department,
        created_at,
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    let row: Option<UserRow> = users_with_profiles!()
        .filter(users::user_id.eq(user_id))
        .first(conn)
        .optional()?;
    Ok(row.map(user_from_row))
}

/// Retrieves a user by normalized e-mail address.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(email, "Looking up user by e-mail");

    let row: Option<UserRow> = users_with_profiles!()
        .filter(users::email.eq(email))
        .first(conn)
        .optional()?;
    Ok(row.map(user_from_row))
}

/// Retrieves the stored password hash for an e-mail address.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_credentials_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<CredentialData>, PersistenceError> {
    let row: Option<(i64, String, String)> = users::table
        .filter(users::email.eq(email))
        .select((users::user_id, users::email, users::password_hash))
        .first(conn)
        .optional()?;

    Ok(row.map(|(user_id, email, password_hash)| CredentialData {
        user_id,
        email,
        password_hash,
    }))
}

/// Lists every user ordered by role then name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users_with_profiles!()
        .order((users::role.asc(), users::name.asc(), users::user_id.asc()))
        .load(conn)?;
    Ok(rows.into_iter().map(user_from_row).collect())
}

/// Retrieves a student profile by registration number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_student(
    conn: &mut SqliteConnection,
    registration_number: &str,
) -> Result<Option<StudentData>, PersistenceError> {
    debug!(registration_number, "Looking up student");

    let row: Option<(i64, String, String, String, String)> = students::table
        .inner_join(users::table)
        .filter(students::registration_number.eq(registration_number))
        .select((
            students::user_id,
            students::registration_number,
            users::name,
            users::email,
            students::faculty_name,
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(
        |(user_id, registration_number, name, email, faculty_name)| StudentData {
            user_id,
            registration_number,
            name,
            email,
            faculty_name,
        },
    ))
}

// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-time verification code mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{info, warn};

use crate::diesel_schema::{users, verification_codes};
use crate::error::PersistenceError;

/// Stores a new code hash, invalidating any earlier unconsumed code for the
/// same e-mail and purpose.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn create_verification_code(
    conn: &mut SqliteConnection,
    email: &str,
    purpose: &str,
    code_hash: &str,
    expires_at: &str,
    now: &str,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let superseded: usize = diesel::update(verification_codes::table)
            .filter(verification_codes::email.eq(email))
            .filter(verification_codes::purpose.eq(purpose))
            .filter(verification_codes::consumed_at.is_null())
            .set(verification_codes::consumed_at.eq(now))
            .execute(conn)?;

        diesel::insert_into(verification_codes::table)
            .values((
                verification_codes::email.eq(email),
                verification_codes::purpose.eq(purpose),
                verification_codes::code_hash.eq(code_hash),
                verification_codes::expires_at.eq(expires_at),
            ))
            .execute(conn)?;

        info!(email, purpose, superseded, "Verification code issued");
        Ok(())
    })
}

/// Wrong guesses a single code tolerates before it is consumed.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Consumes the newest active code for `email` if `code` matches it and
/// replaces the account's password hash, in one transaction.
///
/// A mismatch is counted against the active code and committed. After
/// [`MAX_CODE_ATTEMPTS`] misses the code is consumed, so a new one must be
/// requested.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidVerificationCode` if there is no
/// unconsumed, unexpired code or the code does not match.
pub fn reset_password_with_code(
    conn: &mut SqliteConnection,
    email: &str,
    purpose: &str,
    code: &str,
    new_password_hash: &str,
    now: &str,
) -> Result<(), PersistenceError> {
    let accepted: bool = conn.immediate_transaction(|conn| {
        let active: Option<(i64, String, i32)> = verification_codes::table
            .filter(verification_codes::email.eq(email))
            .filter(verification_codes::purpose.eq(purpose))
            .filter(verification_codes::consumed_at.is_null())
            .filter(verification_codes::expires_at.gt(now))
            .order(verification_codes::code_id.desc())
            .select((
                verification_codes::code_id,
                verification_codes::code_hash,
                verification_codes::failed_attempts,
            ))
            .first(conn)
            .optional()?;

        let Some((code_id, code_hash, failed_attempts)) = active else {
            warn!(email, "No active verification code");
            return Ok(false);
        };

        if !bcrypt::verify(code, &code_hash).unwrap_or(false) {
            let failed_attempts: i32 = failed_attempts + 1;
            let exhausted: bool = failed_attempts >= MAX_CODE_ATTEMPTS;
            // Committed, not rolled back, so misses accumulate
            diesel::update(verification_codes::table)
                .filter(verification_codes::code_id.eq(code_id))
                .set((
                    verification_codes::failed_attempts.eq(failed_attempts),
                    verification_codes::consumed_at.eq(exhausted.then_some(now)),
                ))
                .execute(conn)?;
            warn!(email, code_id, failed_attempts, exhausted, "Verification code mismatch");
            return Ok(false);
        }

        let consumed: usize = diesel::update(verification_codes::table)
            .filter(verification_codes::code_id.eq(code_id))
            .filter(verification_codes::consumed_at.is_null())
            .set(verification_codes::consumed_at.eq(now))
            .execute(conn)?;
        if consumed != 1 {
            return Ok(false);
        }

        let updated: usize = diesel::update(users::table)
            .filter(users::email.eq(email))
            .set(users::password_hash.eq(new_password_hash))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("User {email}")));
        }

        info!(email, code_id, "Password reset with verification code");
        Ok(true)
    })?;

    if accepted {
        Ok(())
    } else {
        Err(PersistenceError::InvalidVerificationCode)
    }
}

// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password reset with one-time codes.

use attendance_persistence::{Persistence, UserData};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, translate_persistence_error};
use crate::notifier::CodeNotifier;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{MessageResponse, PasswordResetConfirmRequest, PasswordResetRequest};

const REQUEST_ACCEPTED: &str =
    "If an account exists for this e-mail, a verification code has been sent";

/// A random six digit code, zero-padded.
fn generate_code() -> String {
    format!("{:06}", rand::random::<u32>() % 1_000_000)
}

/// Issues a reset code for the account, if there is one.
///
/// The response is the same whether or not the e-mail is registered.
///
/// # Errors
///
/// Returns an error only if storing the code fails.
pub fn request_password_reset(
    persistence: &Persistence,
    config: &ApiConfig,
    notifier: &dyn CodeNotifier,
    request: &PasswordResetRequest,
    now: OffsetDateTime,
) -> Result<MessageResponse, ApiError> {
    let email: String = request.email.trim().to_ascii_lowercase();
    let user: Option<UserData> = persistence
        .get_user_by_email(&email)
        .map_err(translate_persistence_error)?;

    if user.is_some() {
        let code: String = generate_code();
        let expires_at: OffsetDateTime = now + config.reset_code_ttl;
        persistence
            .create_password_reset_code(&email, &code, expires_at, now)
            .map_err(translate_persistence_error)?;
        notifier.deliver(&email, &code, expires_at);
    } else {
        // Same bcrypt work as issuing a real code
        persistence
            .hash_secret(&generate_code())
            .map_err(translate_persistence_error)?;
        info!(email = %email, "Password reset requested for unknown e-mail");
    }

    Ok(MessageResponse {
        success: true,
        message: String::from(REQUEST_ACCEPTED),
    })
}

/// Sets a new password if `code` is the newest live code for the account.
///
/// # Errors
///
/// Returns `InvalidInput` for a wrong, expired or used code and
/// `PasswordPolicyViolation` if the new password is rejected.
pub fn confirm_password_reset(
    persistence: &Persistence,
    request: &PasswordResetConfirmRequest,
    now: OffsetDateTime,
) -> Result<MessageResponse, ApiError> {
    let email: String = request.email.trim().to_ascii_lowercase();
    let Some(user) = persistence
        .get_user_by_email(&email)
        .map_err(translate_persistence_error)?
    else {
        persistence.verify_password(request.code.trim(), None);
        warn!(email = %email, "Password reset confirmation for unknown e-mail");
        return Err(ApiError::invalid_input(
            "code",
            "Invalid or expired verification code",
        ));
    };

    PasswordPolicy::default().validate(&request.new_password, &user.email, &user.name)?;

    persistence
        .reset_password_with_code(&email, request.code.trim(), &request.new_password, now)
        .map_err(translate_persistence_error)?;

    info!(user_id = user.user_id, "Password reset");
    Ok(MessageResponse {
        success: true,
        message: String::from("Password has been reset"),
    })
}

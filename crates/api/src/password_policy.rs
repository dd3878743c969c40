// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! Applied at registration and when a password is reset.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match your {field}")]
    MatchesForbiddenField { field: String },
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password for the account with `email` and `name`.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password is too short, too
    /// simple, or equals the e-mail or name (case-insensitive).
    pub fn validate(
        &self,
        password: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let password_lower: String = password.to_lowercase();
        if password_lower == email.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("e-mail"),
            });
        }
        if password_lower == name.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("name"),
            });
        }

        Ok(())
    }

    /// Number of character classes present: uppercase, lowercase, digits
    /// and symbols.
    fn calculate_complexity(password: &str) -> usize {
        let has_uppercase: bool = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lowercase: bool = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit: bool = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol: bool = password
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace());

        [has_uppercase, has_lowercase, has_digit, has_symbol]
            .iter()
            .filter(|present| **present)
            .count()
    }
}

// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Policy knobs passed from the server's command line into the API layer.

use thiserror::Error;
use time::Duration;

use crate::token::TokenSigner;

/// Default university e-mail domain.
pub const DEFAULT_EMAIL_DOMAIN: &str = "giki.edu.pk";

/// Shortest accepted token signing secret, in bytes.
pub const MIN_TOKEN_SECRET_LENGTH: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token secret must be at least {MIN_TOKEN_SECRET_LENGTH} bytes")]
    TokenSecretTooShort,
    #[error("E-mail domain must not be empty")]
    EmptyEmailDomain,
    #[error("{0} must be positive")]
    NonPositiveDuration(&'static str),
}

/// Configuration shared by every API operation.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Domain every account e-mail must belong to, lowercased.
    pub email_domain: String,
    /// How long a password reset code stays valid.
    pub reset_code_ttl: Duration,
    /// Signs and verifies bearer tokens.
    pub tokens: TokenSigner,
}

impl ApiConfig {
    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is shorter than
    /// [`MIN_TOKEN_SECRET_LENGTH`], the domain is blank, or a duration is
    /// not positive.
    pub fn new(
        email_domain: &str,
        token_secret: &str,
        token_ttl: Duration,
        reset_code_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if token_secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ConfigError::TokenSecretTooShort);
        }
        let email_domain: String = email_domain.trim().to_ascii_lowercase();
        if email_domain.is_empty() {
            return Err(ConfigError::EmptyEmailDomain);
        }
        if !token_ttl.is_positive() {
            return Err(ConfigError::NonPositiveDuration("Token lifetime"));
        }
        if !reset_code_ttl.is_positive() {
            return Err(ConfigError::NonPositiveDuration("Reset code lifetime"));
        }

        Ok(Self {
            email_domain,
            reset_code_ttl,
            tokens: TokenSigner::new(token_secret.as_bytes(), token_ttl),
        })
    }
}

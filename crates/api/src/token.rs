// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signed bearer tokens.
//!
//! A token is `base64url(claims JSON) "." base64url(HMAC-SHA256(payload))`,
//! both parts unpadded. Tokens are stateless: the server keeps no session
//! table, and a token stays valid until `exp`.

use attendance_domain::Role;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

type HmacSha256 = Hmac<Sha256>;

/// Token verification and signing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature is invalid")]
    BadSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Signing key is invalid")]
    InvalidKey,
    #[error("Failed to encode token claims: {0}")]
    Encoding(String),
}

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Internal user ID.
    pub sub: i64,
    pub role: Role,
    /// Registration number for students, faculty ID for faculty.
    pub role_id: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Signs and verifies tokens with a shared HMAC key.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(key: &[u8], ttl: Duration) -> Self {
        Self {
            key: key.to_vec(),
            ttl,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::InvalidKey)
    }

    /// Issues a token for a user valid from `now` for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn issue(
        &self,
        user_id: i64,
        role: Role,
        role_id: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(String, TokenClaims), TokenError> {
        let claims: TokenClaims = TokenClaims {
            sub: user_id,
            role,
            role_id: role_id.map(str::to_string),
            iat: now.unix_timestamp(),
            exp: (now + self.ttl).unix_timestamp(),
        };

        let payload: Vec<u8> =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Encoding(e.to_string()))?;
        let payload_b64: String = URL_SAFE_NO_PAD.encode(payload);

        let mut mac: HmacSha256 = self.mac()?;
        mac.update(payload_b64.as_bytes());
        let signature_b64: String = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok((format!("{payload_b64}.{signature_b64}"), claims))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// The signature is checked in constant time before the payload is
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Malformed`, `TokenError::BadSignature` or
    /// `TokenError::Expired`.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> Result<TokenClaims, TokenError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature: Vec<u8> = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac: HmacSha256 = self.mac()?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let payload: Vec<u8> = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now.unix_timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

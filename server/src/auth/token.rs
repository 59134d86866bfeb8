//! Access token issuing and verification.
//!
//! Tokens are HMAC-signed JWTs carrying the principal id in `sub` plus
//! `iat`/`exp` in seconds since the Unix epoch.
//!
//! # Pre-conditions
//! - The `TokenConfig` has already been validated (non-empty secret, HMAC algorithm).
//!
//! # Post-conditions
//! - `verify` returns the principal id only if the signature, the algorithm,
//!   the expiry and the subject all check out.
//!
//! # Invariants
//! - Verification is stateless and does not modify any external state.
//! - The current time is always passed in; nothing here reads the system clock.
//! - Every rejection surfaces as the same `TokenError::InvalidToken`. The
//!   concrete reason is only logged at debug level.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::TokenConfig;
use crate::store::PrincipalId;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject claim containing the principal id as a decimal string.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Error returned by the token service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token failed verification for any reason.
    InvalidToken,
    /// A token could not be produced.
    Signing(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Signing(reason) => write!(f, "failed to sign token: {reason}"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Why a token was rejected. Only ever logged.
#[derive(Debug)]
enum Rejection {
    InvalidSignature,
    Expired,
    Malformed,
    MissingSubject,
    UnparseableSubject,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid signature"),
            Self::Expired => write!(f, "expired"),
            Self::Malformed => write!(f, "malformed token"),
            Self::MissingSubject => write!(f, "missing 'sub' claim"),
            Self::UnparseableSubject => write!(f, "'sub' claim is not a principal id"),
        }
    }
}

/// Issues and verifies access tokens with a fixed signing configuration.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret());
        let decoding_key = DecodingKey::from_secret(config.secret());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for `subject` that expires one TTL after `now`.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if the expiry overflows or encoding fails.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(self.config.ttl())
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let header = Header::new(self.config.algorithm());

        encode(&header, &claims, &self.encoding_key).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token at time `now` and return the principal id it names.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidToken` if verification fails for any reason.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<PrincipalId, TokenError> {
        self.check(token, now).map_err(|rejection| {
            tracing::debug!(reason = %rejection, "rejected access token");
            TokenError::InvalidToken
        })
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<PrincipalId, Rejection> {
        let mut validation = Validation::new(self.config.algorithm());
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_jwt_error)?;
        let claims = token_data.claims;

        if now.timestamp() >= claims.exp {
            return Err(Rejection::Expired);
        }
        if claims.sub.is_empty() {
            return Err(Rejection::MissingSubject);
        }

        // Only the canonical decimal form that `issue` produces is accepted.
        match claims.sub.parse::<PrincipalId>() {
            Ok(id) if id.to_string() == claims.sub => Ok(id),
            _ => Err(Rejection::UnparseableSubject),
        }
    }
}

/// Maps jsonwebtoken errors to a rejection reason.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> Rejection {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => Rejection::InvalidSignature,
        ErrorKind::ExpiredSignature => Rejection::Expired,
        ErrorKind::MissingRequiredClaim(_) => Rejection::MissingSubject,
        _ => Rejection::Malformed,
    }
}

//! Token signing configuration.
//!
//! # Pre-conditions
//! - The signing secret must be non-empty.
//! - The TTL must be a positive number of minutes.
//!
//! # Post-conditions
//! - `TokenConfig` instances are immutable once created.
//!
//! # Invariants
//! - Only symmetric HMAC algorithms are accepted, since the server holds a
//!   single shared secret for both signing and verification.

use chrono::TimeDelta;
use jsonwebtoken::Algorithm;

/// Error returned when token configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenConfigError {
    /// The signing secret is empty.
    EmptySecret,
    /// The algorithm is unknown or not an HMAC algorithm.
    UnsupportedAlgorithm(String),
    /// The TTL is zero, negative, or too large to represent.
    InvalidTtl(i64),
}

impl std::fmt::Display for TokenConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "signing secret must not be empty"),
            Self::UnsupportedAlgorithm(name) => {
                write!(f, "unsupported signing algorithm: {name} (expected HS256, HS384 or HS512)")
            }
            Self::InvalidTtl(minutes) => {
                write!(f, "token TTL must be a positive number of minutes, got {minutes}")
            }
        }
    }
}

impl std::error::Error for TokenConfigError {}

/// Signing configuration shared by every token the server issues.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    algorithm: Algorithm,
    ttl: TimeDelta,
}

impl TokenConfig {
    /// Create a new token configuration.
    ///
    /// # Errors
    /// Returns `TokenConfigError::EmptySecret` if the secret is empty,
    /// `UnsupportedAlgorithm` for non-HMAC algorithms, and `InvalidTtl`
    /// if `ttl_minutes` is not positive.
    pub fn new(
        secret: Vec<u8>,
        algorithm: Algorithm,
        ttl_minutes: i64,
    ) -> Result<Self, TokenConfigError> {
        if secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenConfigError::UnsupportedAlgorithm(format!(
                "{algorithm:?}"
            )));
        }
        if ttl_minutes <= 0 {
            return Err(TokenConfigError::InvalidTtl(ttl_minutes));
        }
        let ttl =
            TimeDelta::try_minutes(ttl_minutes).ok_or(TokenConfigError::InvalidTtl(ttl_minutes))?;

        Ok(Self {
            secret,
            algorithm,
            ttl,
        })
    }

    /// Create an HS256 configuration.
    pub fn hs256(secret: Vec<u8>, ttl_minutes: i64) -> Result<Self, TokenConfigError> {
        Self::new(secret, Algorithm::HS256, ttl_minutes)
    }

    /// Parse an algorithm identifier such as `"HS256"`.
    ///
    /// # Errors
    /// Returns `TokenConfigError::UnsupportedAlgorithm` for anything outside
    /// the HMAC family.
    pub fn parse_algorithm(name: &str) -> Result<Algorithm, TokenConfigError> {
        match name.trim() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            other => Err(TokenConfigError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

// The secret must never end up in logs.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish()
    }
}

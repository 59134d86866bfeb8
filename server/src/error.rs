//! Service-level errors.
//!
//! These are the only error kinds a caller of the auth or document services
//! ever sees. Several distinct internal causes deliberately collapse into one
//! kind (`Unauthorized`, `NotFound`, `InvalidCredentials`) so responses do not
//! reveal which check failed.

use crate::auth::{PasswordError, TokenError};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrong email or wrong password at login.
    InvalidCredentials,
    /// Missing, invalid or expired token, or a token whose principal is gone.
    Unauthorized,
    /// The email is already registered.
    Conflict,
    /// The document does not exist or belongs to someone else.
    NotFound,
    /// The request input has the wrong shape.
    Validation(String),
    /// Store or hashing failure. The message is for logs only.
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Incorrect email or password"),
            Self::Unauthorized => write!(f, "Invalid token"),
            Self::Conflict => write!(f, "Email already registered"),
            Self::NotFound => write!(f, "Document not found"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => Self::Conflict,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for Error {
    fn from(e: PasswordError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<TokenError> for Error {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken => Self::Unauthorized,
            TokenError::Signing(reason) => Self::Internal(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map() {
        assert_eq!(Error::from(StoreError::Conflict), Error::Conflict);
        assert!(matches!(
            Error::from(StoreError::LockPoisoned),
            Error::Internal(_)
        ));
    }

    #[test]
    fn test_token_errors_map() {
        assert_eq!(Error::from(TokenError::InvalidToken), Error::Unauthorized);
        assert_eq!(
            Error::from(TokenError::Signing("bad".to_string())),
            Error::Internal("bad".to_string())
        );
    }

    #[test]
    fn test_display_does_not_distinguish_causes() {
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
        assert_eq!(Error::Unauthorized.to_string(), "Invalid token");
        assert_eq!(Error::NotFound.to_string(), "Document not found");
    }
}

//! Password hashing.
//!
//! Passwords are hashed with Argon2id into self-describing PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<digest>`), so the salt and cost
//! parameters travel with the hash and need no separate column.
//!
//! # Invariants
//! - Verification reads its parameters from the stored hash, so hashes made
//!   with older cost settings keep verifying after the settings change.
//! - A malformed stored hash never verifies and never errors.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

/// Length of the random salt in bytes.
const SALT_LENGTH: usize = 16;

/// Error returned when a password cannot be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The Argon2 parameters are invalid.
    InvalidParams(String),
    /// Hashing itself failed.
    Hash(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParams(reason) => write!(f, "invalid argon2 parameters: {reason}"),
            Self::Hash(reason) => write!(f, "password hashing failed: {reason}"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hashes and verifies passwords.
///
/// Holds a precomputed hash of a random string so that logins for unknown
/// accounts can spend the same CPU time as logins with a wrong password.
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    dummy_hash: String,
}

impl PasswordService {
    /// Create a service with explicit Argon2 cost parameters.
    pub fn new(params: Params) -> Result<Self, PasswordError> {
        let mut service = Self {
            params,
            dummy_hash: String::new(),
        };
        let mut filler = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut filler);
        service.dummy_hash = service.hash(&format!("{filler:?}"))?;
        Ok(service)
    }

    /// Create a service with the crate's recommended Argon2id parameters.
    pub fn with_default_params() -> Result<Self, PasswordError> {
        Self::new(Params::DEFAULT)
    }

    /// Create a service with the cheapest parameters Argon2 allows.
    ///
    /// Only meant for tests.
    pub fn with_min_params() -> Result<Self, PasswordError> {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Self::new(params)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash in constant time.
    ///
    /// Returns `false` for a wrong password and for a malformed hash.
    #[must_use]
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Run a verification that always fails, at the cost of a real one.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::with_min_params().expect("min params are valid")
    }

    #[test]
    fn test_hash_then_verify() {
        let passwords = service();
        let hash = passwords.hash("correct horse battery").expect("hash");

        assert!(passwords.verify("correct horse battery", &hash));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let passwords = service();
        let hash = passwords.hash("pw123456").expect("hash");

        assert!(!passwords.verify("pw123457", &hash));
        assert!(!passwords.verify("", &hash));
    }

    #[test]
    fn test_hash_is_self_describing_and_salted() {
        let passwords = service();
        let first = passwords.hash("same-password").expect("hash");
        let second = passwords.hash("same-password").expect("hash");

        assert!(first.starts_with("$argon2id$v=19$"));
        assert!(!first.contains("same-password"));
        assert_ne!(first, second);
        assert!(passwords.verify("same-password", &second));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        let passwords = service();

        assert!(!passwords.verify("pw", ""));
        assert!(!passwords.verify("pw", "not-a-phc-string"));
        assert!(!passwords.verify("pw", "$argon2id$v=19$m=8,t=1,p=1$!!!$???"));
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let cheap = service();
        let hash = cheap.hash("portable").expect("hash");

        let other = PasswordService::new(
            Params::new(Params::MIN_M_COST * 2, 2, 1, None).expect("valid params"),
        )
        .expect("service");
        assert!(other.verify("portable", &hash));
    }

    #[test]
    fn test_unicode_and_long_passwords() {
        let passwords = service();
        let long = "x".repeat(4096);
        let unicode = "pässwörd-密码-🔑";

        let long_hash = passwords.hash(&long).expect("hash long");
        let unicode_hash = passwords.hash(unicode).expect("hash unicode");

        assert!(passwords.verify(&long, &long_hash));
        assert!(passwords.verify(unicode, &unicode_hash));
        assert!(!passwords.verify(unicode, &long_hash));
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        service().verify_dummy("anything");
    }

    #[test]
    fn test_password_error_display() {
        assert_eq!(
            PasswordError::Hash("boom".to_string()).to_string(),
            "password hashing failed: boom"
        );
        assert_eq!(
            PasswordError::InvalidParams("m too small".to_string()).to_string(),
            "invalid argon2 parameters: m too small"
        );
    }
}

//! Registration and login.
//!
//! # Post-conditions
//! - `register` hashes the password before anything reaches the store, and
//!   leaves the store untouched when the email is taken.
//! - `authenticate` fails the same way for an unknown email and for a wrong
//!   password, and spends a full hash verification in both cases.

use std::sync::Arc;

use super::{PasswordService, TokenService};
use crate::error::Error;
use crate::store::{Principal, Store};
use crate::time::Clock;
use crate::validation::{validate_email, validate_password};

pub struct AuthService {
    store: Arc<Store>,
    passwords: PasswordService,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    #[must_use]
    pub const fn new(
        store: Arc<Store>,
        passwords: PasswordService,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
            clock,
        }
    }

    /// Create an account.
    ///
    /// # Errors
    /// `Validation` for a malformed email or an out-of-range password,
    /// `Conflict` if the email is already registered.
    pub fn register(&self, email: &str, password: &str) -> Result<Principal, Error> {
        validate_email(email)?;
        validate_password(password)?;

        // Fast path; the unique constraint still decides races.
        if self.store.get_principal_by_email(email)?.is_some() {
            tracing::info!("registration rejected: email already registered");
            return Err(Error::Conflict);
        }

        let password_hash = self.passwords.hash(password)?;
        let principal = self
            .store
            .insert_principal(email, &password_hash)
            .inspect_err(|e| tracing::info!("registration rejected: {e}"))?;

        tracing::info!(principal_id = principal.id, "registered principal");
        Ok(principal)
    }

    /// Check credentials and issue an access token.
    ///
    /// # Errors
    /// `InvalidCredentials` if the email is unknown or the password is wrong.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<String, Error> {
        let Some(principal) = self.store.get_principal_by_email(email)? else {
            self.passwords.verify_dummy(password);
            tracing::debug!("login failed: unknown email");
            return Err(Error::InvalidCredentials);
        };

        if !self.passwords.verify(password, &principal.password_hash) {
            tracing::debug!(principal_id = principal.id, "login failed: wrong password");
            return Err(Error::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&principal.id.to_string(), self.clock.now())?;
        tracing::info!(principal_id = principal.id, "issued access token");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::testing::TestServices;
    use crate::time::Clock;

    #[test]
    fn test_register_returns_principal() {
        let services = TestServices::new();
        let principal = services
            .auth
            .register("a@x.com", "pw123456")
            .expect("register");

        assert_eq!(principal.id, 1);
        assert_eq!(principal.email, "a@x.com");
        assert_ne!(principal.password_hash, "pw123456");
        assert!(principal.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_register_duplicate_email_conflicts() {
        let services = TestServices::new();
        let first = services
            .auth
            .register("a@x.com", "pw123456")
            .expect("first register");

        let second = services.auth.register("a@x.com", "another-password");
        assert_eq!(second.err(), Some(Error::Conflict));

        let stored = services
            .store
            .get_principal_by_email("a@x.com")
            .expect("lookup")
            .expect("principal");
        assert_eq!(stored, first);
        assert_eq!(services.store.get_principal_by_id(2).expect("lookup"), None);
    }

    #[test]
    fn test_register_validates_input() {
        let services = TestServices::new();

        assert!(matches!(
            services.auth.register("not-an-email", "pw123456"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            services.auth.register("a@x.com", "short"),
            Err(Error::Validation(_))
        ));
        assert_eq!(
            services.store.get_principal_by_email("a@x.com").expect("lookup"),
            None
        );
    }

    #[test]
    fn test_authenticate_issues_verifiable_token() {
        let services = TestServices::new();
        let principal = services
            .auth
            .register("a@x.com", "pw123456")
            .expect("register");

        let token = services
            .auth
            .authenticate("a@x.com", "pw123456")
            .expect("login");

        assert_eq!(
            services.tokens.verify(&token, services.clock.now()),
            Ok(principal.id)
        );
    }

    #[test]
    fn test_authenticate_failures_are_indistinguishable() {
        let services = TestServices::new();
        services
            .auth
            .register("a@x.com", "pw123456")
            .expect("register");

        let wrong_password = services.auth.authenticate("a@x.com", "pw1234567");
        let unknown_email = services.auth.authenticate("b@x.com", "pw123456");
        let wrong_case = services.auth.authenticate("A@x.com", "pw123456");

        assert_eq!(wrong_password.err(), Some(Error::InvalidCredentials));
        assert_eq!(unknown_email.err(), Some(Error::InvalidCredentials));
        assert_eq!(wrong_case.err(), Some(Error::InvalidCredentials));
    }

    #[test]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn test_concurrent_registrations_single_winner() {
        let services = TestServices::new();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let auth = std::sync::Arc::clone(&services.auth);
                    scope.spawn(move || auth.register("race@x.com", "pw123456"))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("register thread"))
                .collect()
        });

        let winners = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(
            results
                .iter()
                .filter_map(|result| result.as_ref().err())
                .all(|e| *e == Error::Conflict)
        );
        assert!(
            services
                .store
                .get_principal_by_email("race@x.com")
                .expect("lookup")
                .is_some()
        );
    }
}

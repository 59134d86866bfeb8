//! Per-request identity resolution.
//!
//! Every protected operation goes through `IdentityResolver::resolve` exactly
//! once and carries the returned `Principal` for the rest of the request.
//!
//! # Invariants
//! - A bad token and a token naming a principal that no longer exists both
//!   fail with `Error::Unauthorized`.
//! - Store failures are not disguised as `Unauthorized`; they surface as
//!   `Error::Internal`.

use std::sync::Arc;

use super::TokenService;
use crate::error::Error;
use crate::store::{Principal, Store};
use crate::time::Clock;

pub struct IdentityResolver {
    tokens: TokenService,
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
}

impl IdentityResolver {
    #[must_use]
    pub const fn new(tokens: TokenService, store: Arc<Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens,
            store,
            clock,
        }
    }

    /// Resolve a bearer token to the principal it was issued for.
    ///
    /// # Errors
    /// `Unauthorized` if the token fails verification or its principal is gone.
    pub fn resolve(&self, token: &str) -> Result<Principal, Error> {
        let principal_id = self
            .tokens
            .verify(token, self.clock.now())
            .map_err(|_| Error::Unauthorized)?;

        match self.store.get_principal_by_id(principal_id)? {
            Some(principal) => Ok(principal),
            None => {
                tracing::debug!(principal_id, "token subject no longer exists");
                Err(Error::Unauthorized)
            }
        }
    }
}

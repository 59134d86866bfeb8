//! Shared fixtures for unit and end-to-end tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::{AuthService, IdentityResolver, PasswordService, TokenConfig, TokenService};
use crate::documents::DocumentService;
use crate::store::Store;
use crate::time::Clock;

pub const TEST_SECRET: &[u8] = b"test-secret-key-that-is-long-enough";
pub const TEST_TOKEN_TTL_MINUTES: i64 = 60;

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        // 2026-01-01 00:00:00 UTC
        let start = DateTime::from_timestamp(1_767_225_600, 0).expect("valid timestamp");
        Self {
            now: Mutex::new(start),
        }
    }

    #[allow(clippy::expect_used)]
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    #[allow(clippy::expect_used)]
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Every service wired to one in-memory store and one manual clock.
pub struct TestServices {
    pub store: Arc<Store>,
    pub clock: Arc<ManualClock>,
    pub tokens: TokenService,
    pub auth: Arc<AuthService>,
    pub identity: Arc<IdentityResolver>,
    pub documents: Arc<DocumentService>,
}

impl TestServices {
    #[must_use]
    #[allow(clippy::expect_used, clippy::disallowed_methods)]
    pub fn new() -> Self {
        let store = Arc::new(Store::open_in_memory().expect("open in-memory store"));
        let clock = Arc::new(ManualClock::new());
        let shared_clock: Arc<dyn Clock> = Arc::<ManualClock>::clone(&clock);

        let tokens = TokenService::new(
            TokenConfig::hs256(TEST_SECRET.to_vec(), TEST_TOKEN_TTL_MINUTES)
                .expect("valid token config"),
        );
        let passwords = PasswordService::with_min_params().expect("min params are valid");

        let auth = Arc::new(AuthService::new(
            Arc::clone(&store),
            passwords,
            tokens.clone(),
            Arc::clone(&shared_clock),
        ));
        let identity = Arc::new(IdentityResolver::new(
            tokens.clone(),
            Arc::clone(&store),
            Arc::clone(&shared_clock),
        ));
        let documents = Arc::new(DocumentService::new(Arc::clone(&store), shared_clock));

        Self {
            store,
            clock,
            tokens,
            auth,
            identity,
            documents,
        }
    }
}

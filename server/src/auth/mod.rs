//! Authentication module.
//!
//! Password hashing, access token issuing/verification, and the per-request
//! identity resolution that gates every document operation.
//!
//! # Pre-conditions
//! - The token configuration is loaded once at startup.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - Plaintext passwords are never stored or logged.

pub mod identity;
pub mod password;
pub mod service;
pub mod token;
pub mod token_config;

pub use identity::IdentityResolver;
pub use password::{PasswordError, PasswordService};
pub use service::AuthService;
pub use token::{TokenError, TokenService};
pub use token_config::{TokenConfig, TokenConfigError};

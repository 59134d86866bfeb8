// Life of a request:
// 1. JSON or form body comes in over HTTP
// 2. For protected routes, the bearer token is resolved to a principal
//    (token signature + expiry, then a principal lookup)
// 3. The principal is passed explicitly to the document service, which
//    scopes every query by owner
// 4. Service errors are mapped to status codes with a `{"detail": ...}` body
//
// System components:
//  - SQLite store (principals, documents)
//  - Argon2 password hashing
//  - JWT access tokens
//  - axum router

pub mod api;
pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod store;
pub mod time;
pub mod validation;

mod e2e_tests;
#[cfg(test)]
mod testing;

pub use error::Error;

//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full axum router
//! with an in-memory store and a manual clock.

#![cfg(test)]

mod helpers;

mod test_auth_me;
mod test_cors;
mod test_documents_crud;
mod test_health;
mod test_login;
mod test_owner_isolation;
mod test_register;
mod test_scenario;
mod test_token_expiry;

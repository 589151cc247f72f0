//! Integration tests for medrec-dash.
//!
//! The `integration` tests need a running PostgreSQL database and skip
//! unless DATABASE_URL is set. The `tui` tests drive the built binary in
//! headless mode against the in-memory mock.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
mod tui;

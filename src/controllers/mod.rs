//! Page controllers.
//!
//! One module per dashboard page. A controller takes the values the user
//! entered, builds statements through [`crate::sql`] and runs them through
//! the [`QueryExecutor`](crate::query::QueryExecutor). Controllers keep no
//! state between calls.

pub mod delete;
pub mod home;
pub mod insert;
pub mod query;
pub mod visualize;

pub use visualize::Chart;

//! Statement execution for the dashboard's pages.

pub mod executor;

pub use executor::{Execution, QueryExecutor};

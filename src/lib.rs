//! medrec-dash: a terminal dashboard for a medical records PostgreSQL database.
//!
//! The library exposes every module so integration tests can drive the
//! controllers and the headless UI directly.

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod safety;
pub mod sql;
pub mod tui;

//! Headless UI tests.

mod common;
mod headless_test;

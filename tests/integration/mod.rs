//! Tests against a real PostgreSQL database.
//!
//! Set DATABASE_URL to run them. The medical tests also need the
//! patient/doctor/hospital/insurance/treatment/visits tables loaded.

pub mod connection_test;
pub mod medical_test;
pub mod query_test;

use medrec_dash::app::Dashboard;
use medrec_dash::config::{ConnectionConfig, PoolConfig};
use medrec_dash::controllers::insert;
use medrec_dash::sql::Table;

/// Helper to get test database URL from environment.
pub fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Connects a dashboard to DATABASE_URL, if set.
pub async fn get_test_dashboard() -> Option<Dashboard> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    Dashboard::connect(&config, &PoolConfig::default()).await.ok()
}

/// Connects only when the medical tables exist.
pub async fn get_medical_dashboard() -> Option<Dashboard> {
    let dashboard = get_test_dashboard().await?;
    let columns = insert::columns(dashboard.db(), Table::Hospital).await.ok()?;
    if columns.is_empty() {
        eprintln!("Skipping test: medical tables not loaded");
        return None;
    }
    Some(dashboard)
}

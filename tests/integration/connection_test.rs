//! Connection and configuration integration tests.

use super::{get_test_dashboard, get_test_database_url};
use medrec_dash::app::Dashboard;
use medrec_dash::config::{Config, ConnectionConfig, PoolConfig};
use medrec_dash::error::DashError;
use medrec_dash::query::{Execution, QueryExecutor};

#[tokio::test]
async fn test_connect_and_select() {
    let Some(dashboard) = get_test_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let execution = QueryExecutor::new(dashboard.db())
        .execute("SELECT 1 AS one")
        .await
        .unwrap();
    match execution {
        Execution::Completed(output) => {
            assert_eq!(output.summary().split(' ').next(), Some("1"));
        }
        other => panic!("Expected completed query, got {other:?}"),
    }

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_connection_info_hides_password() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let config = ConnectionConfig::from_connection_string(&url).unwrap();
    let Ok(dashboard) = Dashboard::connect(&config, &PoolConfig::default()).await else {
        eprintln!("Skipping test: database unreachable");
        return;
    };

    let info = dashboard.connection_info().unwrap().to_string();
    if let Some(password) = &config.password {
        assert!(!info.contains(password.as_str()));
    }

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_wrong_database_is_connection_error() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let mut config = ConnectionConfig::from_connection_string(&url).unwrap();
    config.dbname = Some("medrec_dash_missing_db".to_string());
    let pool = PoolConfig {
        connect_retries: 1,
        ..PoolConfig::default()
    };

    let error = Dashboard::connect(&config, &pool).await.err().unwrap();
    assert!(matches!(error, DashError::Connection(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    let config = ConnectionConfig {
        host: Some("127.0.0.1".to_string()),
        port: 1,
        dbname: Some("medical".to_string()),
        ..ConnectionConfig::default()
    };
    let pool = PoolConfig {
        connect_retries: 1,
        acquire_timeout_secs: 2,
        ..PoolConfig::default()
    };

    let error = Dashboard::connect(&config, &pool).await.err().unwrap();
    assert_eq!(error.category(), "Connection Error");
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[heroku]\nhost = \"db.example.com\"\ndatabase = \"medical\"\nuser = \"clinic\"\n\n[pool]\nmax_connections = 2\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let database = config.database.unwrap();
    assert_eq!(database.dbname.as_deref(), Some("medical"));
    assert_eq!(database.port, 5432);
    assert_eq!(config.pool.max_connections, 2);
}

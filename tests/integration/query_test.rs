//! Query page integration tests.

use super::get_test_dashboard;
use medrec_dash::controllers::query;
use medrec_dash::db::{QueryOutput, Value};
use medrec_dash::error::DashError;
use medrec_dash::query::Execution;
use medrec_dash::safety::SafetyLevel;

#[tokio::test]
async fn test_select_returns_all_rows() {
    let Some(dashboard) = get_test_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let execution = query::submit(
        dashboard.db(),
        "SELECT n, n * 2 AS doubled FROM generate_series(1, 250) AS n",
    )
    .await
    .unwrap();

    let Execution::Completed(QueryOutput::Rows(result)) = execution else {
        panic!("Expected rows");
    };
    assert_eq!(result.row_count, 250);
    assert_eq!(result.rows[249][1], Value::Int(500));

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_destructive_sql_is_held_for_confirmation() {
    let Some(dashboard) = get_test_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let execution = query::submit(dashboard.db(), "DROP TABLE medrec_dash_not_here")
        .await
        .unwrap();
    match execution {
        Execution::NeedsConfirmation { classification, .. } => {
            assert_eq!(classification.level, SafetyLevel::Destructive);
        }
        other => panic!("Expected confirmation, got {other:?}"),
    }

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_bad_sql_is_query_error() {
    let Some(dashboard) = get_test_dashboard().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let error = query::submit(dashboard.db(), "SELECT * FROM medrec_dash_not_here")
        .await
        .unwrap_err();
    assert!(matches!(error, DashError::Query(_)));
    assert!(error.to_string().contains("medrec_dash_not_here"));

    dashboard.close().await.unwrap();
}

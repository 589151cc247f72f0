//! Insert, delete and chart tests against the medical tables.

use super::get_medical_dashboard;
use medrec_dash::controllers::{delete, insert, query, visualize, Chart};
use medrec_dash::db::{DatabaseClient, QueryOutput, Value};
use medrec_dash::error::DashError;
use medrec_dash::query::QueryExecutor;
use medrec_dash::sql::{Statement, Table};

async fn hospital_count(db: &dyn DatabaseClient) -> Value {
    let output = QueryExecutor::new(db)
        .run(&Statement::new("SELECT count(*) FROM hospital"))
        .await
        .unwrap();
    output.rows().unwrap().rows[0][0].clone()
}

#[tokio::test]
async fn test_insert_columns_skip_serial_keys() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };

    for table in Table::ALL {
        let columns = insert::columns(dashboard.db(), table).await.unwrap();
        assert!(!columns.is_empty(), "{table} has no insertable columns");
    }

    let patient = insert::columns(dashboard.db(), Table::Patient).await.unwrap();
    assert!(patient.iter().all(|c| c.name != "patient_id"));

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_insert_then_delete_hospital() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };
    let db = dashboard.db();
    let name = format!("Integration Test Hospital {}", std::process::id());

    let inserted = insert::insert(db, Table::Hospital, &format!("\"{name}\"")).await.unwrap();
    assert!(matches!(inserted, QueryOutput::Affected { rows_affected: 1 }));

    let statement = delete::prepare(db, Table::Hospital, &format!("name = '{name}'"))
        .await
        .unwrap();
    assert_eq!(
        statement.preview,
        format!("DELETE FROM hospital WHERE name = '{name}'")
    );

    let deleted = delete::execute(db, &statement).await.unwrap();
    assert!(matches!(deleted, QueryOutput::Affected { rows_affected: 1 }));

    let remaining = QueryExecutor::new(db)
        .run(&Statement::with_params(
            "SELECT count(*) FROM hospital WHERE name = $1",
            vec![name],
        ))
        .await
        .unwrap();
    assert_eq!(remaining.rows().unwrap().rows[0][0], Value::Int(0));

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_insert_wrong_type_is_rejected() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };

    let error = insert::insert(dashboard.db(), Table::Doctor, "Dr. Example, not-a-number")
        .await
        .unwrap_err();
    assert!(matches!(error, DashError::Query(_)));

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_delete_rejects_unknown_column() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };

    let error = delete::prepare(dashboard.db(), Table::Patient, "ssn = '123'")
        .await
        .unwrap_err();
    assert!(matches!(error, DashError::Input(_)));

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_delete_with_fractional_number_runs() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };
    let db = dashboard.db();

    let statement = delete::prepare(db, Table::Patient, "age = 3.5 AND patient_id = -1")
        .await
        .unwrap();
    assert_eq!(
        statement.preview,
        "DELETE FROM patient WHERE age = 3.5 AND patient_id = -1"
    );

    let deleted = delete::execute(db, &statement).await.unwrap();
    assert_eq!(deleted, QueryOutput::Affected { rows_affected: 0 });

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_multiple_statements_are_rejected_whole() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };
    let db = dashboard.db();

    let before = hospital_count(db).await;
    let error = query::confirm(db, "SELECT 1; DELETE FROM hospital")
        .await
        .unwrap_err();
    assert!(matches!(error, DashError::Query(_)));
    assert_eq!(hospital_count(db).await, before);

    dashboard.close().await.unwrap();
}

#[tokio::test]
async fn test_every_chart_generates() {
    let Some(dashboard) = get_medical_dashboard().await else {
        return;
    };

    for chart in Chart::ALL {
        let data = visualize::generate(dashboard.db(), chart).await.unwrap();
        assert_eq!(data.kind, chart.kind());
        assert_eq!(data.title, chart.title());
    }

    dashboard.close().await.unwrap();
}

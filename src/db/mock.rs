//! Mock database clients for testing.
//!
//! `MockDatabaseClient` is an in-memory stand-in seeded with the medical
//! tables and canned chart data, used by unit tests and `--mock-db`.

use super::{ColumnInfo, DatabaseClient, QueryResult, TableColumn, Value};
use crate::error::{DashError, Result};
use crate::sql::{Statement, Table};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// A mock database client that returns predefined results.
pub struct MockDatabaseClient {
    columns: HashMap<Table, Vec<TableColumn>>,
    results: HashMap<String, QueryResult>,
    rows_affected: u64,
    executed: Mutex<Vec<Statement>>,
}

impl MockDatabaseClient {
    /// Creates a mock with no tables and no canned results.
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            results: HashMap::new(),
            rows_affected: 1,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock seeded with the six medical tables and chart data.
    pub fn medical() -> Self {
        let mut mock = Self::new();

        mock.columns.insert(
            Table::Patient,
            vec![
                TableColumn::defaulted("patient_id", "int4"),
                TableColumn::required("name", "varchar"),
                TableColumn::required("age", "int4"),
                TableColumn::required("gender", "varchar"),
                TableColumn::required("blood_type", "varchar"),
            ],
        );
        mock.columns.insert(
            Table::Doctor,
            vec![
                TableColumn::defaulted("doctor_id", "int4"),
                TableColumn::required("name", "varchar"),
                TableColumn::required("hospital_id", "int4"),
            ],
        );
        mock.columns.insert(
            Table::Hospital,
            vec![
                TableColumn::defaulted("hospital_id", "int4"),
                TableColumn::required("name", "varchar"),
            ],
        );
        mock.columns.insert(
            Table::Insurance,
            vec![
                TableColumn::defaulted("insurance_id", "int4"),
                TableColumn::required("provider", "varchar"),
            ],
        );
        mock.columns.insert(
            Table::Treatment,
            vec![
                TableColumn::defaulted("treatment_id", "int4"),
                TableColumn::required("patient_id", "int4"),
                TableColumn::required("medical_condition", "varchar"),
                TableColumn::required("medication", "varchar"),
                TableColumn::required("test_results", "varchar"),
            ],
        );
        mock.columns.insert(
            Table::Visits,
            vec![
                TableColumn::defaulted("visit_id", "int4"),
                TableColumn::required("patient_id", "int4"),
                TableColumn::required("doctor_id", "int4"),
                TableColumn::required("hospital_id", "int4"),
                TableColumn::required("insurance_id", "int4"),
                TableColumn::required("admission_date", "date"),
                TableColumn::required("discharge_date", "date"),
                TableColumn::required("admission_type", "varchar"),
                TableColumn::required("room_number", "int4"),
                TableColumn::required("billing_amount", "numeric"),
            ],
        );

        mock.with_result(
            "SELECT gender, COUNT(*) AS count FROM patient GROUP BY gender;",
            counts("gender", &[(Some("Female"), 7), (Some("Male"), 5)]),
        )
        .with_result(
            "SELECT admission_type, COUNT(*) AS count FROM visits GROUP BY admission_type;",
            counts(
                "admission_type",
                &[
                    (Some("Elective"), 4),
                    (Some("Emergency"), 6),
                    (Some("Urgent"), 3),
                ],
            ),
        )
        .with_result(
            "SELECT billing_amount FROM visits;",
            QueryResult::with_data(
                vec![ColumnInfo::new("billing_amount", "NUMERIC")],
                [
                    "1250.00", "3400.50", "980.25", "15000.00", "7200.75", "2210.00",
                    "4999.99", "650.00", "8800.10", "12040.00", "3100.00", "5600.40",
                ]
                .iter()
                .map(|amount| vec![Value::Numeric(amount.to_string())])
                .chain(std::iter::once(vec![Value::Null]))
                .collect(),
            ),
        )
        .with_result(
            "SELECT medical_condition, COUNT(*) AS count FROM treatment GROUP BY medical_condition;",
            counts(
                "medical_condition",
                &[
                    (Some("Asthma"), 2),
                    (Some("Diabetes"), 4),
                    (Some("Hypertension"), 3),
                    (None, 1),
                ],
            ),
        )
    }

    /// Returns `result` whenever a read statement's SQL equals `sql`.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.results.insert(sql.into(), result);
        self
    }

    /// Sets the row count reported for every write.
    pub fn with_rows_affected(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    /// Statements received so far, in order.
    pub async fn executed(&self) -> Vec<Statement> {
        self.executed.lock().await.clone()
    }

    async fn record(&self, statement: &Statement) {
        self.executed.lock().await.push(statement.clone());
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

fn counts(label: &str, groups: &[(Option<&str>, i64)]) -> QueryResult {
    QueryResult::with_data(
        vec![ColumnInfo::new(label, "VARCHAR"), ColumnInfo::new("count", "INT8")],
        groups
            .iter()
            .map(|(name, count)| vec![Value::from(*name), Value::Int(*count)])
            .collect(),
    )
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn fetch_rows(&self, statement: &Statement) -> Result<QueryResult> {
        self.record(statement).await;

        if let Some(result) = self.results.get(&statement.sql) {
            return Ok(result
                .clone()
                .with_execution_time(Duration::from_millis(1)));
        }

        Ok(QueryResult::with_data(
            vec![ColumnInfo::new("result", "TEXT")],
            vec![vec![Value::String(format!(
                "Mock result for: {}",
                statement.sql
            ))]],
        )
        .with_execution_time(Duration::from_millis(1)))
    }

    async fn execute_write(&self, statement: &Statement) -> Result<u64> {
        self.record(statement).await;
        Ok(self.rows_affected)
    }

    async fn table_columns(&self, table: Table) -> Result<Vec<TableColumn>> {
        Ok(self.columns.get(&table).cloned().unwrap_or_default())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A client whose every operation fails with the same query error.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn fetch_rows(&self, _statement: &Statement) -> Result<QueryResult> {
        Err(DashError::query(self.message.clone()))
    }

    async fn execute_write(&self, _statement: &Statement) -> Result<u64> {
        Err(DashError::query(self.message.clone()))
    }

    async fn table_columns(&self, _table: Table) -> Result<Vec<TableColumn>> {
        Err(DashError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

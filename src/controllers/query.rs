//! Query page: free-form SQL.

use tracing::info;

use crate::db::{DatabaseClient, QueryOutput};
use crate::error::{DashError, Result};
use crate::query::{Execution, QueryExecutor};

pub const TITLE: &str = "Run Queries";

pub const INTRO: &str = "Enter your SQL query below to execute it on the database.";

/// Snippets shown under the editor.
pub const EXAMPLES: &[&str] = &[
    "SELECT * FROM patient;",
    "SELECT name, age FROM patient WHERE age > 60;",
    "SELECT admission_type, AVG(billing_amount) FROM visits GROUP BY admission_type;",
    "SELECT d.name, h.name FROM doctor d JOIN hospital h ON d.hospital_id = h.hospital_id;",
];

/// Runs the text in the editor.
///
/// Statements that can change data come back as
/// [`Execution::NeedsConfirmation`] and are not run.
pub async fn submit(db: &dyn DatabaseClient, sql: &str) -> Result<Execution> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(DashError::input("Enter a SQL query to execute"));
    }
    QueryExecutor::new(db).execute(sql).await
}

/// Runs a statement the user confirmed.
pub async fn confirm(db: &dyn DatabaseClient, sql: &str) -> Result<QueryOutput> {
    info!("Running confirmed statement");
    QueryExecutor::new(db).execute_confirmed(sql).await
}

//! Delete page: rows matching a structured condition.

use tracing::{debug, info};

use crate::db::{DatabaseClient, QueryOutput};
use crate::error::{DashError, Result};
use crate::query::QueryExecutor;
use crate::sql::{delete_statement, parse_condition, DeleteStatement, Table};

pub const TITLE: &str = "Delete Records";

pub const CONDITION_PROMPT: &str = "Enter condition for deletion (e.g., patient_id = 1)";

/// Parses `condition` and builds the delete for `table`.
///
/// The condition is checked before the database is contacted; columns are
/// then checked against the table. Nothing is deleted here.
pub async fn prepare(
    db: &dyn DatabaseClient,
    table: Table,
    condition: &str,
) -> Result<DeleteStatement> {
    let condition = parse_condition(condition)?;

    let columns = db.table_columns(table).await?;
    if columns.is_empty() {
        return Err(DashError::query(format!("Table {table} was not found")));
    }

    let delete = delete_statement(table, &condition, &columns)?;
    debug!("Prepared delete: {}", delete.preview);
    Ok(delete)
}

/// Runs a prepared delete.
pub async fn execute(db: &dyn DatabaseClient, delete: &DeleteStatement) -> Result<QueryOutput> {
    info!("Deleting from {}", delete.table);
    QueryExecutor::new(db).run(&delete.statement).await
}

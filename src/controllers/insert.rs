//! Insert page: one row from comma-separated values.

use tracing::debug;

use crate::db::{schema, DatabaseClient, QueryOutput, TableColumn};
use crate::error::{DashError, Result};
use crate::query::QueryExecutor;
use crate::sql::{insert_statement, split_values, Table};

pub const TITLE: &str = "Insert Records";

/// Columns the user has to supply, in table order.
///
/// Columns with a default (serial, identity, generated) are left out.
pub async fn columns(db: &dyn DatabaseClient, table: Table) -> Result<Vec<TableColumn>> {
    let columns = db.table_columns(table).await?;
    Ok(schema::insertable(&columns))
}

/// Inserts one row into `table`, mapping `input` positionally onto the
/// columns returned by [`columns`].
pub async fn insert(db: &dyn DatabaseClient, table: Table, input: &str) -> Result<QueryOutput> {
    if input.trim().is_empty() {
        return Err(DashError::input(format!("Enter the values to insert into {table}")));
    }

    let columns = db.table_columns(table).await?;
    if columns.is_empty() {
        return Err(DashError::query(format!("Table {table} was not found")));
    }

    let values = split_values(input)?;
    let statement = insert_statement(table, &columns, values)?;
    debug!("Insert into {}: {}", table, statement.sql);

    QueryExecutor::new(db).run(&statement).await
}

/// Prompt for the values field.
pub fn prompt(columns: &[TableColumn]) -> String {
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    format!("Enter values for {} (comma-separated)", names.join(", "))
}

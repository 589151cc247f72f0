//! Builders for the insert and delete pages' statements.

use crate::db::{schema, TableColumn};
use crate::error::{DashError, Result};

use super::{placeholder, quote_ident, Condition, Statement, Table};

/// Builds `INSERT INTO <table> (<cols>) VALUES ($1, ...)` for the columns
/// that have no default, binding `values` positionally.
pub fn insert_statement(
    table: Table,
    columns: &[TableColumn],
    values: Vec<String>,
) -> Result<Statement> {
    let columns = schema::insertable(columns);
    if columns.is_empty() {
        return Err(DashError::input(format!(
            "Table {table} has no columns that need a value"
        )));
    }
    if values.len() != columns.len() {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        return Err(DashError::input(format!(
            "Table {table} expects {} values ({}) but {} were given",
            columns.len(),
            names.join(", "),
            values.len()
        )));
    }

    let column_list: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| placeholder(i + 1, c.type_name.as_deref()))
        .collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table.as_str()),
        column_list.join(", "),
        placeholders.join(", ")
    );
    Ok(Statement::with_params(sql, values))
}

/// A delete ready to run, with the preview shown for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    pub table: Table,
    pub statement: Statement,
    /// The same statement with literals written inline.
    pub preview: String,
}

/// Builds a parameterized `DELETE FROM <table> WHERE ...`.
///
/// Every column the condition names must be one of `columns`.
pub fn delete_statement(
    table: Table,
    condition: &Condition,
    columns: &[TableColumn],
) -> Result<DeleteStatement> {
    for name in condition.columns() {
        if schema::find(columns, name).is_none() {
            return Err(DashError::input(format!(
                "Unknown column '{name}' for table {table}"
            )));
        }
    }

    let target = quote_ident(table.as_str());
    let (filter, params) = condition.to_parameterized(1, columns);

    Ok(DeleteStatement {
        table,
        statement: Statement::with_params(format!("DELETE FROM {target} WHERE {filter}"), params),
        preview: format!("DELETE FROM {target} WHERE {}", condition.to_preview()),
    })
}

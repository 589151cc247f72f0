//! SQL statement construction.
//!
//! Statements pair SQL text with positional text parameters. User input only
//! ever travels as a parameter; table names come from [`Table`] and column
//! names from the schema catalog.

mod build;
mod filter;
mod table;
mod values;

pub use build::{delete_statement, insert_statement, DeleteStatement};
pub use filter::{parse_condition, CompareOp, Condition, Literal};
pub use table::Table;
pub use values::split_values;

use crate::safety::classify_sql;

/// A SQL statement with positional parameters bound as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    /// Creates a statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with positional parameters for `$1`, `$2`, ...
    pub fn with_params(sql: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// How the executor will run this statement.
    pub fn kind(&self) -> StatementKind {
        StatementKind::of(&self.sql)
    }
}

/// Whether a statement returns rows or is committed as a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

impl StatementKind {
    /// Classifies SQL text.
    ///
    /// Text starting with `select` (any case, after leading whitespace) is a
    /// read. So is any single statement the safety parser considers read-only.
    pub fn of(sql: &str) -> Self {
        if has_select_prefix(sql) || classify_sql(sql).is_read_only() {
            Self::Read
        } else {
            Self::Write
        }
    }
}

fn has_select_prefix(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

const RESERVED: &[&str] = &[
    "all", "and", "any", "as", "asc", "between", "case", "check", "column", "constraint",
    "create", "default", "delete", "desc", "distinct", "do", "else", "end", "false", "for",
    "foreign", "from", "grant", "group", "having", "in", "insert", "into", "is", "join", "like",
    "limit", "not", "null", "offset", "on", "or", "order", "primary", "references", "select",
    "table", "then", "to", "true", "union", "unique", "update", "user", "using", "when",
    "where", "with",
];

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
}

/// Quotes an identifier unless it is a plain lowercase, non-reserved name.
pub fn quote_ident(name: &str) -> String {
    if is_plain_identifier(name) && !RESERVED.contains(&name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Renders the `n`th placeholder, cast to `type_name` when one is known.
pub(crate) fn placeholder(n: usize, type_name: Option<&str>) -> String {
    match type_name {
        Some(ty) => format!("${n}::{}", quote_ident(ty)),
        None => format!("${n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefix_is_read() {
        assert_eq!(StatementKind::of("SELECT * FROM patient"), StatementKind::Read);
        assert_eq!(StatementKind::of("  \n select 1"), StatementKind::Read);
        assert_eq!(StatementKind::of("SeLeCt 1"), StatementKind::Read);
    }

    #[test]
    fn test_read_only_statements_are_reads() {
        assert_eq!(
            StatementKind::of("WITH p AS (SELECT * FROM patient) SELECT * FROM p"),
            StatementKind::Read
        );
        assert_eq!(StatementKind::of("EXPLAIN SELECT 1"), StatementKind::Read);
    }

    #[test]
    fn test_mutations_are_writes() {
        assert_eq!(
            StatementKind::of("INSERT INTO doctor (name) VALUES ('x')"),
            StatementKind::Write
        );
        assert_eq!(StatementKind::of("DELETE FROM visits"), StatementKind::Write);
        assert_eq!(
            StatementKind::of("UPDATE patient SET age = 1"),
            StatementKind::Write
        );
        assert_eq!(StatementKind::of("not sql"), StatementKind::Write);
    }

    #[test]
    fn test_multiple_read_statements_are_writes() {
        assert_eq!(StatementKind::of("VALUES (1); VALUES (2)"), StatementKind::Write);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("patient_id"), "patient_id");
        assert_eq!(quote_ident("BillingAmount"), "\"BillingAmount\"");
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("first name"), "\"first name\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder(1, None), "$1");
        assert_eq!(placeholder(2, Some("int4")), "$2::int4");
    }
}

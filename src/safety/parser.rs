//! SQL parsing and classification logic.
//!
//! Uses sqlparser with the PostgreSQL dialect. Queries are walked recursively
//! so data-modifying CTEs and derived tables are not mistaken for reads.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::{DashError, Result};

use super::{ClassificationResult, SafetyLevel, StatementType};

const IRREVERSIBLE: &str = "This action cannot be undone.";

type Verdict = (SafetyLevel, StatementType);

/// SQL classifier that parses and classifies SQL statements.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: PostgreSqlDialect,
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlClassifier {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    /// Classifies a SQL string.
    ///
    /// Unparseable or empty SQL is classified as destructive with a warning.
    pub fn classify(&self, sql: &str) -> ClassificationResult {
        self.parse_and_classify(sql).unwrap_or_else(|_| {
            ClassificationResult::with_warning(
                SafetyLevel::Destructive,
                StatementType::Unknown,
                "Could not parse SQL. Please review carefully.",
            )
        })
    }

    fn parse_and_classify(&self, sql: &str) -> Result<ClassificationResult> {
        let statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| DashError::query(format!("SQL parse error: {e}")))?;

        let (level, statement_type) = match statements.as_slice() {
            [] => {
                return Ok(ClassificationResult::with_warning(
                    SafetyLevel::Destructive,
                    StatementType::Unknown,
                    "Empty SQL statement",
                ))
            }
            [single] => classify_statement(single),
            many => {
                let (level, inner) = worst(many.iter().map(classify_statement));
                (level, StatementType::Multiple(Box::new(inner)))
            }
        };

        Ok(if level.requires_warning() {
            ClassificationResult::with_warning(level, statement_type, IRREVERSIBLE)
        } else {
            ClassificationResult::new(level, statement_type)
        })
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify_sql(sql: &str) -> ClassificationResult {
    SqlClassifier::new().classify(sql)
}

fn rank(level: SafetyLevel) -> u8 {
    match level {
        SafetyLevel::Safe => 0,
        SafetyLevel::Mutating => 1,
        SafetyLevel::Destructive => 2,
    }
}

/// The most dangerous verdict; the first one wins ties. Empty input is a safe SELECT.
fn worst(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
    verdicts
        .into_iter()
        .reduce(|current, next| {
            if rank(next.0) > rank(current.0) {
                next
            } else {
                current
            }
        })
        .unwrap_or((SafetyLevel::Safe, StatementType::Select))
}

fn classify_statement(statement: &Statement) -> Verdict {
    use SafetyLevel::{Destructive, Mutating, Safe};

    match statement {
        Statement::Query(query) => classify_query(query),
        // EXPLAIN ANALYZE runs the statement; plain EXPLAIN only plans it.
        Statement::Explain {
            analyze, statement, ..
        } => {
            let level = if *analyze {
                classify_statement(statement).0
            } else {
                Safe
            };
            (level, StatementType::Explain)
        }
        Statement::ShowVariable { .. }
        | Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowFunctions { .. }
        | Statement::ShowStatus { .. }
        | Statement::ShowCollation { .. } => (Safe, StatementType::Show),

        Statement::Insert(_) => (Mutating, StatementType::Insert),
        Statement::Update { .. } => (Mutating, StatementType::Update),
        Statement::Merge { .. } => (Mutating, StatementType::Merge),

        Statement::Delete(_) => (Destructive, StatementType::Delete),
        Statement::Drop { .. } => (Destructive, StatementType::Drop),
        Statement::Truncate { .. } => (Destructive, StatementType::Truncate),
        Statement::AlterTable { .. }
        | Statement::AlterIndex { .. }
        | Statement::AlterView { .. }
        | Statement::AlterRole { .. } => (Destructive, StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateProcedure { .. }
        | Statement::CreateRole { .. }
        | Statement::CreateSequence { .. }
        | Statement::CreateType { .. } => (Destructive, StatementType::Create),
        Statement::Grant { .. } => (Destructive, StatementType::Grant),
        Statement::Revoke { .. } => (Destructive, StatementType::Revoke),

        _ => (Destructive, StatementType::Unknown),
    }
}

fn classify_query(query: &Query) -> Verdict {
    let ctes = query
        .with
        .iter()
        .flat_map(|with| with.cte_tables.iter())
        .map(|cte| classify_query(&cte.query));
    worst(ctes.chain(std::iter::once(classify_set_expr(&query.body))))
}

fn classify_set_expr(set_expr: &SetExpr) -> Verdict {
    match set_expr {
        SetExpr::Update(stmt) | SetExpr::Insert(stmt) => classify_statement(stmt),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::Select(select) => worst(select.from.iter().map(classify_table_with_joins)),
        SetExpr::SetOperation { left, right, .. } => {
            worst([classify_set_expr(left), classify_set_expr(right)])
        }
        SetExpr::Values(_) | SetExpr::Table(_) => (SafetyLevel::Safe, StatementType::Select),
    }
}

fn classify_table_with_joins(twj: &TableWithJoins) -> Verdict {
    worst(
        std::iter::once(&twj.relation)
            .chain(twj.joins.iter().map(|join| &join.relation))
            .map(classify_table_factor),
    )
}

fn classify_table_factor(factor: &TableFactor) -> Verdict {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => (SafetyLevel::Safe, StatementType::Select),
    }
}

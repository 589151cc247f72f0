//! Statement execution.
//!
//! The executor decides whether a statement is a read or a write, runs it
//! against the database client and hands back an explicit result.

use tracing::debug;

use crate::db::{DatabaseClient, QueryOutput};
use crate::error::Result;
use crate::safety::{classify_sql, ClassificationResult};
use crate::sql::{Statement, StatementKind};

/// Runs statements against a database client.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Runs one statement.
    ///
    /// Reads return every row; writes are committed before this returns.
    pub async fn run(&self, statement: &Statement) -> Result<QueryOutput> {
        let kind = statement.kind();
        debug!(
            "Running {:?} statement with {} params: {}",
            kind,
            statement.params.len(),
            statement.sql
        );

        match kind {
            StatementKind::Read => Ok(QueryOutput::Rows(self.db.fetch_rows(statement).await?)),
            StatementKind::Write => Ok(QueryOutput::Affected {
                rows_affected: self.db.execute_write(statement).await?,
            }),
        }
    }

    /// Classifies free-form SQL and runs it if it is safe.
    ///
    /// Mutating and destructive SQL comes back as `NeedsConfirmation`
    /// without touching the database.
    pub async fn execute(&self, sql: &str) -> Result<Execution> {
        let classification = classify_sql(sql);

        if classification.requires_confirmation() {
            debug!("Statement needs confirmation: {}", classification.statement_type);
            return Ok(Execution::NeedsConfirmation {
                sql: sql.to_string(),
                classification,
            });
        }

        self.execute_confirmed(sql).await.map(Execution::Completed)
    }

    /// Runs free-form SQL the user has already confirmed.
    pub async fn execute_confirmed(&self, sql: &str) -> Result<QueryOutput> {
        self.run(&Statement::new(sql)).await
    }
}

/// Outcome of submitting free-form SQL.
#[derive(Debug)]
pub enum Execution {
    /// The statement ran.
    Completed(QueryOutput),
    /// The statement must be confirmed before it runs.
    NeedsConfirmation {
        sql: String,
        classification: ClassificationResult,
    },
}

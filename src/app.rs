//! The dashboard: connects UI actions to the page controllers.
//!
//! [`Dashboard`] owns the database client. The TUI hands it one
//! [`Action`] at a time and it writes the outcome back into the [`App`]
//! state as a table, a chart, a confirmation or a notice.

use tracing::{debug, info, warn};

use crate::config::{ConnectionConfig, PoolConfig};
use crate::controllers::{delete, insert, query, visualize};
use crate::db::{self, DatabaseClient, MockDatabaseClient, QueryOutput};
use crate::error::{DashError, Result};
use crate::query::Execution;
use crate::tui::app::{Action, App, Pending};

/// Message shown after a chart is drawn.
pub const CHART_GENERATED: &str = "Visualization generated successfully!";

/// Owns the database client and performs UI actions against it.
pub struct Dashboard {
    db: Box<dyn DatabaseClient>,
    connection_info: Option<String>,
}

impl Dashboard {
    pub fn new(db: Box<dyn DatabaseClient>, connection_info: Option<String>) -> Self {
        Self {
            db,
            connection_info,
        }
    }

    /// Connects to PostgreSQL with the given configuration.
    pub async fn connect(config: &ConnectionConfig, pool: &PoolConfig) -> Result<Self> {
        info!("Connecting to {}", config.display_string());
        let db = db::connect(config, pool).await?;
        info!("Connected");
        Ok(Self::new(db, Some(config.display_string())))
    }

    /// A dashboard backed by the in-memory medical mock.
    pub fn mock() -> Self {
        Self::new(
            Box::new(MockDatabaseClient::medical()),
            Some("mock database".to_string()),
        )
    }

    pub fn connection_info(&self) -> Option<&str> {
        self.connection_info.as_deref()
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    /// Performs one action and records its outcome in `app`.
    pub async fn perform(&self, app: &mut App, action: Action) {
        debug!("Performing {:?}", action);
        let db = self.db();

        match action {
            Action::ExecuteQuery(sql) => match query::submit(db, &sql).await {
                Ok(Execution::Completed(output)) => show_output(app, output),
                Ok(Execution::NeedsConfirmation {
                    sql,
                    classification,
                }) => app.set_pending(Pending::Query {
                    sql,
                    classification,
                }),
                Err(e) => fail(app, "Query", e),
            },
            Action::ConfirmQuery(sql) => match query::confirm(db, &sql).await {
                Ok(output) => show_output(app, output),
                Err(e) => fail(app, "Query", e),
            },
            Action::LoadColumns(table) => match insert::columns(db, table).await {
                Ok(columns) => app.set_insert_columns(table, columns),
                Err(e) => fail(app, "Column lookup", e),
            },
            Action::InsertRecord { table, values } => {
                match insert::insert(db, table, &values).await {
                    Ok(output) => {
                        app.values.take();
                        app.notify_success(output.summary());
                    }
                    Err(e) => fail(app, "Insert", e),
                }
            }
            Action::PrepareDelete { table, condition } => {
                match delete::prepare(db, table, &condition).await {
                    Ok(statement) => app.set_pending(Pending::Delete(statement)),
                    Err(e) => fail(app, "Delete", e),
                }
            }
            Action::ConfirmDelete(statement) => match delete::execute(db, &statement).await {
                Ok(output) => {
                    app.condition.take();
                    app.notify_success(output.summary());
                }
                Err(e) => fail(app, "Delete", e),
            },
            Action::GenerateChart(chart) => match visualize::generate(db, chart).await {
                Ok(data) => {
                    app.show_chart(data);
                    app.notify_success(CHART_GENERATED);
                }
                Err(e) => {
                    app.chart_data = None;
                    fail(app, "Visualization", e);
                }
            },
        }
    }

    /// Closes the connection pool.
    pub async fn close(&self) -> Result<()> {
        self.db.close().await
    }
}

fn show_output(app: &mut App, output: QueryOutput) {
    app.notify_success(output.summary());
    match output {
        QueryOutput::Rows(result) => app.show_rows(result),
        QueryOutput::Affected { .. } => app.result = None,
    }
}

fn fail(app: &mut App, what: &str, error: DashError) {
    warn!("{} failed: {}", what, error);
    app.notify_error(&error);
}

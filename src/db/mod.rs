//! Database abstraction layer.
//!
//! Provides a trait-based interface for database operations, so the
//! dashboard runs the same way against PostgreSQL and the in-memory mock.

mod mock;
mod postgres;
pub mod schema;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use schema::TableColumn;
pub use types::{ColumnInfo, QueryOutput, QueryResult, Row, Value};

use crate::config::{ConnectionConfig, PoolConfig};
use crate::error::Result;
use crate::sql::{Statement, Table};
use async_trait::async_trait;

/// Creates a pooled database client for the given configuration.
///
/// Fails with a connection error rather than handing back a half-open client.
pub async fn connect(
    config: &ConnectionConfig,
    pool: &PoolConfig,
) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config, pool).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// Every operation borrows a pooled connection for its own duration only.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Runs a read statement and returns every row it produces.
    async fn fetch_rows(&self, statement: &Statement) -> Result<QueryResult>;

    /// Runs a write statement in a transaction and commits it.
    /// Returns the number of rows affected.
    async fn execute_write(&self, statement: &Statement) -> Result<u64>;

    /// Lists the columns of `table` from the schema catalog, in table order.
    async fn table_columns(&self, table: Table) -> Result<Vec<TableColumn>>;

    /// Closes the connection pool.
    async fn close(&self) -> Result<()>;
}

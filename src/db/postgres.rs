//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using a sqlx connection pool.

use crate::config::{ConnectionConfig, PoolConfig};
use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, TableColumn, Value};
use crate::error::{DashError, Result};
use crate::sql::{Statement, Table};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::{
    PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode, PgTypeInfo,
    PgTypeKind, PgValueFormat,
};
use sqlx::query::Query;
use sqlx::types::{JsonValue, Uuid};
use sqlx::{
    Column as SqlxColumn, Executor, Postgres, Row as SqlxRow, Statement as _, TypeInfo, ValueRef,
};
use std::future::Future;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Columns of one table, with everything the server fills in flagged as defaulted.
const TABLE_COLUMNS_SQL: &str = r#"
    SELECT
        column_name::text,
        udt_name::text,
        COALESCE(
            column_default IS NOT NULL
                OR is_identity = 'YES'
                OR is_generated = 'ALWAYS',
            false
        )
    FROM information_schema.columns
    WHERE table_schema = current_schema() AND table_name = $1
    ORDER BY ordinal_position
"#;

/// PostgreSQL database client backed by a connection pool.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresClient {
    /// Creates a client from an existing connection pool.
    pub fn from_pool(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Opens a pool for `config`, retrying transient failures with backoff.
    pub async fn connect(config: &ConnectionConfig, pool_config: &PoolConfig) -> Result<Self> {
        let options = connect_options(config)?;
        let attempts = pool_config.connect_retries.max(1);
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);
        let mut attempt = 1;

        loop {
            debug!("Connection attempt {} of {}", attempt, attempts);

            let result = PgPoolOptions::new()
                .max_connections(pool_config.max_connections)
                .acquire_timeout(pool_config.acquire_timeout())
                .connect_with(options.clone())
                .await;

            match result {
                Ok(pool) => {
                    info!("Connected to {}", config.display_string());
                    return Ok(Self::from_pool(pool, pool_config.query_timeout()));
                }
                Err(e) if attempt < attempts && is_transient_error(&e) => {
                    warn!(
                        "Connection attempt {} failed (transient error), retrying in {:?}",
                        attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(map_connection_error(e, config)),
            }
        }
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => {
                DashError::connection("Timed out waiting for a free database connection")
            }
            sqlx::Error::PoolClosed => DashError::connection("The connection pool is closed"),
            other => DashError::connection(other.to_string()),
        })
    }

    /// Runs a sqlx future under the query timeout, mapping both failure modes.
    async fn timed<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>> + Send,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| {
                DashError::query(format!(
                    "Statement timed out after {} seconds",
                    self.query_timeout.as_secs()
                ))
            })?
            .map_err(|e| DashError::query(format_query_error(e)))
    }

    /// Column metadata for a statement that returned no rows.
    async fn describe_columns(
        &self,
        conn: &mut PoolConnection<Postgres>,
        sql: &str,
    ) -> Vec<ColumnInfo> {
        match (&mut **conn).prepare(sql).await {
            Ok(prepared) => prepared
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                debug!("Could not describe result columns: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn fetch_rows(&self, statement: &Statement) -> Result<QueryResult> {
        let start = Instant::now();
        let mut conn = self.acquire().await?;

        let result = self
            .timed(bind_params(statement).fetch_all(&mut *conn))
            .await?;
        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = match result.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            None => self.describe_columns(&mut conn, &statement.sql).await,
        };

        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        debug!(
            "Read statement returned {} rows in {:?}",
            rows.len(),
            execution_time
        );

        Ok(QueryResult {
            columns,
            row_count: rows.len(),
            rows,
            execution_time,
        })
    }

    async fn execute_write(&self, statement: &Statement) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DashError::connection(format!("Could not start a transaction: {e}")))?;

        let done = self.timed(bind_params(statement).execute(&mut *tx)).await?;
        self.timed(tx.commit()).await?;

        debug!("Write statement committed, {} rows affected", done.rows_affected());
        Ok(done.rows_affected())
    }

    async fn table_columns(&self, table: Table) -> Result<Vec<TableColumn>> {
        let rows: Vec<(String, Option<String>, bool)> = self
            .timed(
                sqlx::query_as::<_, (String, Option<String>, bool)>(TABLE_COLUMNS_SQL)
                    .bind(table.as_str())
                    .fetch_all(&self.pool),
            )
            .await?;
        debug!("Discovered {} columns for {}", rows.len(), table);

        Ok(rows
            .into_iter()
            .map(|(name, type_name, has_default)| TableColumn {
                name,
                type_name,
                has_default,
            })
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Builds connection options from explicit configuration.
fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions> {
    let sslmode = config.sslmode.as_deref().unwrap_or("prefer");
    let ssl_mode = PgSslMode::from_str(sslmode)
        .map_err(|_| DashError::config(format!("Invalid sslmode '{sslmode}'")))?;

    let mut options = PgConnectOptions::new()
        .host(config.host.as_deref().unwrap_or("localhost"))
        .port(config.port)
        .ssl_mode(ssl_mode)
        .application_name("medrec-dash");

    if let Some(dbname) = &config.dbname {
        options = options.database(dbname);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    Ok(options)
}

/// Binds every parameter as text, in placeholder order.
fn bind_params(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    statement
        .params
        .iter()
        .fold(sqlx::query(&statement.sql), |query, param| {
            query.bind(param.as_str())
        })
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info()))
        .collect()
}

/// Maps a decode result onto a `Value`, treating SQL NULL as `Value::Null`.
fn decoded<T>(
    result: std::result::Result<Option<T>, sqlx::Error>,
    wrap: impl FnOnce(T) -> Value,
) -> Value {
    match result {
        Ok(Some(value)) => wrap(value),
        Ok(None) => Value::Null,
        Err(e) => {
            debug!("Could not decode column value: {}", e);
            Value::Null
        }
    }
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize, type_info: &PgTypeInfo) -> Value {
    // Enum labels travel as their text in both wire formats.
    if let PgTypeKind::Enum(_) = type_info.kind() {
        return decoded(row.try_get_unchecked::<Option<String>, _>(index), Value::String);
    }

    match type_info.name().to_uppercase().as_str() {
        "BOOL" => decoded(row.try_get::<Option<bool>, _>(index), Value::Bool),
        "INT2" => decoded(row.try_get::<Option<i16>, _>(index), |v| Value::Int(v.into())),
        "INT4" => decoded(row.try_get::<Option<i32>, _>(index), |v| Value::Int(v.into())),
        "INT8" => decoded(row.try_get::<Option<i64>, _>(index), Value::Int),
        "FLOAT4" => decoded(row.try_get::<Option<f32>, _>(index), |v| Value::Float(v.into())),
        "FLOAT8" => decoded(row.try_get::<Option<f64>, _>(index), Value::Float),
        "NUMERIC" => numeric_value(row, index),
        "DATE" => decoded(row.try_get::<Option<chrono::NaiveDate>, _>(index), |d| {
            Value::String(d.to_string())
        }),
        "TIMESTAMP" => decoded(
            row.try_get::<Option<chrono::NaiveDateTime>, _>(index),
            |d| Value::String(d.to_string()),
        ),
        "TIMESTAMPTZ" => decoded(
            row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index),
            |d| Value::String(d.to_rfc3339()),
        ),
        "TIME" => decoded(row.try_get::<Option<chrono::NaiveTime>, _>(index), |t| {
            Value::String(t.to_string())
        }),
        "INTERVAL" => decoded(row.try_get::<Option<PgInterval>, _>(index), |i| {
            Value::String(format_interval(&i))
        }),
        "UUID" => decoded(row.try_get::<Option<Uuid>, _>(index), |u| {
            Value::String(u.to_string())
        }),
        "JSON" | "JSONB" => decoded(row.try_get::<Option<JsonValue>, _>(index), |j| {
            Value::String(j.to_string())
        }),
        "BYTEA" => decoded(row.try_get::<Option<Vec<u8>>, _>(index), Value::Bytes),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => {
            decoded(row.try_get::<Option<String>, _>(index), Value::String)
        }
        _ => raw_value(row, index),
    }
}

/// Reads a NUMERIC column exactly as the server would print it.
fn numeric_value(row: &PgRow, index: usize) -> Value {
    let raw = match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => raw,
        _ => return Value::Null,
    };
    let text = match raw.format() {
        PgValueFormat::Text => raw.as_str().ok().map(str::to_string),
        PgValueFormat::Binary => raw.as_bytes().ok().and_then(numeric_text),
    };
    text.map(Value::Numeric).unwrap_or(Value::Null)
}

/// Renders the binary NUMERIC wire format (base-10000 digit groups) as text.
///
/// Layout: `ndigits`, `weight`, `sign`, `dscale` as 16-bit big-endian words,
/// followed by `ndigits` digit groups. Arbitrary precision, `NaN` and the
/// infinities are all preserved.
fn numeric_text(bytes: &[u8]) -> Option<String> {
    let word = |i: usize| -> Option<u16> {
        let pair = bytes.get(i * 2..i * 2 + 2)?;
        Some(u16::from_be_bytes([pair[0], pair[1]]))
    };

    let ndigits = usize::from(word(0)?);
    let weight = i64::from(word(1)? as i16);
    let sign = word(2)?;
    let dscale = usize::from(word(3)?);
    let digits = (0..ndigits)
        .map(|i| word(4 + i))
        .collect::<Option<Vec<u16>>>()?;

    match sign {
        0xC000 => return Some("NaN".to_string()),
        0xD000 => return Some("Infinity".to_string()),
        0xF000 => return Some("-Infinity".to_string()),
        0x0000 | 0x4000 => {}
        _ => return None,
    }

    let group = |i: i64| -> u16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut text = String::new();
    if sign == 0x4000 {
        text.push('-');
    }

    if weight < 0 {
        text.push('0');
    } else {
        text.push_str(&group(0).to_string());
        for i in 1..=weight {
            text.push_str(&format!("{:04}", group(i)));
        }
    }

    if dscale > 0 {
        let mut fraction = String::new();
        let mut i = weight + 1;
        while fraction.len() < dscale {
            fraction.push_str(&format!("{:04}", group(i)));
            i += 1;
        }
        fraction.truncate(dscale);
        text.push('.');
        text.push_str(&fraction);
    }

    Some(text)
}

/// Formats an interval the way `psql` shows it (`1 year 2 mons 3 days 04:05:06`).
fn format_interval(interval: &PgInterval) -> String {
    let mut parts = Vec::new();
    let years = interval.months / 12;
    let months = interval.months % 12;

    let unit = |n: i32, singular: &str, plural: &str| {
        format!("{n} {}", if n.abs() == 1 { singular } else { plural })
    };
    if years != 0 {
        parts.push(unit(years, "year", "years"));
    }
    if months != 0 {
        parts.push(unit(months, "mon", "mons"));
    }
    if interval.days != 0 {
        parts.push(unit(interval.days, "day", "days"));
    }

    let micros = interval.microseconds;
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let micros = micros.unsigned_abs();
        let seconds = micros / 1_000_000;
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            seconds / 3600,
            seconds / 60 % 60,
            seconds % 60
        );
        let fraction = micros % 1_000_000;
        if fraction != 0 {
            let digits = format!("{fraction:06}");
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

/// Types without a dedicated decoder: text when the server sent text,
/// otherwise the raw bytes.
fn raw_value(row: &PgRow, index: usize) -> Value {
    let raw = match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => raw,
        _ => return Value::Null,
    };
    match raw.format() {
        PgValueFormat::Text => raw
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
        PgValueFormat::Binary => raw
            .as_bytes()
            .map(|b| Value::Bytes(b.to_vec()))
            .unwrap_or(Value::Null),
    }
}

/// Determines if an error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
        || error_str.contains("does not exist")
        || error_str.contains("ssl")
        || error_str.contains("tls")
    {
        return false;
    }

    error_str.contains("connection refused")
        || error_str.contains("timed out")
        || error_str.contains("timeout")
        || error_str.contains("temporarily unavailable")
        || error_str.contains("connection reset")
        || error_str.contains("broken pipe")
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> DashError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port;
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.dbname.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        DashError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        DashError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        DashError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("ssl") || error_str.contains("tls") {
        DashError::connection(
            "Server requires SSL. Set sslmode = \"require\" in the [database] config.",
        )
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        DashError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        DashError::connection(error.to_string())
    }
}

/// Formats a statement error with the server's detail fields when present.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = format!("ERROR: {}", db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        let fields = [
            ("DETAIL", pg_error.detail()),
            ("HINT", pg_error.hint()),
            ("TABLE", pg_error.table()),
            ("COLUMN", pg_error.column()),
            ("CONSTRAINT", pg_error.constraint()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                result.push_str(&format!("\n  {label}: {value}"));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn get_test_database_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    async fn get_test_client() -> Option<PostgresClient> {
        let url = get_test_database_url()?;
        let config = ConnectionConfig::from_connection_string(&url).ok()?;
        PostgresClient::connect(&config, &PoolConfig::default())
            .await
            .ok()
    }

    fn io_error(kind: io::ErrorKind, msg: &str) -> sqlx::Error {
        sqlx::Error::Io(io::Error::new(kind, msg))
    }

    #[test]
    fn test_connect_options_from_config() {
        let config = ConnectionConfig {
            host: Some("db.example.com".to_string()),
            port: 6543,
            dbname: Some("medical".to_string()),
            user: Some("clinic".to_string()),
            password: Some("secret".to_string()),
            sslmode: Some("require".to_string()),
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("medical"));
        assert_eq!(options.get_username(), "clinic");
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_connect_options_rejects_bad_sslmode() {
        let config = ConnectionConfig {
            sslmode: Some("sometimes".to_string()),
            ..ConnectionConfig::default()
        };
        let err = connect_options(&config).unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }

    #[test]
    fn test_transient_errors() {
        assert!(is_transient_error(&io_error(
            io::ErrorKind::ConnectionRefused,
            "Connection refused"
        )));
        assert!(is_transient_error(&io_error(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer"
        )));
        assert!(!is_transient_error(&io_error(
            io::ErrorKind::Other,
            "password authentication failed for user \"x\""
        )));
        assert!(!is_transient_error(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn test_connection_error_messages() {
        let config = ConnectionConfig {
            host: Some("db.example.com".to_string()),
            port: 5432,
            dbname: Some("medical".to_string()),
            user: Some("clinic".to_string()),
            ..ConnectionConfig::default()
        };

        let refused = map_connection_error(
            io_error(io::ErrorKind::ConnectionRefused, "Connection refused"),
            &config,
        );
        assert_eq!(
            refused.to_string(),
            "Connection error: Cannot connect to db.example.com:5432. Check that the server is running."
        );

        let auth = map_connection_error(
            io_error(io::ErrorKind::Other, "password authentication failed"),
            &config,
        );
        assert!(auth.to_string().contains("user 'clinic'"));

        let missing = map_connection_error(
            io_error(io::ErrorKind::Other, "database \"medical\" does not exist"),
            &config,
        );
        assert!(missing.to_string().contains("Database 'medical' does not exist"));
    }

    #[tokio::test]
    async fn test_fetch_rows_returns_all_rows() {
        let Some(client) = get_test_client().await else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return;
        };

        let result = client
            .fetch_rows(&Statement::new(
                "SELECT n, 'row ' || n AS label FROM generate_series(1, 1500) AS n",
            ))
            .await
            .unwrap();

        assert_eq!(result.columns.len(), 2);
        assert_eq!(result.columns[0].name, "n");
        assert_eq!(result.row_count, 1500);
        assert_eq!(result.rows[1499][0], Value::Int(1500));

        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_rows_empty_keeps_columns() {
        let Some(client) = get_test_client().await else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return;
        };

        let result = client
            .fetch_rows(&Statement::new("SELECT 1 AS one, 'x' AS two WHERE false"))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.column_names(), vec!["one", "two"]);

        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_rows_binds_text_params() {
        let Some(client) = get_test_client().await else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return;
        };

        let result = client
            .fetch_rows(&Statement::with_params(
                "SELECT $1::int4 + 1 AS next, $2::numeric AS amount",
                vec!["41".to_string(), "12.50".to_string()],
            ))
            .await
            .unwrap();

        assert_eq!(result.rows[0][0], Value::Int(42));
        assert_eq!(result.rows[0][1], Value::Numeric("12.50".to_string()));

        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_rows_error() {
        let Some(client) = get_test_client().await else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return;
        };

        let error = client
            .fetch_rows(&Statement::new("SELECT * FROM nonexistent_table_xyz"))
            .await
            .unwrap_err();
        assert!(matches!(error, DashError::Query(_)));
        assert!(error.to_string().contains("nonexistent_table_xyz"));

        client.close().await.unwrap();
    }

    fn numeric_bytes(weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for word in [digits.len() as u16, weight as u16, sign, dscale]
            .into_iter()
            .chain(digits.iter().copied())
        {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn test_numeric_text_keeps_full_precision() {
        let big = numeric_bytes(
            7,
            0x0000,
            1,
            &[1, 2345, 6789, 123, 4567, 8901, 2345, 6789, 5000],
        );
        assert_eq!(
            numeric_text(&big).as_deref(),
            Some("12345678901234567890123456789.5")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(0, 0x4000, 2, &[12, 5000])).as_deref(),
            Some("-12.50")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(-1, 0x0000, 5, &[1, 2000])).as_deref(),
            Some("0.00012")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(1, 0x0000, 0, &[7])).as_deref(),
            Some("70000")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(0, 0x0000, 0, &[])).as_deref(),
            Some("0")
        );
    }

    #[test]
    fn test_numeric_text_special_values() {
        assert_eq!(
            numeric_text(&numeric_bytes(0, 0xC000, 0, &[])).as_deref(),
            Some("NaN")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(0, 0xD000, 0, &[])).as_deref(),
            Some("Infinity")
        );
        assert_eq!(
            numeric_text(&numeric_bytes(0, 0xF000, 0, &[])).as_deref(),
            Some("-Infinity")
        );
        assert_eq!(numeric_text(&[0, 1, 0, 0, 0]), None);
    }

    #[test]
    fn test_format_interval() {
        let interval = |months, days, microseconds| PgInterval {
            months,
            days,
            microseconds,
        };

        assert_eq!(format_interval(&interval(0, 1, 0)), "1 day");
        assert_eq!(
            format_interval(&interval(14, 3, (4 * 3600 + 5 * 60 + 6) * 1_000_000)),
            "1 year 2 mons 3 days 04:05:06"
        );
        assert_eq!(format_interval(&interval(0, 0, 1_500_000)), "00:00:01.5");
        assert_eq!(format_interval(&interval(0, 0, -90_000_000)), "-00:01:30");
        assert_eq!(format_interval(&interval(0, 0, 0)), "00:00:00");
    }

    #[tokio::test]
    async fn test_fetch_rows_decodes_extended_types() {
        let Some(client) = get_test_client().await else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return;
        };

        let result = client
            .fetch_rows(&Statement::new(
                "SELECT '6f1c1f2e-1b7c-4c57-9a53-0d9b5d1a2b3c'::uuid AS u, \
                        '{\"a\":1}'::jsonb AS j, \
                        interval '1 day' AS i, \
                        12345678901234567890123456789.5::numeric AS big, \
                        'NaN'::numeric AS nan, \
                        NULL::uuid AS missing",
            ))
            .await
            .unwrap();

        assert_eq!(
            result.rows[0],
            vec![
                Value::String("6f1c1f2e-1b7c-4c57-9a53-0d9b5d1a2b3c".to_string()),
                Value::String(r#"{"a":1}"#.to_string()),
                Value::String("1 day".to_string()),
                Value::Numeric("12345678901234567890123456789.5".to_string()),
                Value::Numeric("NaN".to_string()),
                Value::Null,
            ]
        );

        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let config = ConnectionConfig {
            host: Some("nonexistent.invalid".to_string()),
            dbname: Some("medical".to_string()),
            ..ConnectionConfig::default()
        };
        let pool = PoolConfig {
            connect_retries: 1,
            ..PoolConfig::default()
        };

        let error = PostgresClient::connect(&config, &pool).await.unwrap_err();
        assert!(matches!(error, DashError::Connection(_)));
    }
}

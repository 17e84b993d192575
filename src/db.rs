// src/db.rs
//! Database pool configuration and migrations

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{Result, VersusError};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the SQLite connection pool used by the server
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Writers queue behind each other instead of failing with SQLITE_BUSY
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory database. The connection is never recycled,
/// since closing it would drop the database.
pub async fn in_memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    info!("Migrations complete");
    Ok(())
}

/// Parse a TEXT column holding one of our closed enumerations.
/// A value outside the enumeration is a data-integrity fault, not a default.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse::<T>().map_err(|e| {
        VersusError::Db(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
}

pub(crate) fn parse_optional_column<T>(column: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.map(|v| parse_column(column, &v)).transpose()
}

/// Timestamps are stored as naive UTC text so they sort lexicographically
pub(crate) fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::Severity;

    #[tokio::test]
    async fn test_in_memory_pool_has_schema() {
        let pool = in_memory_pool().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comparisons")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_parse_column_rejects_out_of_domain_values() {
        let ok: Severity = parse_column("severity", "high").unwrap();
        assert_eq!(ok, Severity::High);

        let err = parse_column::<Severity>("severity", "critical").unwrap_err();
        assert!(matches!(err, VersusError::Db(sqlx::Error::ColumnDecode { .. })));

        let none: Option<Severity> = parse_optional_column("before_severity", None).unwrap();
        assert!(none.is_none());
    }
}

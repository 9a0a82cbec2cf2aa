use crate::error::DbError;
use crate::schema;
use configuration::DatabaseSettings;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Establishes a connection pool to the SQLite database.
///
/// The database file is created when missing, runs in WAL mode and enforces
/// foreign keys on every pooled connection. The pool is the only storage handle in the process;
/// callers pass it on explicitly.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    // Every connection to `:memory:` opens its own private database.
    if settings.url.contains(":memory:") {
        return connect_in_memory().await;
    }

    let options = SqliteConnectOptions::from_str(&settings.url)
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        // Readers never block the single writer, and writers queue instead of failing.
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(settings.acquire_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::info!(url = %settings.url, "Connected to database.");
    Ok(pool)
}

/// Opens a single-connection pool over a private in-memory database.
///
/// The connection is never recycled, otherwise the data would vanish with it.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the `agencies` and `reports` tables if they are absent.
///
/// Safe to run on every start; existing data is left untouched.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for statement in schema::ALL {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::debug!("Database schema is in place.");
    Ok(())
}

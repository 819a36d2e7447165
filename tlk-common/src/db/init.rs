//! Database pool initialization and settings accessors
//!
//! **[TLK-DB-010]** Shared SQLite database access. Every service opens the
//! same `tlk.db` in the resolved root folder; service-specific tables are
//! created by the service's own `db` module.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

use crate::Error;

/// Initialize database connection pool
///
/// **[TLK-DB-010]** Connects to tlk.db in the root folder
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    create_settings_table(&pool).await?;

    Ok(pool)
}

/// Create the settings key-value table if it doesn't exist
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Generic setting getter
///
/// **[TLK-DB-020]** Settings table key-value pattern.
/// Returns `Ok(None)` when the key is not set.
pub async fn get_setting<T>(pool: &SqlitePool, key: &str) -> crate::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting '{}' failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// **[TLK-DB-020]** Upserts into the settings table
pub async fn set_setting<T>(pool: &SqlitePool, key: &str, value: T) -> crate::Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

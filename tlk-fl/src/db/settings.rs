//! Settings-table helpers specific to this service
//!
//! **[FLS-DB-030]** Besides the plain key-value accessors from
//! `tlk_common::db`, this module implements the named advisory lock used to
//! serialize auto-promotion: a compare-and-swap on a settings row whose
//! value is either `'0'` (free) or the RFC 3339 acquisition time. A stale
//! timestamp (crashed holder) may be taken over.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Try to take a named lock. Returns false when it is currently held.
pub async fn try_acquire_named_lock(
    pool: &SqlitePool,
    key: &str,
    stale_after_secs: i64,
) -> Result<bool> {
    sqlx::query("INSERT INTO settings (key, value) VALUES (?, '0') ON CONFLICT(key) DO NOTHING")
        .bind(key)
        .execute(pool)
        .await?;

    let (current,): (String,) = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    let now = Utc::now();
    if !is_available(&current, now, stale_after_secs) {
        return Ok(false);
    }

    // CAS against the observed value: a racing writer changes the row and
    // our UPDATE matches zero rows.
    let updated = sqlx::query("UPDATE settings SET value = ? WHERE key = ? AND value = ?")
        .bind(now.to_rfc3339())
        .bind(key)
        .bind(&current)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(updated == 1)
}

/// Release a named lock taken by this invocation
pub async fn release_named_lock(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("UPDATE settings SET value = '0' WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// A lock row is available when free, held past the stale horizon, or
/// holding an unreadable value
fn is_available(value: &str, now: DateTime<Utc>, stale_after_secs: i64) -> bool {
    if value == "0" {
        return true;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(acquired) => (now - acquired.with_timezone(&Utc)).num_seconds() > stale_after_secs,
        Err(_) => true,
    }
}

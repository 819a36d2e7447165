//! Table definitions for the Featured Listings service
//!
//! The wider platform owns these collections (profile CRUD, admin approval
//! write to them); this service creates them if missing so it can run
//! standalone in development and tests.

use anyhow::Result;
use sqlx::SqlitePool;

/// Create the tutors table and its featured-query index
pub async fn create_tutors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutors (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            headline TEXT,
            subjects TEXT NOT NULL DEFAULT '',
            regions TEXT NOT NULL DEFAULT '',
            modes TEXT NOT NULL DEFAULT '',
            category TEXT,
            hourly_rate INTEGER,
            is_vip INTEGER NOT NULL DEFAULT 0,
            is_top INTEGER NOT NULL DEFAULT 0,
            tier_level INTEGER NOT NULL DEFAULT 0,
            rating_score REAL,
            is_featured INTEGER NOT NULL DEFAULT 0,
            approval_status TEXT NOT NULL DEFAULT 'pending',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tutors_featured
        ON tutors (is_featured, active, approval_status, is_vip, is_top)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the student_cases table and its featured-query index
pub async fn create_student_cases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student_cases (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            subjects TEXT NOT NULL DEFAULT '',
            regions TEXT NOT NULL DEFAULT '',
            modes TEXT NOT NULL DEFAULT '',
            category TEXT,
            budget INTEGER,
            is_vip INTEGER NOT NULL DEFAULT 0,
            is_top INTEGER NOT NULL DEFAULT 0,
            tier_level INTEGER NOT NULL DEFAULT 0,
            rating_score REAL,
            is_featured INTEGER NOT NULL DEFAULT 0,
            approval_status TEXT NOT NULL DEFAULT 'pending',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_student_cases_featured
        ON student_cases (is_featured, active, approval_status, is_vip, is_top)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

//! Student-case store adapter
//!
//! sqlx-backed `TierStore` implementation over the student_cases table.
//! Mirrors `db::tutors`; only the table, the public columns, and the row
//! mapping differ.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::engine::{FacetFilter, TierStore};
use crate::models::{StudentCase, Tier};

use super::{build_listing_query, join_csv, parse_timestamp, settings, split_csv, ListingOrder};

const COLUMNS: &str = "id, title, description, subjects, regions, modes, category, \
                       budget, is_vip, is_top, tier_level, rating_score, created_at";
const LOCK_KEY: &str = "auto_promote_lock:cases";

/// Student-case collection adapter
#[derive(Clone)]
pub struct CaseStore {
    pool: SqlitePool,
    lock_stale_secs: i64,
}

impl CaseStore {
    pub fn new(pool: SqlitePool, lock_stale_secs: i64) -> Self {
        Self {
            pool,
            lock_stale_secs,
        }
    }

    async fn fetch(
        &self,
        tier: Option<Tier>,
        facets: &FacetFilter,
        limit: u32,
        order: ListingOrder,
    ) -> Result<Vec<StudentCase>> {
        let (sql, binds) = build_listing_query("student_cases", COLUMNS, tier, facets, order);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query.bind(limit as i64).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .filter_map(|row| match case_from_row(row) {
                Ok(case) => Some(case),
                Err(e) => {
                    warn!(error = %e, "dropping malformed case row");
                    None
                }
            })
            .collect())
    }
}

fn case_from_row(row: &SqliteRow) -> Result<StudentCase> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)?;

    let rating_score = row.try_get::<Option<f64>, _>("rating_score")?.unwrap_or(0.0);
    if !(0.0..=5.0).contains(&rating_score) {
        bail!("rating_score out of range [0, 5]: {rating_score}");
    }

    let created_at: String = row.try_get("created_at")?;
    let created_at = parse_timestamp(&created_at)?;

    Ok(StudentCase {
        id,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        subjects: split_csv(row.try_get("subjects")?),
        regions: split_csv(row.try_get("regions")?),
        modes: split_csv(row.try_get("modes")?),
        category: row.try_get("category")?,
        budget: row.try_get("budget")?,
        is_vip: row.try_get("is_vip")?,
        is_top: row.try_get("is_top")?,
        tier_level: row.try_get("tier_level")?,
        rating_score,
        created_at,
    })
}

#[async_trait]
impl TierStore for CaseStore {
    type Entity = StudentCase;

    fn kind(&self) -> &'static str {
        "cases"
    }

    async fn fetch_tier(
        &self,
        tier: Tier,
        facets: &FacetFilter,
        limit: u32,
    ) -> Result<Vec<StudentCase>> {
        self.fetch(Some(tier), facets, limit, ListingOrder::RatingThenRecency)
            .await
    }

    async fn promote(&self, ids: &[Uuid], tier: Tier) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let (is_vip, is_top) = tier.to_flags();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE student_cases SET is_vip = ?, is_top = ?, tier_level = 0, \
             updated_at = CURRENT_TIMESTAMP WHERE id IN ({placeholders})"
        );
        let mut query = sqlx::query(&sql).bind(is_vip).bind(is_top);
        for id in ids {
            query = query.bind(id.to_string());
        }
        query.execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch_featured_recent(
        &self,
        facets: &FacetFilter,
        limit: u32,
    ) -> Result<Vec<StudentCase>> {
        self.fetch(None, facets, limit, ListingOrder::RecencyOnly).await
    }

    async fn try_acquire_promotion_lock(&self) -> Result<bool> {
        settings::try_acquire_named_lock(&self.pool, LOCK_KEY, self.lock_stale_secs).await
    }

    async fn release_promotion_lock(&self) -> Result<()> {
        settings::release_named_lock(&self.pool, LOCK_KEY).await
    }
}

/// Save a case as a visible featured listing (approved, active, featured)
pub async fn save_case(pool: &SqlitePool, case: &StudentCase) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO student_cases (
            id, title, description, subjects, regions, modes, category,
            budget, is_vip, is_top, tier_level, rating_score,
            is_featured, approval_status, active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 'approved', 1, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            subjects = excluded.subjects,
            regions = excluded.regions,
            modes = excluded.modes,
            category = excluded.category,
            budget = excluded.budget,
            is_vip = excluded.is_vip,
            is_top = excluded.is_top,
            tier_level = excluded.tier_level,
            rating_score = excluded.rating_score,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(case.id.to_string())
    .bind(&case.title)
    .bind(&case.description)
    .bind(join_csv(&case.subjects))
    .bind(join_csv(&case.regions))
    .bind(join_csv(&case.modes))
    .bind(&case.category)
    .bind(case.budget)
    .bind(case.is_vip)
    .bind(case.is_top)
    .bind(case.tier_level)
    .bind(case.rating_score)
    .bind(case.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

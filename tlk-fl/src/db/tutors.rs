//! Tutor store adapter
//!
//! **[FLS-DB-040]** sqlx-backed `TierStore` implementation over the tutors
//! table. Malformed rows (rating outside [0, 5], unparseable id or
//! timestamp) are dropped with a warning rather than failing the query.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::engine::{FacetFilter, TierStore};
use crate::models::{Tier, Tutor};

use super::{build_listing_query, join_csv, parse_timestamp, settings, split_csv, ListingOrder};

const COLUMNS: &str = "id, display_name, headline, subjects, regions, modes, category, \
                       hourly_rate, is_vip, is_top, tier_level, rating_score, created_at";
const LOCK_KEY: &str = "auto_promote_lock:tutors";

/// Tutor collection adapter
#[derive(Clone)]
pub struct TutorStore {
    pool: SqlitePool,
    lock_stale_secs: i64,
}

impl TutorStore {
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
    ) -> Result<Vec<Tutor>> {
        let (sql, binds) = build_listing_query("tutors", COLUMNS, tier, facets, order);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query.bind(limit as i64).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .filter_map(|row| match tutor_from_row(row) {
                Ok(tutor) => Some(tutor),
                Err(e) => {
                    warn!(error = %e, "dropping malformed tutor row");
                    None
                }
            })
            .collect())
    }
}

fn tutor_from_row(row: &SqliteRow) -> Result<Tutor> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)?;

    let rating_score = row.try_get::<Option<f64>, _>("rating_score")?.unwrap_or(0.0);
    if !(0.0..=5.0).contains(&rating_score) {
        bail!("rating_score out of range [0, 5]: {rating_score}");
    }

    let created_at: String = row.try_get("created_at")?;
    let created_at = parse_timestamp(&created_at)?;

    Ok(Tutor {
        id,
        display_name: row.try_get("display_name")?,
        headline: row.try_get("headline")?,
        subjects: split_csv(row.try_get("subjects")?),
        regions: split_csv(row.try_get("regions")?),
        modes: split_csv(row.try_get("modes")?),
        category: row.try_get("category")?,
        hourly_rate: row.try_get("hourly_rate")?,
        is_vip: row.try_get("is_vip")?,
        is_top: row.try_get("is_top")?,
        tier_level: row.try_get("tier_level")?,
        rating_score,
        created_at,
    })
}

#[async_trait]
impl TierStore for TutorStore {
    type Entity = Tutor;

    fn kind(&self) -> &'static str {
        "tutors"
    }

    async fn fetch_tier(
        &self,
        tier: Tier,
        facets: &FacetFilter,
        limit: u32,
    ) -> Result<Vec<Tutor>> {
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
            "UPDATE tutors SET is_vip = ?, is_top = ?, tier_level = 0, \
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
    ) -> Result<Vec<Tutor>> {
        self.fetch(None, facets, limit, ListingOrder::RecencyOnly).await
    }

    async fn try_acquire_promotion_lock(&self) -> Result<bool> {
        settings::try_acquire_named_lock(&self.pool, LOCK_KEY, self.lock_stale_secs).await
    }

    async fn release_promotion_lock(&self) -> Result<()> {
        settings::release_named_lock(&self.pool, LOCK_KEY).await
    }
}

/// Save a tutor as a visible featured listing (approved, active, featured)
///
/// The CRUD and admin-approval layers own these rows in production; this
/// upsert exists for development seeding and tests.
pub async fn save_tutor(pool: &SqlitePool, tutor: &Tutor) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tutors (
            id, display_name, headline, subjects, regions, modes, category,
            hourly_rate, is_vip, is_top, tier_level, rating_score,
            is_featured, approval_status, active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 'approved', 1, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            display_name = excluded.display_name,
            headline = excluded.headline,
            subjects = excluded.subjects,
            regions = excluded.regions,
            modes = excluded.modes,
            category = excluded.category,
            hourly_rate = excluded.hourly_rate,
            is_vip = excluded.is_vip,
            is_top = excluded.is_top,
            tier_level = excluded.tier_level,
            rating_score = excluded.rating_score,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(tutor.id.to_string())
    .bind(&tutor.display_name)
    .bind(&tutor.headline)
    .bind(join_csv(&tutor.subjects))
    .bind(join_csv(&tutor.regions))
    .bind(join_csv(&tutor.modes))
    .bind(&tutor.category)
    .bind(tutor.hourly_rate)
    .bind(tutor.is_vip)
    .bind(tutor.is_top)
    .bind(tutor.tier_level)
    .bind(tutor.rating_score)
    .bind(tutor.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

//! Database access for the Featured Listings service
//!
//! **[FLS-DB-010]** Shared SQLite database access. The two listing tables
//! are symmetric in their ranking-relevant columns, so the query text for
//! tier fetches is built by one helper and parameterized by table name and
//! column list.

pub mod cases;
pub mod parameters;
pub mod schema;
pub mod settings;
pub mod tutors;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;

use crate::engine::FacetFilter;
use crate::models::Tier;

/// Initialize service-specific tables
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    tlk_common::db::create_settings_table(pool).await?;
    schema::create_tutors_table(pool).await?;
    schema::create_student_cases_table(pool).await?;
    Ok(())
}

/// Visibility gate applied to every engine-facing query
///
/// **[FLS-DB-020]** Entities failing this gate are invisible to the ranking
/// engine; the gate is enforced here, never re-checked downstream.
pub(crate) const VISIBILITY_GATE: &str =
    "active = 1 AND approval_status = 'approved' AND is_featured = 1";

/// SQL predicate selecting one tier. VIP wins when legacy data has both
/// flags set, so the TOP and NORMAL predicates exclude the higher flags.
pub(crate) fn tier_predicate(tier: Tier) -> &'static str {
    match tier {
        Tier::Vip => "is_vip = 1",
        Tier::Top => "is_top = 1 AND is_vip = 0",
        Tier::Normal => "is_vip = 0 AND is_top = 0",
    }
}

/// Sort applied to engine-facing queries
#[derive(Debug, Clone, Copy)]
pub(crate) enum ListingOrder {
    /// Tier fetches: rating desc, recency desc, id as deterministic final key
    RatingThenRecency,
    /// Degraded mode: recency only
    RecencyOnly,
}

impl ListingOrder {
    fn sql(self) -> &'static str {
        match self {
            ListingOrder::RatingThenRecency => {
                "ORDER BY COALESCE(rating_score, 0) DESC, created_at DESC, id ASC"
            }
            ListingOrder::RecencyOnly => "ORDER BY created_at DESC, id ASC",
        }
    }
}

/// Build a gated, faceted, ordered SELECT with a trailing LIMIT placeholder.
/// Returns the SQL plus the facet bind values (bound before the limit).
///
/// Facets apply identically to every tier query: the tier predicate and the
/// facet conditions are independent clauses.
pub(crate) fn build_listing_query(
    table: &str,
    columns: &str,
    tier: Option<Tier>,
    facets: &FacetFilter,
    order: ListingOrder,
) -> (String, Vec<String>) {
    let mut sql = format!("SELECT {columns} FROM {table} WHERE {VISIBILITY_GATE}");
    let mut binds: Vec<String> = Vec::new();

    if let Some(tier) = tier {
        sql.push_str(" AND ");
        sql.push_str(tier_predicate(tier));
    }

    if let Some(category) = &facets.category {
        sql.push_str(" AND category = ?");
        binds.push(category.clone());
    }
    push_set_facet(&mut sql, &mut binds, "subjects", &facets.subjects);
    push_set_facet(&mut sql, &mut binds, "regions", &facets.regions);
    push_set_facet(&mut sql, &mut binds, "modes", &facets.modes);

    sql.push(' ');
    sql.push_str(order.sql());
    sql.push_str(" LIMIT ?");

    (sql, binds)
}

/// Any-of membership test against a comma-joined set column
fn push_set_facet(sql: &mut String, binds: &mut Vec<String>, column: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let one = format!("instr(',' || {column} || ',', ',' || ? || ',') > 0");
    let group = vec![one; values.len()].join(" OR ");
    sql.push_str(&format!(" AND ({group})"));
    binds.extend(values.iter().cloned());
}

/// Split a comma-joined set column into values
pub(crate) fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Join set values into the comma-joined column representation
pub(crate) fn join_csv(values: &[String]) -> String {
    values.join(",")
}

/// Parse a stored timestamp (RFC 3339, or SQLite CURRENT_TIMESTAMP format)
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    bail!("unparseable timestamp: {raw}")
}

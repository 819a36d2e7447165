//! Featured-listing endpoints
//!
//! **[FLS-API-010]** GET /api/featured/tutors, GET /api/featured/cases.
//! Both run the same engine; they differ in the store adapter and the
//! default limit. The response envelope is
//! `{ success, data: { <kind>: [...], totalCount }, source }` with
//! `recommendationType` and `priorityScore` attached to every item.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::db::cases::CaseStore;
use crate::db::parameters::load_ranking_params;
use crate::db::tutors::TutorStore;
use crate::engine::{FacetFilter, FeaturedEngine, FeaturedQuery, RankedOutcome, TierStore};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters shared by both listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct FeaturedListQuery {
    pub limit: Option<u32>,
    pub category: Option<String>,
    /// Comma-separated subject facet
    pub subjects: Option<String>,
    /// Comma-separated region facet
    pub regions: Option<String>,
    /// Comma-separated mode facet
    pub modes: Option<String>,
}

impl FeaturedListQuery {
    fn facets(&self) -> FacetFilter {
        FacetFilter {
            category: self.category.clone().filter(|c| !c.trim().is_empty()),
            subjects: split_param(&self.subjects),
            regions: split_param(&self.regions),
            modes: split_param(&self.modes),
        }
    }
}

fn split_param(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// GET /api/featured/tutors
pub async fn featured_tutors(
    State(state): State<AppState>,
    Query(query): Query<FeaturedListQuery>,
) -> ApiResult<Json<Value>> {
    let params = load_ranking_params(&state.db).await?;
    let limit = params.clamp_limit(query.limit, params.default_tutor_limit);
    let store = TutorStore::new(state.db.clone(), params.promotion_lock_stale_secs);

    let engine = FeaturedEngine::new(&store, &params);
    let request = FeaturedQuery {
        limit,
        facets: query.facets(),
    };

    match engine.run(&request).await {
        Ok(outcome) => Ok(Json(listing_response(&store, &outcome)?)),
        Err(e) => {
            state.record_error(&e).await;
            Err(ApiError::Internal(format!("featured tutors unavailable: {e}")))
        }
    }
}

/// GET /api/featured/cases
pub async fn featured_cases(
    State(state): State<AppState>,
    Query(query): Query<FeaturedListQuery>,
) -> ApiResult<Json<Value>> {
    let params = load_ranking_params(&state.db).await?;
    let limit = params.clamp_limit(query.limit, params.default_case_limit);
    let store = CaseStore::new(state.db.clone(), params.promotion_lock_stale_secs);

    let engine = FeaturedEngine::new(&store, &params);
    let request = FeaturedQuery {
        limit,
        facets: query.facets(),
    };

    match engine.run(&request).await {
        Ok(outcome) => Ok(Json(listing_response(&store, &outcome)?)),
        Err(e) => {
            state.record_error(&e).await;
            Err(ApiError::Internal(format!("featured cases unavailable: {e}")))
        }
    }
}

/// Build the response envelope: entity public fields plus ranking metadata
fn listing_response<S: TierStore>(
    store: &S,
    outcome: &RankedOutcome<S::Entity>,
) -> Result<Value, ApiError> {
    let mut items = Vec::with_capacity(outcome.items.len());
    for item in &outcome.items {
        let mut value = serde_json::to_value(&item.entity)
            .map_err(|e| ApiError::Internal(format!("serialize listing failed: {e}")))?;
        if let Value::Object(map) = &mut value {
            map.insert("recommendationType".to_string(), json!(item.label.as_str()));
            map.insert("priorityScore".to_string(), json!(item.score));
        }
        items.push(value);
    }

    if let Some(promotion) = &outcome.promoted {
        info!(kind = store.kind(), vip = promotion.vip_promoted, top = promotion.top_promoted,
            "request triggered auto-promotion");
    }

    let total = items.len();
    Ok(json!({
        "success": true,
        "data": {
            (store.kind()): items,
            "totalCount": total,
        },
        "source": outcome.source.as_str(),
    }))
}

/// Build featured-listing routes
pub fn featured_routes() -> Router<AppState> {
    Router::new()
        .route("/api/featured/tutors", get(featured_tutors))
        .route("/api/featured/cases", get(featured_cases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_split_and_trim_comma_params() {
        let query = FeaturedListQuery {
            limit: None,
            category: Some("stem".to_string()),
            subjects: Some("math, physics ,".to_string()),
            regions: None,
            modes: Some(" online".to_string()),
        };
        let facets = query.facets();
        assert_eq!(facets.category.as_deref(), Some("stem"));
        assert_eq!(facets.subjects, vec!["math", "physics"]);
        assert!(facets.regions.is_empty());
        assert_eq!(facets.modes, vec!["online"]);
    }

    #[test]
    fn blank_category_is_ignored() {
        let query = FeaturedListQuery {
            category: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(query.facets().is_empty());
    }
}

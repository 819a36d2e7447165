//! Ranking parameter management API handlers
//!
//! GET /api/ranking/parameters, POST /api/ranking/parameters

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use tlk_common::RankingParams;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/ranking/parameters response
#[derive(Debug, Serialize)]
pub struct RankingParametersResponse {
    #[serde(flatten)]
    pub parameters: RankingParams,
}

/// POST /api/ranking/parameters request (partial updates)
#[derive(Debug, Deserialize)]
pub struct UpdateParametersRequest {
    pub vip_promote_count: Option<u32>,
    pub top_promote_count: Option<u32>,
    pub high_rating_threshold: Option<f64>,
    pub default_tutor_limit: Option<u32>,
    pub default_case_limit: Option<u32>,
    pub max_limit: Option<u32>,
    pub promotion_lock_stale_secs: Option<i64>,
}

/// POST /api/ranking/parameters response
#[derive(Debug, Serialize)]
pub struct UpdateParametersResponse {
    pub status: String,
    #[serde(flatten)]
    pub parameters: RankingParams,
}

/// GET /api/ranking/parameters
///
/// Get ranking parameters from the settings table (defaults where unset).
pub async fn get_ranking_parameters(
    State(state): State<AppState>,
) -> ApiResult<Json<RankingParametersResponse>> {
    let parameters = crate::db::parameters::load_ranking_params(&state.db).await?;

    tracing::debug!(?parameters, "Get ranking parameters from database");

    Ok(Json(RankingParametersResponse { parameters }))
}

/// POST /api/ranking/parameters
///
/// Update ranking parameters (partial update). Rejects out-of-range values.
pub async fn update_ranking_parameters(
    State(state): State<AppState>,
    Json(request): Json<UpdateParametersRequest>,
) -> ApiResult<Json<UpdateParametersResponse>> {
    tracing::info!(?request, "Update ranking parameters");

    let mut parameters = crate::db::parameters::load_ranking_params(&state.db).await?;

    if let Some(val) = request.vip_promote_count {
        parameters.vip_promote_count = val;
    }
    if let Some(val) = request.top_promote_count {
        parameters.top_promote_count = val;
    }
    if let Some(val) = request.high_rating_threshold {
        parameters.high_rating_threshold = val;
    }
    if let Some(val) = request.default_tutor_limit {
        parameters.default_tutor_limit = val;
    }
    if let Some(val) = request.default_case_limit {
        parameters.default_case_limit = val;
    }
    if let Some(val) = request.max_limit {
        parameters.max_limit = val;
    }
    if let Some(val) = request.promotion_lock_stale_secs {
        parameters.promotion_lock_stale_secs = val;
    }

    parameters
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    crate::db::parameters::save_ranking_params(&state.db, &parameters).await?;

    Ok(Json(UpdateParametersResponse {
        status: "updated".to_string(),
        parameters,
    }))
}

/// Build parameter management routes
pub fn parameter_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ranking/parameters", get(get_ranking_parameters))
        .route("/api/ranking/parameters", post(update_ranking_parameters))
}

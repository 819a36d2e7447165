//! tlk-fl library interface
//!
//! Exposes the ranking engine, store adapters, and router for integration
//! testing.

pub mod api;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes (surfaced by /health)
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember the most recent failure for /health diagnostics
    pub async fn record_error(&self, error: &anyhow::Error) {
        *self.last_error.write().await = Some(error.to_string());
    }
}

/// Build application router
///
/// **[FLS-API-020]** The frontends consume these endpoints cross-origin, so
/// the router carries a permissive CORS layer alongside request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::featured_routes())
        .merge(api::parameter_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

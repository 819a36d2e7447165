//! Ranking parameter persistence
//!
//! Load/save `RankingParams` from the settings table. Defaults apply for
//! any key not present, so a fresh database behaves sensibly with zero
//! configuration.

use anyhow::Result;
use sqlx::SqlitePool;

use tlk_common::db::{get_setting, set_setting};
use tlk_common::RankingParams;

/// Load ranking parameters from the settings table
///
/// Returns compiled defaults for unset keys.
pub async fn load_ranking_params(pool: &SqlitePool) -> Result<RankingParams> {
    let mut params = RankingParams::default();
    let mut loaded_count = 0;

    if let Some(val) = get_setting(pool, "fl_vip_promote_count").await? {
        params.vip_promote_count = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_top_promote_count").await? {
        params.top_promote_count = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_high_rating_threshold").await? {
        params.high_rating_threshold = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_default_tutor_limit").await? {
        params.default_tutor_limit = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_default_case_limit").await? {
        params.default_case_limit = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_max_limit").await? {
        params.max_limit = val;
        loaded_count += 1;
    }
    if let Some(val) = get_setting(pool, "fl_promotion_lock_stale_secs").await? {
        params.promotion_lock_stale_secs = val;
        loaded_count += 1;
    }

    if loaded_count > 0 {
        tracing::debug!("Loaded {} ranking parameters from database", loaded_count);
    }
    Ok(params)
}

/// Save ranking parameters to the settings table
pub async fn save_ranking_params(pool: &SqlitePool, params: &RankingParams) -> Result<()> {
    tracing::info!(?params, "Saving ranking parameters to database");

    set_setting(pool, "fl_vip_promote_count", params.vip_promote_count).await?;
    set_setting(pool, "fl_top_promote_count", params.top_promote_count).await?;
    set_setting(pool, "fl_high_rating_threshold", params.high_rating_threshold).await?;
    set_setting(pool, "fl_default_tutor_limit", params.default_tutor_limit).await?;
    set_setting(pool, "fl_default_case_limit", params.default_case_limit).await?;
    set_setting(pool, "fl_max_limit", params.max_limit).await?;
    set_setting(pool, "fl_promotion_lock_stale_secs", params.promotion_lock_stale_secs).await?;

    Ok(())
}

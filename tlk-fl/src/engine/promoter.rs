//! Auto-promotion fallback
//!
//! **[FLS-PROMO-010]** When the platform has no promoted listings at all,
//! the best-rated NORMAL entities are reclassified so the featured carousel
//! is never empty: a prefix to VIP, the next prefix to TOP, both persisted.
//! This is the engine's only write path.
//!
//! **[FLS-PROMO-020]** Promotion is serialized by a persisted single-writer
//! lock (settings-table compare-and-swap). An invocation that loses the race
//! skips promotion and serves its un-promoted result; the winner's mutation
//! is picked up by the next invocation. Re-running once VIP or TOP is
//! populated is a no-op because the trigger is re-checked under the lock.

use anyhow::Result;
use tracing::{info, warn};
use uuid::Uuid;

use tlk_common::RankingParams;

use super::store::{FacetFilter, TierStore};
use crate::models::{Listing, Tier};

/// What a successful promotion pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionOutcome {
    pub vip_promoted: usize,
    pub top_promoted: usize,
}

/// Attempt the auto-promotion fallback
///
/// Returns `Ok(Some(outcome))` when this invocation performed a promotion,
/// `Ok(None)` when it was skipped (lock held elsewhere, or the trigger no
/// longer held under the lock).
///
/// The trigger is re-checked — and the promotion prefix selected — against
/// the *unfiltered* collection: the caller's facets decide what this request
/// sees, but a persisted tier mutation must reflect the whole platform, not
/// whichever facet combination happened to trigger it.
pub async fn try_auto_promote<S: TierStore>(
    store: &S,
    params: &RankingParams,
) -> Result<Option<PromotionOutcome>> {
    if !store.try_acquire_promotion_lock().await? {
        info!(kind = store.kind(), "promotion lock held elsewhere; skipping");
        return Ok(None);
    }

    let result = promote_under_lock(store, params).await;

    if let Err(e) = store.release_promotion_lock().await {
        warn!(kind = store.kind(), error = %e, "failed to release promotion lock");
    }

    result
}

async fn promote_under_lock<S: TierStore>(
    store: &S,
    params: &RankingParams,
) -> Result<Option<PromotionOutcome>> {
    let unfiltered = FacetFilter::default();

    // Re-check the trigger now that we hold the lock: a racing invocation
    // may have promoted between our fetch and our acquire.
    let vip = store.fetch_tier(Tier::Vip, &unfiltered, 1).await?;
    let top = store.fetch_tier(Tier::Top, &unfiltered, 1).await?;
    if !vip.is_empty() || !top.is_empty() {
        info!(kind = store.kind(), "promoted tiers populated; auto-promotion not needed");
        return Ok(None);
    }

    let want = params.vip_promote_count + params.top_promote_count;
    let candidates = store.fetch_tier(Tier::Normal, &unfiltered, want).await?;
    if candidates.is_empty() {
        return Ok(None);
    }

    // The store sorts by (rating desc, created_at desc, id), so the prefix
    // split is deterministic for a fixed collection.
    let vip_ids: Vec<Uuid> = candidates
        .iter()
        .take(params.vip_promote_count as usize)
        .map(|e| e.id())
        .collect();
    let top_ids: Vec<Uuid> = candidates
        .iter()
        .skip(params.vip_promote_count as usize)
        .take(params.top_promote_count as usize)
        .map(|e| e.id())
        .collect();

    if !vip_ids.is_empty() {
        store.promote(&vip_ids, Tier::Vip).await?;
    }
    if !top_ids.is_empty() {
        store.promote(&top_ids, Tier::Top).await?;
    }

    let outcome = PromotionOutcome {
        vip_promoted: vip_ids.len(),
        top_promoted: top_ids.len(),
    };
    info!(
        kind = store.kind(),
        vip = outcome.vip_promoted,
        top = outcome.top_promoted,
        "auto-promoted normal listings into empty featured tiers"
    );

    Ok(Some(outcome))
}

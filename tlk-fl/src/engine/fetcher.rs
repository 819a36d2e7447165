//! Tier candidate fetching
//!
//! **[FLS-FETCH-010]** One bounded query per tier, fanned out concurrently
//! and joined. Each tier is queried for up to the full requested result
//! count; trimming happens later in the assembler, so an under-populated
//! tier never starves the result.

use tracing::warn;

use super::store::{FacetFilter, TierStore};
use crate::models::Tier;

/// Raw per-tier candidate buckets, before deduplication
#[derive(Debug)]
pub struct TierBuckets<E> {
    pub vip: Vec<E>,
    pub top: Vec<E>,
    pub normal: Vec<E>,
    /// Tier queries that failed and were served as empty (degraded)
    pub failed_tiers: usize,
}

impl<E> TierBuckets<E> {
    /// True when every tier query failed — the store is effectively down
    pub fn all_failed(&self) -> bool {
        self.failed_tiers == 3
    }
}

/// Fetch candidates for all three tiers concurrently
///
/// **[FLS-FETCH-020]** A failed tier query is logged and contributes an
/// empty bucket instead of failing the invocation; the caller decides what
/// total failure means.
pub async fn fetch_tier_candidates<S: TierStore>(
    store: &S,
    facets: &FacetFilter,
    limit: u32,
) -> TierBuckets<S::Entity> {
    let (vip, top, normal) = tokio::join!(
        store.fetch_tier(Tier::Vip, facets, limit),
        store.fetch_tier(Tier::Top, facets, limit),
        store.fetch_tier(Tier::Normal, facets, limit),
    );

    let mut failed_tiers = 0;
    let mut unwrap_bucket = |tier: Tier, result: anyhow::Result<Vec<S::Entity>>| match result {
        Ok(entities) => entities,
        Err(e) => {
            warn!(kind = store.kind(), tier = tier.as_str(), error = %e,
                "tier query failed; serving tier as empty");
            failed_tiers += 1;
            Vec::new()
        }
    };

    let vip = unwrap_bucket(Tier::Vip, vip);
    let top = unwrap_bucket(Tier::Top, top);
    let normal = unwrap_bucket(Tier::Normal, normal);

    TierBuckets {
        vip,
        top,
        normal,
        failed_tiers,
    }
}

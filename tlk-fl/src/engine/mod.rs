//! Featured-listing ranking engine
//!
//! **[FLS-ENG-010]** One generic pipeline serves both listing kinds; the
//! tutor and student-case endpoints differ only in the store adapter they
//! pass in. Stages, in order:
//!
//! 1. `fetcher` — concurrent per-tier candidate queries (VIP, TOP, NORMAL)
//! 2. `dedup` — drop ids already selected earlier in this invocation
//! 3. `promoter` — if both promoted tiers are empty, reclassify top-rated
//!    NORMAL listings and re-feed the fetcher
//! 4. `scorer` — recommendation label + priority score per entity
//! 5. `assembler` — tier-major merge, truncation
//!
//! **[FLS-ENG-020]** If the tiered pipeline itself fails, the engine serves
//! the plain featured set sorted by recency instead of an error: these
//! results power user-facing carousels, and an empty panel is worse than an
//! untiered one.

pub mod assembler;
pub mod dedup;
pub mod fetcher;
pub mod promoter;
pub mod scorer;
pub mod store;

pub use assembler::RankedItem;
pub use promoter::PromotionOutcome;
pub use scorer::RecommendationType;
pub use store::{FacetFilter, TierStore};

use anyhow::{bail, Result};
use tracing::warn;

use tlk_common::RankingParams;

use crate::models::Listing;
use dedup::SelectionState;

/// One ranking invocation's input
#[derive(Debug, Clone, Default)]
pub struct FeaturedQuery {
    /// Maximum result length (already clamped by the caller)
    pub limit: u32,
    pub facets: FacetFilter,
}

/// Which path produced the response data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingSource {
    TieredRanking,
    RecencyFallback,
}

impl RankingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingSource::TieredRanking => "tiered_ranking",
            RankingSource::RecencyFallback => "recency_fallback",
        }
    }
}

/// Ordered ranking output plus provenance
#[derive(Debug)]
pub struct RankedOutcome<E> {
    pub items: Vec<RankedItem<E>>,
    pub source: RankingSource,
    /// Set when this invocation performed an auto-promotion
    pub promoted: Option<PromotionOutcome>,
}

/// The unified ranking pipeline over one store adapter
pub struct FeaturedEngine<'a, S: TierStore> {
    store: &'a S,
    params: &'a RankingParams,
}

impl<'a, S: TierStore> FeaturedEngine<'a, S> {
    pub fn new(store: &'a S, params: &'a RankingParams) -> Self {
        Self { store, params }
    }

    /// Run the pipeline; fall back to the recency path on total failure
    ///
    /// Errors out only when the recency fallback itself fails (store down).
    pub async fn run(&self, query: &FeaturedQuery) -> Result<RankedOutcome<S::Entity>> {
        match self.run_tiered(query).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(kind = self.store.kind(), error = %e,
                    "tiered ranking failed; serving recency fallback");
                self.run_fallback(query).await
            }
        }
    }

    async fn run_tiered(&self, query: &FeaturedQuery) -> Result<RankedOutcome<S::Entity>> {
        let buckets = fetcher::fetch_tier_candidates(self.store, &query.facets, query.limit).await;
        if buckets.all_failed() {
            bail!("all tier queries failed");
        }

        let mut state = SelectionState::new();
        let mut vip = state.admit(buckets.vip);
        let mut top = state.admit(buckets.top);
        let mut normal = state.admit(buckets.normal);

        let mut promoted = None;
        if vip.is_empty() && top.is_empty() && !normal.is_empty() {
            // Promotion failure must not fail the read path; the un-promoted
            // NORMAL result is still a valid response.
            match promoter::try_auto_promote(self.store, self.params).await {
                Ok(Some(outcome)) => {
                    promoted = Some(outcome);
                    // Re-feed the fetcher: promoted entities now answer the
                    // VIP/TOP queries, so selection restarts from scratch.
                    let rerun =
                        fetcher::fetch_tier_candidates(self.store, &query.facets, query.limit)
                            .await;
                    let mut fresh = SelectionState::new();
                    vip = fresh.admit(rerun.vip);
                    top = fresh.admit(rerun.top);
                    normal = fresh.admit(rerun.normal);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(kind = self.store.kind(), error = %e, "auto-promotion failed");
                }
            }
        }

        let threshold = self.params.high_rating_threshold;
        let items = assembler::assemble(
            assembler::rank_bucket(vip, threshold),
            assembler::rank_bucket(top, threshold),
            assembler::rank_bucket(normal, threshold),
            query.limit as usize,
        );

        Ok(RankedOutcome {
            items,
            source: RankingSource::TieredRanking,
            promoted,
        })
    }

    /// Degraded mode: plain featured set, newest first, no tiering
    async fn run_fallback(&self, query: &FeaturedQuery) -> Result<RankedOutcome<S::Entity>> {
        let entities = self
            .store
            .fetch_featured_recent(&query.facets, query.limit)
            .await?;

        // Keep the store's recency order; labels and scores are diagnostic.
        let items = entities
            .into_iter()
            .map(|entity| {
                let score = scorer::priority_score(
                    RecommendationType::Fallback,
                    entity.rating(),
                    entity.tier_level(),
                );
                RankedItem {
                    entity,
                    label: RecommendationType::Fallback,
                    score,
                }
            })
            .collect();

        Ok(RankedOutcome {
            items,
            source: RankingSource::RecencyFallback,
            promoted: None,
        })
    }
}

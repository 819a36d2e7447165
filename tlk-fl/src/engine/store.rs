//! Entity store adapter seam
//!
//! **[FLS-STORE-010]** The engine is generic over this trait; the two sqlx
//! implementations live in `crate::db` (`TutorStore`, `CaseStore`). Every
//! fetch enforces the visibility gate (active, approved, featured) so the
//! engine itself never sees an ineligible entity.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Listing, Tier};

/// Caller-supplied facet filters, applied identically to every tier query
///
/// **[FLS-STORE-020]** Facets decide eligibility only; they must never bias
/// which tier an entity is classified into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetFilter {
    pub category: Option<String>,
    /// Match entities offering ANY of these subjects
    pub subjects: Vec<String>,
    /// Match entities serving ANY of these regions
    pub regions: Vec<String>,
    /// Match entities supporting ANY of these modes
    pub modes: Vec<String>,
}

impl FacetFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subjects.is_empty()
            && self.regions.is_empty()
            && self.modes.is_empty()
    }
}

/// Read/write interface over one listing collection
///
/// Tier fetches sort by `(rating_score DESC, created_at DESC)` and may return
/// fewer than `limit` rows without error; an `Err` means the store itself
/// failed. `promote` is the only mutation and is reserved for the
/// auto-promoter.
#[async_trait]
pub trait TierStore: Send + Sync {
    type Entity: Listing + Clone + Send + Sync + 'static;

    /// Collection name for logging and the response envelope ("tutors" / "cases")
    fn kind(&self) -> &'static str;

    /// Fetch up to `limit` visible entities of `tier`, facet-filtered,
    /// sorted by rating desc then recency desc
    async fn fetch_tier(
        &self,
        tier: Tier,
        facets: &FacetFilter,
        limit: u32,
    ) -> Result<Vec<Self::Entity>>;

    /// Persist a tier reclassification for the given ids (sets the target
    /// tier's flag, clears the other, zeroes tier_level)
    async fn promote(&self, ids: &[Uuid], tier: Tier) -> Result<()>;

    /// Visibility-gated fetch sorted by recency only; the degraded-mode path
    async fn fetch_featured_recent(
        &self,
        facets: &FacetFilter,
        limit: u32,
    ) -> Result<Vec<Self::Entity>>;

    /// Try to take the persisted single-writer promotion lock.
    /// Returns false when another invocation holds it.
    async fn try_acquire_promotion_lock(&self) -> Result<bool>;

    /// Release the promotion lock taken by this invocation
    async fn release_promotion_lock(&self) -> Result<()>;
}

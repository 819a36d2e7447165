//! Entity models for the Featured Listings service
//!
//! **[FLS-DM-010]** Two listing kinds share one ranking-relevant shape: the
//! `Listing` trait is the seam that lets a single engine rank either.

pub mod case;
pub mod tier;
pub mod tutor;

pub use case::StudentCase;
pub use tier::Tier;
pub use tutor::Tutor;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Ranking-relevant view of a listing entity
///
/// **[FLS-DM-020]** Implemented by `Tutor` and `StudentCase`. The engine
/// never touches entity-specific public fields; those travel through
/// `serde::Serialize` into the response.
pub trait Listing: serde::Serialize {
    /// Opaque unique identifier
    fn id(&self) -> Uuid;

    /// Promotion tier derived from the persisted flags (VIP wins if both set)
    fn tier(&self) -> Tier;

    /// Reclassify in-memory after a persisted promotion
    fn set_tier(&mut self, tier: Tier);

    /// Sub-rank within a tier; higher wins ties
    fn tier_level(&self) -> i64;

    /// Rating in [0, 5]
    fn rating(&self) -> f64;

    /// Creation time, final tie-break (newer first)
    fn created_at(&self) -> DateTime<Utc>;
}

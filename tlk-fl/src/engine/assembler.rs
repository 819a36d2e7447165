//! Result assembly
//!
//! **[FLS-ASM-010]** Merges the scored tier buckets in tier-major order,
//! sorts each bucket by priority score, truncates to the requested maximum.
//! Ordering inside a bucket falls back to recency (newer first) and then id
//! so equal-scored runs are deterministic.

use super::scorer::{self, RecommendationType};
use crate::models::Listing;

/// A selected entity with its ranking metadata
#[derive(Debug, Clone)]
pub struct RankedItem<E> {
    pub entity: E,
    pub label: RecommendationType,
    pub score: f64,
}

impl<E: Listing> RankedItem<E> {
    /// Classify and score one entity
    pub fn rank(entity: E, high_rating_threshold: f64) -> Self {
        let label = scorer::classify(entity.tier(), entity.rating(), high_rating_threshold);
        let score = scorer::priority_score(label, entity.rating(), entity.tier_level());
        Self { entity, label, score }
    }
}

/// Classify and score a whole bucket
pub fn rank_bucket<E: Listing>(bucket: Vec<E>, high_rating_threshold: f64) -> Vec<RankedItem<E>> {
    bucket
        .into_iter()
        .map(|entity| RankedItem::rank(entity, high_rating_threshold))
        .collect()
}

/// Sort one bucket: score desc, created_at desc, id asc
fn sort_bucket<E: Listing>(bucket: &mut [RankedItem<E>]) {
    bucket.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.entity.created_at().cmp(&a.entity.created_at()))
            .then_with(|| a.entity.id().cmp(&b.entity.id()))
    });
}

/// Concatenate tier buckets in tier-major order and truncate
///
/// **[FLS-ASM-020]** All VIP entries precede all TOP entries precede all
/// NORMAL/fallback entries, regardless of score; scores order entries only
/// within their bucket.
pub fn assemble<E: Listing>(
    mut vip: Vec<RankedItem<E>>,
    mut top: Vec<RankedItem<E>>,
    mut normal: Vec<RankedItem<E>>,
    max_results: usize,
) -> Vec<RankedItem<E>> {
    sort_bucket(&mut vip);
    sort_bucket(&mut top);
    sort_bucket(&mut normal);

    let mut result = vip;
    result.append(&mut top);
    result.append(&mut normal);
    result.truncate(max_results);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tier, Tutor};
    use chrono::{Duration, Utc};

    const THRESHOLD: f64 = 4.0;

    fn tutor(tier: Tier, rating: f64) -> Tutor {
        let mut t = Tutor::new(format!("{:?}-{}", tier, rating));
        let (is_vip, is_top) = tier.to_flags();
        t.is_vip = is_vip;
        t.is_top = is_top;
        t.rating_score = rating;
        t
    }

    fn ranked(entities: Vec<Tutor>) -> Vec<RankedItem<Tutor>> {
        rank_bucket(entities, THRESHOLD)
    }

    #[test]
    fn tier_major_order_beats_score() {
        let result = assemble(
            ranked(vec![tutor(Tier::Vip, 0.0)]),
            ranked(vec![tutor(Tier::Top, 5.0)]),
            ranked(vec![tutor(Tier::Normal, 5.0)]),
            10,
        );
        let tiers: Vec<Tier> = result.iter().map(|r| r.entity.tier()).collect();
        assert_eq!(tiers, vec![Tier::Vip, Tier::Top, Tier::Normal]);
    }

    #[test]
    fn buckets_sort_by_score_desc() {
        let result = assemble(
            ranked(vec![tutor(Tier::Vip, 2.0), tutor(Tier::Vip, 3.0)]),
            Vec::new(),
            Vec::new(),
            10,
        );
        assert_eq!(result[0].entity.rating_score, 3.0);
        assert_eq!(result[1].entity.rating_score, 2.0);
    }

    #[test]
    fn truncates_to_max_results() {
        let entities: Vec<Tutor> = (0..6).map(|_| tutor(Tier::Normal, 1.0)).collect();
        let result = assemble(Vec::new(), Vec::new(), ranked(entities), 4);
        assert_eq!(result.len(), 4);

        let result = assemble(Vec::new(), Vec::new(), ranked(vec![tutor(Tier::Normal, 1.0)]), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn equal_scores_break_ties_by_recency() {
        let older = {
            let mut t = tutor(Tier::Vip, 3.0);
            t.created_at = Utc::now() - Duration::days(2);
            t
        };
        let newer = tutor(Tier::Vip, 3.0);
        let newer_id = newer.id;

        let result = assemble(ranked(vec![older, newer]), Vec::new(), Vec::new(), 10);
        assert_eq!(result[0].entity.id, newer_id);
    }

    #[test]
    fn labels_follow_rating_threshold() {
        let result = assemble(
            Vec::new(),
            Vec::new(),
            ranked(vec![tutor(Tier::Normal, 4.5), tutor(Tier::Normal, 1.0)]),
            10,
        );
        assert_eq!(result[0].label, RecommendationType::NormalHighRating);
        assert_eq!(result[1].label, RecommendationType::Fallback);
    }
}

//! Priority scoring
//!
//! **[FLS-SCORE-010]** Assigns each selected entity a numeric score used
//! only for ordering inside the assembled result, never for tier
//! membership. The hard contract: any VIP score strictly exceeds any TOP
//! score, any TOP score strictly exceeds any NORMAL score, and any NORMAL
//! score strictly exceeds any fallback score, regardless of rating; within
//! a tier the score is monotone in rating.

use serde::Serialize;

use crate::models::Tier;

/// Diagnostic label carried on every response item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    VipHighRating,
    VipNormal,
    TopHighRating,
    TopNormal,
    NormalHighRating,
    Fallback,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::VipHighRating => "vip_high_rating",
            RecommendationType::VipNormal => "vip_normal",
            RecommendationType::TopHighRating => "top_high_rating",
            RecommendationType::TopNormal => "top_normal",
            RecommendationType::NormalHighRating => "normal_high_rating",
            RecommendationType::Fallback => "fallback",
        }
    }
}

// Score geometry. Tier bases are 200 apart; the maximum intra-tier bonus is
// RATING_WEIGHT * 5 + LEVEL_WEIGHT * LEVEL_CAP = 140, so no rating or tier
// level can cross a tier boundary.
const BASE_VIP: f64 = 1000.0;
const BASE_TOP: f64 = 800.0;
const BASE_NORMAL_HIGH: f64 = 600.0;
const BASE_FALLBACK: f64 = 400.0;
const RATING_WEIGHT: f64 = 20.0;
const LEVEL_WEIGHT: f64 = 4.0;
const LEVEL_CAP: i64 = 10;

/// Pick the recommendation label for an entity
///
/// "High rating" means `rating >= threshold`. Within NORMAL the label also
/// selects the score base: below-threshold NORMAL entities are the
/// fallback filler of the result tail.
pub fn classify(tier: Tier, rating: f64, high_rating_threshold: f64) -> RecommendationType {
    let high = rating >= high_rating_threshold;
    match (tier, high) {
        (Tier::Vip, true) => RecommendationType::VipHighRating,
        (Tier::Vip, false) => RecommendationType::VipNormal,
        (Tier::Top, true) => RecommendationType::TopHighRating,
        (Tier::Top, false) => RecommendationType::TopNormal,
        (Tier::Normal, true) => RecommendationType::NormalHighRating,
        (Tier::Normal, false) => RecommendationType::Fallback,
    }
}

/// Compute the priority score for an entity
///
/// **[FLS-SCORE-020]** `base(label) + RATING_WEIGHT * rating +
/// LEVEL_WEIGHT * min(tier_level, LEVEL_CAP)`. Rating is clamped to [0, 5];
/// rows outside that range are dropped before scoring.
pub fn priority_score(label: RecommendationType, rating: f64, tier_level: i64) -> f64 {
    let base = match label {
        RecommendationType::VipHighRating | RecommendationType::VipNormal => BASE_VIP,
        RecommendationType::TopHighRating | RecommendationType::TopNormal => BASE_TOP,
        RecommendationType::NormalHighRating => BASE_NORMAL_HIGH,
        RecommendationType::Fallback => BASE_FALLBACK,
    };
    let rating = rating.clamp(0.0, 5.0);
    let level = tier_level.clamp(0, LEVEL_CAP) as f64;
    base + RATING_WEIGHT * rating + LEVEL_WEIGHT * level
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 4.0;

    fn score(tier: Tier, rating: f64, level: i64) -> f64 {
        priority_score(classify(tier, rating, THRESHOLD), rating, level)
    }

    #[test]
    fn zero_rated_vip_outranks_perfect_top() {
        assert!(score(Tier::Vip, 0.0, 0) > score(Tier::Top, 5.0, i64::MAX));
    }

    #[test]
    fn zero_rated_top_outranks_perfect_normal() {
        assert!(score(Tier::Top, 0.0, 0) > score(Tier::Normal, 5.0, i64::MAX));
    }

    #[test]
    fn high_rating_normal_outranks_fallback() {
        // Just below threshold vs. exactly at it
        assert!(score(Tier::Normal, 4.0, 0) > score(Tier::Normal, 3.99, 100));
    }

    #[test]
    fn monotone_in_rating_within_tier() {
        for tier in [Tier::Vip, Tier::Top, Tier::Normal] {
            let mut prev = f64::MIN;
            for step in 0..=50 {
                let rating = step as f64 / 10.0;
                let s = score(tier, rating, 0);
                assert!(s >= prev, "score decreased at rating {rating} in {tier:?}");
                prev = s;
            }
        }
    }

    #[test]
    fn tier_level_breaks_ties_within_tier() {
        assert!(score(Tier::Vip, 3.0, 2) > score(Tier::Vip, 3.0, 1));
    }

    #[test]
    fn tier_level_is_capped() {
        assert_eq!(score(Tier::Vip, 3.0, LEVEL_CAP), score(Tier::Vip, 3.0, LEVEL_CAP + 50));
    }

    #[test]
    fn classify_labels() {
        assert_eq!(classify(Tier::Vip, 4.5, THRESHOLD), RecommendationType::VipHighRating);
        assert_eq!(classify(Tier::Vip, 1.0, THRESHOLD), RecommendationType::VipNormal);
        assert_eq!(classify(Tier::Top, 4.0, THRESHOLD), RecommendationType::TopHighRating);
        assert_eq!(classify(Tier::Top, 0.0, THRESHOLD), RecommendationType::TopNormal);
        assert_eq!(classify(Tier::Normal, 5.0, THRESHOLD), RecommendationType::NormalHighRating);
        assert_eq!(classify(Tier::Normal, 3.0, THRESHOLD), RecommendationType::Fallback);
    }

    #[test]
    fn wire_labels() {
        assert_eq!(RecommendationType::VipHighRating.as_str(), "vip_high_rating");
        assert_eq!(RecommendationType::Fallback.as_str(), "fallback");
    }
}

//! Ranking parameter definitions
//!
//! **[TLK-PARAM-010]** Database-backed parameters for the featured-listing
//! ranking engine. Compiled defaults here; persisted overrides live in the
//! settings table (loaded by the service's `db::parameters` module).

use serde::{Deserialize, Serialize};

/// Operational parameters for the featured-listing ranking engine
///
/// All fields are read-frequently, write-rarely. Scoring constants are not
/// parameters; they live with the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingParams {
    /// **[TLK-PARAM-020]** Entities promoted to VIP when auto-promotion fires
    ///
    /// Valid range: [0, 10]. Default: 3
    pub vip_promote_count: u32,

    /// **[TLK-PARAM-021]** Entities promoted to TOP when auto-promotion fires
    ///
    /// Valid range: [0, 20]. Default: 5
    pub top_promote_count: u32,

    /// **[TLK-PARAM-030]** Rating at or above which an entity counts as
    /// "high rating" for its recommendation label
    ///
    /// Valid range: [0.0, 5.0]. Default: 4.0
    pub high_rating_threshold: f64,

    /// Default result count for the tutor listing when the caller sends no limit
    ///
    /// Default: 24
    pub default_tutor_limit: u32,

    /// Default result count for the student-case listing when the caller sends no limit
    ///
    /// Default: 8
    pub default_case_limit: u32,

    /// **[TLK-PARAM-040]** Hard cap applied to any requested limit
    ///
    /// Valid range: [1, 200]. Default: 50
    pub max_limit: u32,

    /// Seconds after which a held auto-promotion lock is considered stale
    /// and may be taken over (crashed holder)
    ///
    /// Default: 120
    pub promotion_lock_stale_secs: i64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            vip_promote_count: 3,
            top_promote_count: 5,
            high_rating_threshold: 4.0,
            default_tutor_limit: 24,
            default_case_limit: 8,
            max_limit: 50,
            promotion_lock_stale_secs: 120,
        }
    }
}

impl RankingParams {
    /// Validate parameter ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.vip_promote_count > 10 {
            return Err(crate::Error::InvalidInput(format!(
                "vip_promote_count out of range [0, 10]: {}",
                self.vip_promote_count
            )));
        }
        if self.top_promote_count > 20 {
            return Err(crate::Error::InvalidInput(format!(
                "top_promote_count out of range [0, 20]: {}",
                self.top_promote_count
            )));
        }
        if !(0.0..=5.0).contains(&self.high_rating_threshold) {
            return Err(crate::Error::InvalidInput(format!(
                "high_rating_threshold out of range [0.0, 5.0]: {}",
                self.high_rating_threshold
            )));
        }
        if self.max_limit == 0 || self.max_limit > 200 {
            return Err(crate::Error::InvalidInput(format!(
                "max_limit out of range [1, 200]: {}",
                self.max_limit
            )));
        }
        Ok(())
    }

    /// Clamp a caller-supplied limit to the configured hard cap
    pub fn clamp_limit(&self, requested: Option<u32>, default: u32) -> u32 {
        requested.unwrap_or(default).min(self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RankingParams::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let params = RankingParams {
            high_rating_threshold: 5.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_zero_max_limit() {
        let params = RankingParams {
            max_limit: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn clamp_limit_applies_default_and_cap() {
        let params = RankingParams::default();
        assert_eq!(params.clamp_limit(None, 8), 8);
        assert_eq!(params.clamp_limit(Some(10), 8), 10);
        assert_eq!(params.clamp_limit(Some(500), 8), 50);
        assert_eq!(params.clamp_limit(Some(0), 8), 0);
    }
}

//! Student-case listing model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Listing, Tier};

/// Student-case record (a posted tutoring request)
///
/// Same ranking-relevant shape as `Tutor`; the public fields differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCase {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Requested subjects (facet)
    pub subjects: Vec<String>,
    /// Acceptable regions (facet)
    pub regions: Vec<String>,
    /// Acceptable teaching modes (facet)
    pub modes: Vec<String>,
    /// Listing category (facet)
    pub category: Option<String>,
    /// Offered budget in platform currency cents
    pub budget: Option<i64>,
    pub is_vip: bool,
    pub is_top: bool,
    pub tier_level: i64,
    pub rating_score: f64,
    pub created_at: DateTime<Utc>,
}

impl StudentCase {
    /// Create a new un-promoted case listing
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            subjects: Vec::new(),
            regions: Vec::new(),
            modes: Vec::new(),
            category: None,
            budget: None,
            is_vip: false,
            is_top: false,
            tier_level: 0,
            rating_score: 0.0,
            created_at: Utc::now(),
        }
    }
}

impl Listing for StudentCase {
    fn id(&self) -> Uuid {
        self.id
    }

    fn tier(&self) -> Tier {
        Tier::from_flags(self.is_vip, self.is_top)
    }

    fn set_tier(&mut self, tier: Tier) {
        let (is_vip, is_top) = tier.to_flags();
        self.is_vip = is_vip;
        self.is_top = is_top;
        self.tier_level = 0;
    }

    fn tier_level(&self) -> i64 {
        self.tier_level
    }

    fn rating(&self) -> f64 {
        self.rating_score
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

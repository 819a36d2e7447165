//! Tutor listing model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Listing, Tier};

/// Tutor record (public listing fields + ranking-relevant columns)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: Uuid,
    pub display_name: String,
    pub headline: Option<String>,
    /// Taught subjects (facet)
    pub subjects: Vec<String>,
    /// Service regions (facet)
    pub regions: Vec<String>,
    /// Teaching modes, e.g. "online", "in_person" (facet)
    pub modes: Vec<String>,
    /// Listing category (facet)
    pub category: Option<String>,
    /// Hourly rate in platform currency cents
    pub hourly_rate: Option<i64>,
    pub is_vip: bool,
    pub is_top: bool,
    pub tier_level: i64,
    pub rating_score: f64,
    pub created_at: DateTime<Utc>,
}

impl Tutor {
    /// Create a new un-promoted tutor listing
    pub fn new(display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            headline: None,
            subjects: Vec::new(),
            regions: Vec::new(),
            modes: Vec::new(),
            category: None,
            hourly_rate: None,
            is_vip: false,
            is_top: false,
            tier_level: 0,
            rating_score: 0.0,
            created_at: Utc::now(),
        }
    }
}

impl Listing for Tutor {
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

//! Promotion tier model

use serde::{Deserialize, Serialize};

/// Coarse promotion category of a listing
///
/// **[FLS-DM-030]** Derived from the persisted `is_vip` / `is_top` flags.
/// The canonical model keeps the flags mutually exclusive; when legacy data
/// has both set, VIP takes precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Vip,
    Top,
    Normal,
}

impl Tier {
    /// Derive tier from the persisted boolean flags
    pub fn from_flags(is_vip: bool, is_top: bool) -> Self {
        if is_vip {
            Tier::Vip
        } else if is_top {
            Tier::Top
        } else {
            Tier::Normal
        }
    }

    /// Flag pair to persist for this tier
    pub fn to_flags(self) -> (bool, bool) {
        match self {
            Tier::Vip => (true, false),
            Tier::Top => (false, true),
            Tier::Normal => (false, false),
        }
    }

    /// Tier-major ordering rank; higher sorts earlier in the result
    pub fn rank(self) -> u8 {
        match self {
            Tier::Vip => 2,
            Tier::Top => 1,
            Tier::Normal => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Vip => "vip",
            Tier::Top => "top",
            Tier::Normal => "normal",
        }
    }
}

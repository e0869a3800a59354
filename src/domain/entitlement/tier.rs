//! Subscription tier definitions.
//!
//! Represents the subscription levels a Habit Pro user can hold.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::EntitlementError;

/// Subscription tier.
///
/// Every user has exactly one tier at any instant. Unknown or corrupt values
/// never map to anything but [`Tier::Free`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free tier - no premium product features.
    #[default]
    Free,

    /// Paid tier - all product features.
    Premium,

    /// Operator tier - same product features as premium, plus access to
    /// elevated operational views.
    Admin,
}

impl Tier {
    /// All tiers, least privileged first.
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Premium, Tier::Admin];

    /// Returns the persisted form of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Admin => "admin",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Free => "Free",
            Tier::Premium => "Premium",
            Tier::Admin => "Admin",
        }
    }

    /// Returns true if this tier unlocks paid product features.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }

    /// Returns true if this tier may open operator-only views.
    ///
    /// This is not a product feature flag and is never part of
    /// [`FeatureFlags`](super::FeatureFlags).
    pub fn grants_operator_console(&self) -> bool {
        matches!(self, Tier::Admin)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Tier {
    type Err = EntitlementError;

    /// Parses the persisted form. Matching is exact: `"Premium"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "admin" => Ok(Tier::Admin),
            other => Err(EntitlementError::invalid_tier(other)),
        }
    }
}

//! Access decisions for gated features and operator views.
//!
//! Decisions fail closed: no identity or a free tier never yields `Allowed`
//! for a paid capability.

use serde::{Deserialize, Serialize};

use super::{resolve, Feature, Tier};

/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessResult {
    /// Access is granted.
    Allowed,
    /// Access is denied with a specific reason.
    Denied(AccessDeniedReason),
}

impl AccessResult {
    /// Returns true if access is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessResult::Allowed)
    }

    /// Returns true if access is denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessResult::Denied(_))
    }

    /// Converts the result to a Result type, with denied becoming an error.
    pub fn into_result(self) -> Result<(), AccessDeniedReason> {
        match self {
            AccessResult::Allowed => Ok(()),
            AccessResult::Denied(reason) => Err(reason),
        }
    }
}

/// Reason why access was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessDeniedReason {
    /// No authenticated user.
    NotSignedIn,

    /// Feature requires a higher tier.
    FeatureNotIncluded {
        /// Key of the feature requested.
        feature: String,
        /// Tier required for this feature.
        required_tier: Tier,
    },

    /// View is restricted to operators.
    OperatorOnly,
}

impl AccessDeniedReason {
    /// Get a user-facing message for the denial reason.
    pub fn user_message(&self) -> String {
        match self {
            AccessDeniedReason::NotSignedIn => "Sign in to continue.".to_string(),
            AccessDeniedReason::FeatureNotIncluded {
                feature,
                required_tier,
            } => format!(
                "'{}' requires the {} plan. Upgrade to unlock it.",
                feature, required_tier
            ),
            AccessDeniedReason::OperatorOnly => "Restricted area.".to_string(),
        }
    }
}

/// Checks whether `tier` (if any user is signed in) unlocks `feature`.
pub fn check_feature(tier: Option<Tier>, feature: Feature) -> AccessResult {
    let Some(tier) = tier else {
        return AccessResult::Denied(AccessDeniedReason::NotSignedIn);
    };

    if resolve(tier).is_enabled(feature) {
        AccessResult::Allowed
    } else {
        AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded {
            feature: feature.key().to_string(),
            required_tier: Tier::Premium,
        })
    }
}

/// Checks whether `tier` may open operator-only views.
pub fn check_operator_console(tier: Option<Tier>) -> AccessResult {
    match tier {
        None => AccessResult::Denied(AccessDeniedReason::NotSignedIn),
        Some(tier) if tier.grants_operator_console() => AccessResult::Allowed,
        Some(_) => AccessResult::Denied(AccessDeniedReason::OperatorOnly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_users_are_denied_everything() {
        assert_eq!(
            check_feature(None, Feature::AiCoach),
            AccessResult::Denied(AccessDeniedReason::NotSignedIn)
        );
        assert_eq!(
            check_operator_console(None),
            AccessResult::Denied(AccessDeniedReason::NotSignedIn)
        );
    }

    #[test]
    fn free_tier_is_told_which_tier_unlocks_feature() {
        let result = check_feature(Some(Tier::Free), Feature::CloudSync);
        match result {
            AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded {
                feature,
                required_tier,
            }) => {
                assert_eq!(feature, "cloudSync");
                assert_eq!(required_tier, Tier::Premium);
            }
            other => panic!("expected FeatureNotIncluded, got {:?}", other),
        }
    }

    #[test]
    fn paid_tiers_are_allowed_features() {
        assert!(check_feature(Some(Tier::Premium), Feature::AiCoach).is_allowed());
        assert!(check_feature(Some(Tier::Admin), Feature::AdvancedAnalytics).is_allowed());
    }

    #[test]
    fn operator_console_is_admin_only() {
        assert!(check_operator_console(Some(Tier::Admin)).is_allowed());
        assert_eq!(
            check_operator_console(Some(Tier::Premium)),
            AccessResult::Denied(AccessDeniedReason::OperatorOnly)
        );
    }

    #[test]
    fn into_result_maps_denial_to_error() {
        let err = check_feature(Some(Tier::Free), Feature::AiCoach)
            .into_result()
            .unwrap_err();
        assert!(err.user_message().contains("Premium"));
    }

    #[test]
    fn denial_reason_serializes_with_type_tag() {
        let json = serde_json::to_value(AccessDeniedReason::OperatorOnly).unwrap();
        assert_eq!(json["type"], "operator_only");
    }
}

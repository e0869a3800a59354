//! Tier-based feature flags.
//!
//! Flags are a pure function of [`Tier`]. [`resolve`] is the only way to
//! obtain a [`FeatureFlags`] value, so every gate reads the same table.

use serde::Serialize;

use super::Tier;

/// A named product capability that can be gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    AiCoach,
    CloudSync,
    InfiniteHistory,
    AdvancedAnalytics,
}

impl Feature {
    /// Every gated feature.
    pub const ALL: [Feature; 4] = [
        Feature::AiCoach,
        Feature::CloudSync,
        Feature::InfiniteHistory,
        Feature::AdvancedAnalytics,
    ];

    /// Stable key used by presentation code, e.g. `"aiCoach"`.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::AiCoach => "aiCoach",
            Feature::CloudSync => "cloudSync",
            Feature::InfiniteHistory => "infiniteHistory",
            Feature::AdvancedAnalytics => "advancedAnalytics",
        }
    }

    /// Lower-case words for user-facing copy, e.g. `"ai coach"`.
    pub fn words(&self) -> &'static str {
        match self {
            Feature::AiCoach => "ai coach",
            Feature::CloudSync => "cloud sync",
            Feature::InfiniteHistory => "infinite history",
            Feature::AdvancedAnalytics => "advanced analytics",
        }
    }

    /// Looks a feature up by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Feature access derived from a tier.
///
/// Fields are private: construct through [`resolve`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    ai_coach: bool,
    cloud_sync: bool,
    infinite_history: bool,
    advanced_analytics: bool,
}

impl FeatureFlags {
    const NONE: FeatureFlags = FeatureFlags {
        ai_coach: false,
        cloud_sync: false,
        infinite_history: false,
        advanced_analytics: false,
    };

    const ALL: FeatureFlags = FeatureFlags {
        ai_coach: true,
        cloud_sync: true,
        infinite_history: true,
        advanced_analytics: true,
    };

    pub fn ai_coach(&self) -> bool {
        self.ai_coach
    }

    pub fn cloud_sync(&self) -> bool {
        self.cloud_sync
    }

    pub fn infinite_history(&self) -> bool {
        self.infinite_history
    }

    pub fn advanced_analytics(&self) -> bool {
        self.advanced_analytics
    }

    /// Returns whether a single feature is enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::AiCoach => self.ai_coach,
            Feature::CloudSync => self.cloud_sync,
            Feature::InfiniteHistory => self.infinite_history,
            Feature::AdvancedAnalytics => self.advanced_analytics,
        }
    }

    /// Returns the enabled features in declaration order.
    pub fn enabled(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

/// Resolves the feature flags for a tier.
///
/// | Tier | aiCoach | cloudSync | infiniteHistory | advancedAnalytics |
/// |------|---------|-----------|-----------------|-------------------|
/// | free | no | no | no | no |
/// | premium | yes | yes | yes | yes |
/// | admin | yes | yes | yes | yes |
///
/// Admin carries no extra product flags; operator access is a separate check
/// (see [`Tier::grants_operator_console`]).
pub fn resolve(tier: Tier) -> FeatureFlags {
    match tier {
        Tier::Free => FeatureFlags::NONE,
        Tier::Premium | Tier::Admin => FeatureFlags::ALL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn free_tier_has_every_flag_off() {
        let flags = resolve(Tier::Free);
        assert!(Feature::ALL.iter().all(|f| !flags.is_enabled(*f)));
        assert!(flags.enabled().is_empty());
    }

    #[test]
    fn premium_tier_has_every_flag_on() {
        let flags = resolve(Tier::Premium);
        assert!(flags.ai_coach());
        assert!(flags.cloud_sync());
        assert!(flags.infinite_history());
        assert!(flags.advanced_analytics());
    }

    #[test]
    fn admin_matches_premium_exactly() {
        assert_eq!(resolve(Tier::Admin), resolve(Tier::Premium));
    }

    #[test]
    fn feature_keys_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_key(feature.key()), Some(feature));
        }
        assert_eq!(Feature::from_key("teleport"), None);
    }

    #[test]
    fn flags_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(resolve(Tier::Premium)).unwrap();
        assert_eq!(json["aiCoach"], true);
        assert_eq!(json["advancedAnalytics"], true);
    }

    fn any_tier() -> impl Strategy<Value = Tier> {
        prop_oneof![Just(Tier::Free), Just(Tier::Premium), Just(Tier::Admin)]
    }

    proptest! {
        #[test]
        fn resolve_is_deterministic(tier in any_tier()) {
            prop_assert_eq!(resolve(tier), resolve(tier));
        }

        #[test]
        fn paid_tiers_enable_everything(tier in any_tier()) {
            let flags = resolve(tier);
            for feature in Feature::ALL {
                prop_assert_eq!(flags.is_enabled(feature), tier.is_paid());
            }
        }
    }
}

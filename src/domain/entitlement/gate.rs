//! Stateless feature gate.
//!
//! Presentation code wraps gated content in a [`FeatureGate`] and renders
//! whatever [`GateView`] it evaluates to. The gate only reads flags.

use super::{Feature, FeatureFlags};

/// What a gated region should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Render the gated content.
    Content,
    /// Render the caller-supplied fallback.
    Fallback,
    /// Render a lock affordance with an upgrade prompt.
    Lock { message: String },
    /// Render nothing.
    Hidden,
}

/// Gate configuration for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureGate {
    feature: Feature,
    has_fallback: bool,
    show_lock: bool,
}

impl FeatureGate {
    /// Gate that hides content when the feature is off.
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            has_fallback: false,
            show_lock: false,
        }
    }

    /// Render the caller's fallback when the feature is off.
    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    /// Render a lock prompt when the feature is off and no fallback exists.
    pub fn with_lock(mut self) -> Self {
        self.show_lock = true;
        self
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    /// Evaluates the gate against resolved flags.
    pub fn evaluate(&self, flags: &FeatureFlags) -> GateView {
        if flags.is_enabled(self.feature) {
            GateView::Content
        } else if self.has_fallback {
            GateView::Fallback
        } else if self.show_lock {
            GateView::Lock {
                message: format!("Upgrade to unlock {}.", self.feature.words()),
            }
        } else {
            GateView::Hidden
        }
    }

    /// Evaluates the gate while the tier may still be loading.
    ///
    /// Nothing is rendered until flags are known.
    pub fn evaluate_loading(&self, flags: Option<&FeatureFlags>) -> GateView {
        match flags {
            Some(flags) => self.evaluate(flags),
            None => GateView::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{resolve, Tier};

    #[test]
    fn enabled_feature_renders_content() {
        let gate = FeatureGate::new(Feature::AiCoach).with_fallback().with_lock();
        assert_eq!(gate.evaluate(&resolve(Tier::Premium)), GateView::Content);
    }

    #[test]
    fn fallback_takes_precedence_over_lock() {
        let gate = FeatureGate::new(Feature::AiCoach).with_fallback().with_lock();
        assert_eq!(gate.evaluate(&resolve(Tier::Free)), GateView::Fallback);
    }

    #[test]
    fn lock_message_names_feature() {
        let gate = FeatureGate::new(Feature::AdvancedAnalytics).with_lock();
        assert_eq!(
            gate.evaluate(&resolve(Tier::Free)),
            GateView::Lock {
                message: "Upgrade to unlock advanced analytics.".to_string()
            }
        );
    }

    #[test]
    fn bare_gate_hides_disabled_content() {
        let gate = FeatureGate::new(Feature::CloudSync);
        assert_eq!(gate.evaluate(&resolve(Tier::Free)), GateView::Hidden);
    }

    #[test]
    fn loading_renders_nothing() {
        let gate = FeatureGate::new(Feature::CloudSync).with_lock();
        assert_eq!(gate.evaluate_loading(None), GateView::Hidden);
        assert_eq!(
            gate.evaluate_loading(Some(&resolve(Tier::Admin))),
            GateView::Content
        );
    }
}

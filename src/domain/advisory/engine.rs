//! Advisory Engine - Picks one coaching suggestion from habit state.

use super::rules::{standard_rules, AdvisoryInput, AdvisoryRule, RuleId};
use super::{AdvisoryContext, Habit, Suggestion};

/// Stateless rule cascade over habits and XP.
///
/// Re-run it whenever the habit list or XP total changes; nothing is cached.
#[derive(Debug, Clone)]
pub struct AdvisoryEngine {
    rules: Vec<AdvisoryRule>,
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisoryEngine {
    /// Engine with the standard rule order.
    pub fn new() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Advises using the current local date and hour.
    pub fn advise(&self, habits: &[Habit], xp_total: u64) -> Suggestion {
        self.advise_at(habits, xp_total, AdvisoryContext::now())
    }

    /// Advises for a fixed wall-clock context.
    pub fn advise_at(&self, habits: &[Habit], xp_total: u64, context: AdvisoryContext) -> Suggestion {
        self.explain(habits, xp_total, context).1
    }

    /// Returns the winning rule alongside its suggestion.
    pub fn explain(
        &self,
        habits: &[Habit],
        xp_total: u64,
        context: AdvisoryContext,
    ) -> (RuleId, Suggestion) {
        let input = AdvisoryInput::new(habits, xp_total, context);

        self.rules
            .iter()
            .find_map(|rule| (rule.evaluate)(&input).map(|s| (rule.id, s)))
            .unwrap_or_else(|| {
                let suggestion = super::rules::fallback(&input)
                    .unwrap_or_else(|| Suggestion::insight("Just show up."));
                (RuleId::Fallback, suggestion)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advisory::SuggestionCategory;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn ctx(hour: u32) -> AdvisoryContext {
        AdvisoryContext::at(today(), hour)
    }

    #[test]
    fn empty_list_gets_onboarding_insight() {
        let engine = AdvisoryEngine::new();
        let (rule, suggestion) = engine.explain(&[], 50, ctx(8));
        assert_eq!(rule, RuleId::Onboarding);
        assert_eq!(suggestion.category, SuggestionCategory::Insight);
        assert!(suggestion.text.starts_with("Welcome!"));
    }

    #[test]
    fn three_habits_done_today_is_crushed() {
        let habits: Vec<Habit> = ["Read", "Run", "Stretch"]
            .iter()
            .enumerate()
            .map(|(i, t)| Habit::new(format!("h{i}"), *t, "x").with_completions([today()]))
            .collect();

        let suggestion = AdvisoryEngine::new().advise_at(&habits, 10, ctx(22));
        assert_eq!(suggestion.category, SuggestionCategory::Motivation);
        assert!(suggestion.text.contains("crushed"));
    }

    #[test]
    fn broken_streak_wins_over_later_rules() {
        let habits = vec![Habit::new("h1", "Floss", "health")
            .with_completions([today() - chrono::Days::new(3)])];

        // xp 10 and 8 o'clock would also match milestone and morning rules.
        let (rule, suggestion) = AdvisoryEngine::new().explain(&habits, 10, ctx(8));
        assert_eq!(rule, RuleId::BrokenStreak);
        assert_eq!(suggestion.category, SuggestionCategory::Correction);
        assert!(suggestion.text.contains("Floss"));
    }

    #[test]
    fn milestone_precedes_time_of_day() {
        let habits = vec![Habit::new("h1", "Read", "mind")];
        let (rule, _) = AdvisoryEngine::new().explain(&habits, 305, ctx(7));
        assert_eq!(rule, RuleId::NearMilestone);
    }

    #[test]
    fn morning_then_evening_then_fallback() {
        let habits = vec![Habit::new("h1", "Read", "mind")];
        let engine = AdvisoryEngine::new();
        assert_eq!(engine.explain(&habits, 50, ctx(6)).0, RuleId::MorningNudge);
        assert_eq!(engine.explain(&habits, 50, ctx(23)).0, RuleId::EveningNudge);
        assert_eq!(engine.explain(&habits, 50, ctx(14)).0, RuleId::Fallback);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let habits = vec![Habit::new("h1", "Read", "mind")];
        let engine = AdvisoryEngine::new();
        assert_eq!(
            engine.advise_at(&habits, 42, ctx(15)),
            engine.advise_at(&habits, 42, ctx(15))
        );
    }
}

//! Ordered coaching rules.
//!
//! Each rule inspects an [`AdvisoryInput`] and either produces a suggestion
//! or passes. Rules are evaluated in [`standard_rules`] order and the first
//! match wins.

use super::{AdvisoryContext, Habit, Suggestion};

/// Identifies which rule produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    Onboarding,
    AllComplete,
    BrokenStreak,
    NearMilestone,
    MorningNudge,
    EveningNudge,
    Fallback,
}

/// XP per level; the milestone nudge fires in the first fifth of a level.
pub const XP_PER_LEVEL: u64 = 100;
pub const MILESTONE_WINDOW: u64 = 20;

/// Local hour before which the morning nudge applies.
pub const MORNING_CUTOFF_HOUR: u32 = 10;
/// Local hour after which the evening nudge applies.
pub const EVENING_START_HOUR: u32 = 20;

/// Everything a rule may look at, computed once per evaluation.
#[derive(Debug, Clone)]
pub struct AdvisoryInput<'a> {
    pub habits: &'a [Habit],
    pub xp_total: u64,
    pub context: AdvisoryContext,
    /// Number of habits completed on `context.today`.
    pub completed_today: usize,
}

impl<'a> AdvisoryInput<'a> {
    pub fn new(habits: &'a [Habit], xp_total: u64, context: AdvisoryContext) -> Self {
        let completed_today = habits
            .iter()
            .filter(|h| h.completed_on(context.today))
            .count();
        Self {
            habits,
            xp_total,
            context,
            completed_today,
        }
    }
}

/// A named predicate/suggestion pair.
#[derive(Clone, Copy)]
pub struct AdvisoryRule {
    pub id: RuleId,
    pub evaluate: fn(&AdvisoryInput<'_>) -> Option<Suggestion>,
}

impl std::fmt::Debug for AdvisoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryRule").field("id", &self.id).finish()
    }
}

/// The production cascade, highest priority first.
pub fn standard_rules() -> Vec<AdvisoryRule> {
    vec![
        AdvisoryRule { id: RuleId::Onboarding, evaluate: onboarding },
        AdvisoryRule { id: RuleId::AllComplete, evaluate: all_complete },
        AdvisoryRule { id: RuleId::BrokenStreak, evaluate: broken_streak },
        AdvisoryRule { id: RuleId::NearMilestone, evaluate: near_milestone },
        AdvisoryRule { id: RuleId::MorningNudge, evaluate: morning_nudge },
        AdvisoryRule { id: RuleId::EveningNudge, evaluate: evening_nudge },
        AdvisoryRule { id: RuleId::Fallback, evaluate: fallback },
    ]
}

pub fn onboarding(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    input.habits.is_empty().then(|| {
        Suggestion::insight(
            "Welcome! Start by adding a small habit you can do today. Maybe 'Drink Water'?",
        )
    })
}

pub fn all_complete(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    let total = input.habits.len();
    (total > 0 && input.completed_today == total)
        .then(|| Suggestion::motivation("All habits crushed today! You're unstoppable. 🚀"))
}

pub fn broken_streak(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    let today = input.context.today;
    let yesterday = input.context.yesterday();

    input
        .habits
        .iter()
        .find(|h| {
            h.streak == 0
                && h.has_history()
                && !h.completed_on(today)
                && !yesterday.is_some_and(|y| h.completed_on(y))
        })
        .map(|h| {
            Suggestion::correction(format!(
                "Don't let {} fade away! One checkmark today can restart your momentum.",
                h.title
            ))
        })
}

pub fn near_milestone(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    (input.xp_total > 0 && input.xp_total % XP_PER_LEVEL < MILESTONE_WINDOW).then(|| {
        Suggestion::motivation(
            "You're close to the next big milestone! Keep going for that next Level.",
        )
    })
}

pub fn morning_nudge(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    (input.context.hour < MORNING_CUTOFF_HOUR && input.completed_today == 0).then(|| {
        Suggestion::insight(
            "Good morning! Tackling the hardest habit first creates a productivity snowball.",
        )
    })
}

pub fn evening_nudge(input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    (input.context.hour > EVENING_START_HOUR && input.completed_today < input.habits.len()).then(
        || {
            Suggestion::motivation(
                "It's late, but not too late. Just 5 minutes on a remaining habit keeps the streak alive.",
            )
        },
    )
}

pub fn fallback(_input: &AdvisoryInput<'_>) -> Option<Suggestion> {
    Some(Suggestion::insight(
        "Consistency eats intensity for breakfast. Just show up.",
    ))
}

//! Advisory domain module.
//!
//! Derives a single coaching suggestion from habit and XP state using an
//! ordered rule cascade. Pure: no I/O, no persisted state.

mod engine;
mod habit;
pub mod rules;
mod suggestion;

pub use engine::AdvisoryEngine;
pub use habit::{Habit, HabitDifficulty};
pub use rules::{AdvisoryRule, RuleId};
pub use suggestion::{AdvisoryContext, Suggestion, SuggestionCategory};

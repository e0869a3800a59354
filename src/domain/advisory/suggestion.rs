//! Advisory output types.

use chrono::{Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// Tone of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Motivation,
    Correction,
    Insight,
}

/// A single human-readable coaching suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub category: SuggestionCategory,
}

impl Suggestion {
    pub fn motivation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: SuggestionCategory::Motivation,
        }
    }

    pub fn correction(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: SuggestionCategory::Correction,
        }
    }

    pub fn insight(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: SuggestionCategory::Insight,
        }
    }
}

/// Wall-clock inputs for an evaluation, in the evaluator's local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryContext {
    pub today: NaiveDate,
    /// Hour of day, 0-23.
    pub hour: u32,
}

impl AdvisoryContext {
    /// Context for the current local date and hour.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            today: now.date_naive(),
            hour: now.hour(),
        }
    }

    /// Context for a fixed date and hour.
    pub fn at(today: NaiveDate, hour: u32) -> Self {
        Self { today, hour }
    }

    /// The day before `today`, if representable.
    pub fn yesterday(&self) -> Option<NaiveDate> {
        self.today.pred_opt()
    }
}

//! Read-only view of the habits owned by the habit-management collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How demanding a habit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Days the habit was completed, serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    /// Current streak in days.
    #[serde(default)]
    pub streak: u32,
    /// Target completions per week.
    #[serde(default)]
    pub goal: u32,
    #[serde(default)]
    pub difficulty: HabitDifficulty,
    #[serde(default)]
    pub archived: bool,
}

impl Habit {
    /// Creates a habit with no history.
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            emoji: None,
            completed_dates: Vec::new(),
            streak: 0,
            goal: 7,
            difficulty: HabitDifficulty::default(),
            archived: false,
        }
    }

    pub fn with_completions(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.completed_dates.extend(dates);
        self
    }

    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    /// Returns true if the habit was completed on `date`.
    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Returns true if the habit was ever completed.
    pub fn has_history(&self) -> bool {
        !self.completed_dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn new_habit_has_no_history() {
        let habit = Habit::new("h1", "Drink Water", "health");
        assert!(!habit.has_history());
        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn completed_on_checks_exact_day() {
        let habit = Habit::new("h1", "Read", "mind").with_completions([day(1), day(3)]);
        assert!(habit.completed_on(day(3)));
        assert!(!habit.completed_on(day(2)));
    }

    #[test]
    fn deserializes_iso_dates() {
        let json = r#"{
            "id": "h1",
            "title": "Stretch",
            "category": "fitness",
            "completedDates": ["2024-03-01", "2024-03-02"],
            "streak": 2,
            "goal": 5,
            "difficulty": "hard",
            "archived": false
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.completed_dates, vec![day(1), day(2)]);
        assert_eq!(habit.difficulty, HabitDifficulty::Hard);
    }
}

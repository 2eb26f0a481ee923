//! Free-text search over workout names and descriptions.

use crate::error::Result;
use crate::traits::Filter;
use catalog::Workout;

/// Keeps workouts whose name or description contains the search text.
///
/// Matching is case-insensitive and unanchored.
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    /// Returns `None` when the text is blank, which means no restriction.
    pub fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            needle: text.to_lowercase(),
        })
    }

    fn matches(&self, workout: &Workout) -> bool {
        workout.name.to_lowercase().contains(&self.needle)
            || workout.description.to_lowercase().contains(&self.needle)
    }
}

impl Filter for SearchFilter {
    fn name(&self) -> &str {
        "SearchFilter"
    }

    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        Ok(workouts.into_iter().filter(|w| self.matches(w)).collect())
    }
}

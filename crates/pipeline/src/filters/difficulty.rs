//! Exact difficulty match.

use crate::error::Result;
use crate::traits::Filter;
use catalog::{Difficulty, Workout};

pub struct DifficultyFilter {
    difficulty: Difficulty,
}

impl DifficultyFilter {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }
}

impl Filter for DifficultyFilter {
    fn name(&self) -> &str {
        "DifficultyFilter"
    }

    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        Ok(workouts
            .into_iter()
            .filter(|w| w.difficulty == self.difficulty)
            .collect())
    }
}

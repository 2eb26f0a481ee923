//! Filter on targeted muscle groups.

use crate::error::Result;
use crate::traits::Filter;
use catalog::Workout;

/// Keeps workouts targeting at least one of the requested muscle groups.
pub struct MuscleGroupFilter {
    muscle_groups: Vec<String>,
}

impl MuscleGroupFilter {
    /// Returns `None` for an empty list, which means no restriction.
    pub fn new(muscle_groups: &[String]) -> Option<Self> {
        if muscle_groups.is_empty() {
            return None;
        }
        Some(Self {
            muscle_groups: muscle_groups.to_vec(),
        })
    }
}

impl Filter for MuscleGroupFilter {
    fn name(&self) -> &str {
        "MuscleGroupFilter"
    }

    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        Ok(workouts
            .into_iter()
            .filter(|w| w.muscle_groups.iter().any(|m| self.muscle_groups.contains(m)))
            .collect())
    }
}

//! Inclusive duration bounds.

use crate::error::{PipelineError, Result};
use crate::traits::Filter;
use catalog::Workout;

/// Keeps workouts whose duration lies within `[min, max]`.
/// Either bound may be absent.
pub struct DurationFilter {
    min: Option<u32>,
    max: Option<u32>,
}

impl DurationFilter {
    /// Fails when both bounds are present and `min > max`
    pub fn new(min: Option<u32>, max: Option<u32>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(PipelineError::InvalidFilter(format!(
                    "minDuration ({lo}) is greater than maxDuration ({hi})"
                )));
            }
        }
        Ok(Self { min, max })
    }

    fn contains(&self, minutes: u32) -> bool {
        self.min.is_none_or(|lo| minutes >= lo) && self.max.is_none_or(|hi| minutes <= hi)
    }
}

impl Filter for DurationFilter {
    fn name(&self) -> &str {
        "DurationFilter"
    }

    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        Ok(workouts
            .into_iter()
            .filter(|w| self.contains(w.duration))
            .collect())
    }
}

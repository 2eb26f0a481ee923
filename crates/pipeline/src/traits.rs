//! Core traits for the recommendation pipeline.
//!
//! `Filter` narrows a workout list; `Scorer` turns a candidate pool into
//! ranked, scored candidates.

use async_trait::async_trait;
use catalog::Workout;

use crate::error::{Result, ScoringError};
use crate::types::{RecommendationRequest, ScoredCandidate};

/// Core trait for filtering workouts.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Workout> and return a filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of workouts.
    ///
    /// Filters only remove entries; they never reorder or add.
    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>>;
}

/// A scoring strategy.
///
/// Implementations return candidates already thresholded, sorted by score
/// descending and truncated to `request.max_recommendations`.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    async fn score(
        &self,
        request: &RecommendationRequest,
    ) -> std::result::Result<Vec<ScoredCandidate>, ScoringError>;
}

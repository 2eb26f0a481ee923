//! Inputs and outputs shared by the scoring strategies.

use catalog::{Preferences, UserId, Workout, WorkoutId};
use serde::{Deserialize, Serialize};

/// Default number of recommendations per cycle
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

/// Everything a scorer needs for one recommendation cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub workouts: Vec<Workout>,
    /// `None` for anonymous requests
    pub user_id: Option<UserId>,
    pub preferences: Option<Preferences>,
    pub max_recommendations: usize,
}

impl RecommendationRequest {
    pub fn new(workouts: Vec<Workout>, preferences: Option<Preferences>) -> Self {
        Self {
            workouts,
            user_id: None,
            preferences,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_max(mut self, max_recommendations: usize) -> Self {
        self.max_recommendations = max_recommendations;
        self
    }
}

/// A workout with its score (0 - 100) and a human readable justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub workout_id: WorkoutId,
    pub score: f64,
    pub reasoning: String,
}

impl ScoredCandidate {
    pub fn new(workout_id: impl Into<WorkoutId>, score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            workout_id: workout_id.into(),
            score,
            reasoning: reasoning.into(),
        }
    }

    /// Score mapped onto a 0.0 - 1.0 confidence
    pub fn confidence(&self) -> f64 {
        self.score / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_anonymous() {
        let request = RecommendationRequest::new(vec![], None);
        assert_eq!(request.user_id, None);
        assert_eq!(request.max_recommendations, DEFAULT_MAX_RECOMMENDATIONS);

        let request = request.with_user("user-1").with_max(3);
        assert_eq!(request.user_id.as_deref(), Some("user-1"));
        assert_eq!(request.max_recommendations, 3);
    }
}

//! Rule-based workout scoring.
//!
//! ## Algorithm
//! Start from `BASE_SCORE`, then add:
//! 1. `DIFFICULTY_BONUS` when the workout difficulty equals the preferred one
//! 2. `DURATION_BONUS` when the workout is within `DURATION_TOLERANCE_MINUTES`
//!    of the preferred length
//! 3. `MUSCLE_GROUP_BONUS` for each distinct workout muscle group that also
//!    appears in the preferred list
//!
//! and clamp the total to `MAX_SCORE`. Without preferences every workout
//! scores `BASE_SCORE`, which is below the recommendation threshold.

use async_trait::async_trait;
use catalog::{Preferences, Workout};
use rayon::prelude::*;
use tracing::debug;

use crate::error::ScoringError;
use crate::ranking::rank;
use crate::traits::Scorer;
use crate::types::{RecommendationRequest, ScoredCandidate};

pub const BASE_SCORE: f64 = 50.0;
pub const DIFFICULTY_BONUS: f64 = 20.0;
pub const DURATION_BONUS: f64 = 15.0;
pub const DURATION_TOLERANCE_MINUTES: u32 = 10;
pub const MUSCLE_GROUP_BONUS: f64 = 10.0;
pub const MAX_SCORE: f64 = 100.0;

/// Score one workout against optional preferences. Pure and deterministic.
pub fn heuristic_score(workout: &Workout, preferences: Option<&Preferences>) -> ScoredCandidate {
    let mut score = BASE_SCORE;
    let mut reasoning = String::from("Basic recommendation");

    if let Some(prefs) = preferences {
        if prefs.difficulty == Some(workout.difficulty) {
            score += DIFFICULTY_BONUS;
            reasoning.push_str(&format!(" - matches {} difficulty level", workout.difficulty));
        }

        if let Some(preferred) = prefs.duration {
            if workout.duration.abs_diff(preferred) <= DURATION_TOLERANCE_MINUTES {
                score += DURATION_BONUS;
                reasoning.push_str(&format!(" - duration close to preferred {preferred} minutes"));
            }
        }

        if let Some(preferred_groups) = &prefs.muscle_groups {
            let mut matching: Vec<&str> = Vec::new();
            for group in &workout.muscle_groups {
                if preferred_groups.contains(group) && !matching.contains(&group.as_str()) {
                    matching.push(group);
                }
            }
            if !matching.is_empty() {
                score += MUSCLE_GROUP_BONUS * matching.len() as f64;
                reasoning.push_str(&format!(
                    " - targets preferred muscle groups: {}",
                    matching.join(", ")
                ));
            }
        }
    }

    ScoredCandidate {
        workout_id: workout.id.clone(),
        score: score.min(MAX_SCORE),
        reasoning,
    }
}

/// Score every workout, in input order. Large pools are scored in parallel.
pub fn score_all(workouts: &[Workout], preferences: Option<&Preferences>) -> Vec<ScoredCandidate> {
    workouts
        .par_iter()
        .map(|workout| heuristic_score(workout, preferences))
        .collect()
}

/// `Scorer` backed by the rules above. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous form of `Scorer::score`
    pub fn recommend(&self, request: &RecommendationRequest) -> Vec<ScoredCandidate> {
        let scored = score_all(&request.workouts, request.preferences.as_ref());
        let ranked = rank(scored, request.max_recommendations);
        debug!(
            "Heuristic scoring kept {} of {} workouts",
            ranked.len(),
            request.workouts.len()
        );
        ranked
    }
}

#[async_trait]
impl Scorer for HeuristicScorer {
    fn name(&self) -> &str {
        "HeuristicScorer"
    }

    async fn score(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<ScoredCandidate>, ScoringError> {
        Ok(self.recommend(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::workout;
    use catalog::Difficulty;

    fn beginner_core_prefs() -> Preferences {
        Preferences {
            difficulty: Some(Difficulty::Beginner),
            duration: Some(25),
            muscle_groups: Some(vec!["core".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_match_scores_95() {
        let w1 = workout("w1", "Core Blast", Difficulty::Beginner, 20, &["core"], &[]);
        let scored = heuristic_score(&w1, Some(&beginner_core_prefs()));

        assert_eq!(scored.score, 95.0);
        assert_eq!(
            scored.reasoning,
            "Basic recommendation - matches beginner difficulty level \
             - duration close to preferred 25 minutes \
             - targets preferred muscle groups: core"
        );
    }

    #[test]
    fn test_no_match_scores_base() {
        let w2 = workout("w2", "Leg Day", Difficulty::Advanced, 60, &["legs"], &["barbell"]);
        let scored = heuristic_score(&w2, Some(&beginner_core_prefs()));

        assert_eq!(scored.score, BASE_SCORE);
        assert_eq!(scored.reasoning, "Basic recommendation");
    }

    #[test]
    fn test_without_preferences_scores_base() {
        let w1 = workout("w1", "Core Blast", Difficulty::Beginner, 20, &["core"], &[]);
        assert_eq!(heuristic_score(&w1, None).score, BASE_SCORE);
    }

    #[test]
    fn test_score_is_clamped() {
        let groups = ["core", "legs", "arms", "back", "chest", "glutes"];
        let w = workout("w", "Everything", Difficulty::Beginner, 25, &groups, &[]);
        let prefs = Preferences {
            difficulty: Some(Difficulty::Beginner),
            duration: Some(25),
            muscle_groups: Some(groups.iter().map(|g| g.to_string()).collect()),
            ..Default::default()
        };

        assert_eq!(heuristic_score(&w, Some(&prefs)).score, MAX_SCORE);
    }

    #[test]
    fn test_duplicate_muscle_groups_count_once() {
        let w = workout("w", "Double Core", Difficulty::Advanced, 90, &["core", "core"], &[]);
        let prefs = Preferences {
            muscle_groups: Some(vec!["core".to_string()]),
            ..Default::default()
        };

        let scored = heuristic_score(&w, Some(&prefs));
        assert_eq!(scored.score, BASE_SCORE + MUSCLE_GROUP_BONUS);
        assert!(scored.reasoning.ends_with("muscle groups: core"));
    }

    #[test]
    fn test_duration_band_edges() {
        let prefs = Preferences {
            duration: Some(30),
            ..Default::default()
        };
        let at_edge = workout("a", "A", Difficulty::Beginner, 40, &[], &[]);
        let past_edge = workout("b", "B", Difficulty::Beginner, 41, &[], &[]);
        let below = workout("c", "C", Difficulty::Beginner, 20, &[], &[]);

        assert_eq!(heuristic_score(&at_edge, Some(&prefs)).score, 65.0);
        assert_eq!(heuristic_score(&past_edge, Some(&prefs)).score, 50.0);
        assert_eq!(heuristic_score(&below, Some(&prefs)).score, 65.0);
    }

    #[test]
    fn test_recommend_keeps_only_candidates_above_threshold() {
        let workouts = vec![
            workout("w1", "Core Blast", Difficulty::Beginner, 20, &["core"], &[]),
            workout("w2", "Leg Day", Difficulty::Advanced, 60, &["legs"], &["barbell"]),
        ];
        let request = RecommendationRequest::new(workouts, Some(beginner_core_prefs()));

        let ranked = HeuristicScorer::new().recommend(&request);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].workout_id, "w1");
    }

    #[tokio::test]
    async fn test_scorer_trait_never_fails() {
        let request = RecommendationRequest::new(vec![], None);
        let scored = HeuristicScorer::new().score(&request).await.unwrap();
        assert!(scored.is_empty());
    }
}

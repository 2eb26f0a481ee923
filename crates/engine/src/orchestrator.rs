//! # Recommendation Orchestrator
//!
//! This module runs one recommendation cycle end to end:
//! 1. Load every workout as the candidate pool
//! 2. Load the user's preferences, if a user was given
//! 3. Score with the primary (AI) scorer under a timeout
//! 4. On failure or an empty result, try the optional secondary scorer
//! 5. Otherwise fall back to the whole catalog
//! 6. Persist the result for the user and return it
//!
//! Scoring never fails a cycle. Persistence never fails a cycle either; a
//! failed write is logged and reported in the returned `RecommendationCycle`.
//!
//! It also exposes the read/update surface the rest of the application
//! needs (listing, users, preferences, history).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use catalog::{
    Preferences, RecommendationOrigin, Recommendation, RecordStore, StoredRecommendation, User,
    Workout, WorkoutFilter,
};
use pipeline::heuristic::score_all;
use pipeline::{
    FilterPipeline, HeuristicScorer, RecommendationRequest, ScoredCandidate, Scorer, ScoringError,
};

use crate::config::EngineConfig;
use crate::cycle::{CyclePath, PersistOutcome, RecommendationCycle};
use crate::error::Result;

/// Main orchestrator that coordinates the recommendation cycle
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    store: Arc<dyn RecordStore>,
    primary: Arc<dyn Scorer>,
    secondary: Option<Arc<dyn Scorer>>,
    config: EngineConfig,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator.
    ///
    /// With `config.heuristic_fallback` the built-in `HeuristicScorer` is
    /// installed as the secondary scorer.
    pub fn new(store: Arc<dyn RecordStore>, primary: Arc<dyn Scorer>, config: EngineConfig) -> Self {
        let secondary = config
            .heuristic_fallback
            .then(|| Arc::new(HeuristicScorer::new()) as Arc<dyn Scorer>);
        Self {
            store,
            primary,
            secondary,
            config,
        }
    }

    /// Replace the secondary scorer tried when the primary one fails
    pub fn with_secondary(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.secondary = Some(scorer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Main entry point: run one recommendation cycle.
    ///
    /// Only candidate loading can fail. Every other problem degrades to a
    /// fallback path or to `PersistOutcome::Skipped`.
    pub async fn get_recommendations(&self, user_id: Option<&str>) -> Result<RecommendationCycle> {
        let start_time = Instant::now();
        let owner = user_id.unwrap_or(catalog::ANONYMOUS_USER);

        let workouts = self.store.workouts().await?;
        let preferences = self.load_preferences(user_id).await?;
        info!(
            "Loaded {} candidate workouts for user {} (preferences: {})",
            workouts.len(),
            owner,
            preferences.is_some()
        );

        let mut request = RecommendationRequest::new(workouts, preferences)
            .with_max(self.config.max_recommendations);
        if let Some(id) = user_id {
            request = request.with_user(id);
        }

        let (recommendations, path) = self.score_with_fallback(&request, user_id).await;
        info!(
            "Selected {} recommendations for user {} via {:?}",
            recommendations.len(),
            owner,
            path
        );

        let persistence = self.persist(user_id, &recommendations).await;

        info!(
            "Total time to get recommendations for user {}: {:.2?}",
            owner,
            start_time.elapsed()
        );
        Ok(RecommendationCycle {
            recommendations,
            path,
            persistence,
        })
    }

    /// Missing users and users without preferences both yield `None`
    async fn load_preferences(&self, user_id: Option<&str>) -> Result<Option<Preferences>> {
        let Some(id) = user_id else {
            return Ok(None);
        };
        match self.store.user(id).await? {
            Some(user) if !user.preferences.is_empty() => Ok(Some(user.preferences)),
            Some(_) => Ok(None),
            None => {
                debug!("User {} not found; scoring without preferences", id);
                Ok(None)
            }
        }
    }

    /// Primary, then secondary, then the full catalog. Always produces a result.
    async fn score_with_fallback(
        &self,
        request: &RecommendationRequest,
        user_id: Option<&str>,
    ) -> (Vec<Recommendation>, CyclePath) {
        let primary = self
            .score_with(self.primary.as_ref(), request, RecommendationOrigin::Ai, user_id)
            .await;
        if let Some(recommendations) = primary {
            return (recommendations, CyclePath::AiScored);
        }

        if let Some(secondary) = &self.secondary {
            let scored = self
                .score_with(
                    secondary.as_ref(),
                    request,
                    RecommendationOrigin::Heuristic,
                    user_id,
                )
                .await;
            if let Some(recommendations) = scored {
                return (recommendations, CyclePath::HeuristicScored);
            }
        }

        warn!(
            "Falling back to the full catalog ({} workouts)",
            request.workouts.len()
        );
        (
            catalog_fallback(request, user_id),
            CyclePath::CatalogFallback,
        )
    }

    /// Run one scorer under the configured timeout. `None` means the caller
    /// should move on to the next strategy.
    async fn score_with(
        &self,
        scorer: &dyn Scorer,
        request: &RecommendationRequest,
        origin: RecommendationOrigin,
        user_id: Option<&str>,
    ) -> Option<Vec<Recommendation>> {
        let timeout = self.config.scoring_timeout;
        let result = match tokio::time::timeout(timeout, scorer.score(request)).await {
            Ok(result) => result,
            Err(_) => Err(ScoringError::Timeout(timeout)),
        };

        match result {
            Ok(scored) => {
                let recommendations = materialize(scored, &request.workouts, origin, user_id);
                if recommendations.is_empty() {
                    warn!("{} returned no usable recommendations", scorer.name());
                    None
                } else {
                    Some(recommendations)
                }
            }
            Err(err) => {
                warn!("{} failed: {}", scorer.name(), err);
                None
            }
        }
    }

    /// Write the cycle's recommendations for `user_id`. Never fails the cycle.
    async fn persist(
        &self,
        user_id: Option<&str>,
        recommendations: &[Recommendation],
    ) -> PersistOutcome {
        match self.store.store_recommendations(user_id, recommendations).await {
            Ok(report) => {
                if report.skipped() > 0 {
                    debug!(
                        "Persisted {} recommendations, skipped {}",
                        report.written,
                        report.skipped()
                    );
                }
                PersistOutcome::Persisted(report)
            }
            Err(err) => {
                error!(
                    "Failed to persist {} recommendations in {}: {}",
                    recommendations.len(),
                    self.store.name(),
                    err
                );
                PersistOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Workouts matching `filter`, sorted by name then id
    pub async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>> {
        let pipeline = FilterPipeline::compile(filter)?;
        let workouts = self.store.workouts().await?;
        Ok(pipeline.apply(workouts)?)
    }

    pub async fn user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.store.user(user_id).await?)
    }

    /// Replace a user's preferences. Returns `None` for an unknown user.
    pub async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>> {
        let updated = self.store.update_preferences(user_id, preferences).await?;
        if updated.is_some() {
            info!("Updated preferences for user {}", user_id);
        }
        Ok(updated)
    }

    /// Stored recommendations for a user, highest confidence first
    pub async fn recommendation_history(&self, user_id: &str) -> Result<Vec<StoredRecommendation>> {
        Ok(self.store.recommendations_for(user_id).await?)
    }
}

/// Turn scored candidates into recommendations.
///
/// Candidates naming a workout outside the pool are dropped; repeated
/// workout ids keep the first (highest ranked) entry.
fn materialize(
    scored: Vec<ScoredCandidate>,
    pool: &[Workout],
    origin: RecommendationOrigin,
    user_id: Option<&str>,
) -> Vec<Recommendation> {
    let by_id: HashMap<&str, &Workout> = pool.iter().map(|w| (w.id.as_str(), w)).collect();
    let mut seen = HashSet::new();
    let now = Utc::now();

    scored
        .into_iter()
        .filter_map(|candidate| {
            let Some(workout) = by_id.get(candidate.workout_id.as_str()) else {
                warn!(
                    "Dropping recommendation for unknown workout {}",
                    candidate.workout_id
                );
                return None;
            };
            if !seen.insert(candidate.workout_id.clone()) {
                debug!("Dropping duplicate recommendation for {}", candidate.workout_id);
                return None;
            }
            Some(Recommendation {
                id: origin.recommendation_id(&workout.id, user_id),
                user_id: user_id.map(str::to_string),
                workout: (*workout).clone(),
                confidence: candidate.confidence(),
                reasoning: Some(candidate.reasoning),
                ai_generated: origin == RecommendationOrigin::Ai,
                created_at: now,
            })
        })
        .collect()
}

/// Every pool workout once, with confidence 1.0, ordered by heuristic score
/// descending then name then id.
fn catalog_fallback(request: &RecommendationRequest, user_id: Option<&str>) -> Vec<Recommendation> {
    let scores = score_all(&request.workouts, request.preferences.as_ref());
    let mut ranked: Vec<(&Workout, f64)> = request
        .workouts
        .iter()
        .zip(scores.iter().map(|s| s.score))
        .collect();
    ranked.sort_by(|(a, a_score), (b, b_score)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let now = Utc::now();
    ranked
        .into_iter()
        .map(|(workout, _)| Recommendation {
            id: RecommendationOrigin::Fallback.recommendation_id(&workout.id, user_id),
            user_id: user_id.map(str::to_string),
            workout: workout.clone(),
            confidence: 1.0,
            reasoning: None,
            ai_generated: false,
            created_at: now,
        })
        .collect()
}

//! `Scorer` backed by a reasoning service.

use std::time::Instant;

use async_trait::async_trait;
use pipeline::{RecommendationRequest, ScoredCandidate, Scorer, ScoringError};
use tracing::{info, warn};

use crate::prompt::build_prompt;
use crate::response::parse_scored_candidates;
use crate::service::ReasoningService;

/// Scores workouts by asking a language model.
///
/// Every failure (transport, status, empty or malformed reply) surfaces as a
/// `ScoringError`; nothing is partially accepted.
pub struct AiScorer<S> {
    service: S,
}

impl<S: ReasoningService> AiScorer<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

#[async_trait]
impl<S: ReasoningService> Scorer for AiScorer<S> {
    fn name(&self) -> &str {
        "AiScorer"
    }

    async fn score(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<ScoredCandidate>, ScoringError> {
        if request.workouts.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let prompt = build_prompt(request)?;
        let reply = self.service.complete(&prompt).await.inspect_err(|e| {
            warn!("{} call failed: {}", self.service.name(), e);
        })?;
        let candidates = parse_scored_candidates(&reply, request.max_recommendations)
            .inspect_err(|e| warn!("Rejected reply from {}: {}", self.service.name(), e))?;

        info!(
            "{} scored {} of {} workouts in {:?}",
            self.service.name(),
            candidates.len(),
            request.workouts.len(),
            start_time.elapsed()
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiClientError;
    use crate::service::Prompt;
    use catalog::{Difficulty, Workout};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed reply and counts calls
    struct CannedService {
        reply: Result<String, fn() -> AiClientError>,
        calls: AtomicUsize,
    }

    impl CannedService {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: fn() -> AiClientError) -> Self {
            Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReasoningService for CannedService {
        fn name(&self) -> &str {
            "CannedService"
        }

        async fn complete(&self, _prompt: &Prompt) -> crate::error::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(make_err) => Err(make_err()),
            }
        }
    }

    fn workouts() -> Vec<Workout> {
        vec![Workout {
            id: "w1".to_string(),
            name: "Core Blast".to_string(),
            description: "Planks".to_string(),
            difficulty: Difficulty::Beginner,
            duration: 20,
            muscle_groups: vec!["core".to_string()],
            equipment: vec![],
            instructions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }]
    }

    #[tokio::test]
    async fn test_scores_from_reply() {
        let scorer = AiScorer::new(CannedService::replying(
            r#"{"workouts":[{"workoutId":"w1","score":72,"reasoning":"good fit"}]}"#,
        ));
        let scored = scorer
            .score(&RecommendationRequest::new(workouts(), None))
            .await
            .unwrap();

        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 72.0);
        assert_eq!(scored[0].reasoning, "good fit");
    }

    #[tokio::test]
    async fn test_empty_pool_skips_service() {
        let scorer = AiScorer::new(CannedService::replying("[]"));
        let scored = scorer
            .score(&RecommendationRequest::new(vec![], None))
            .await
            .unwrap();

        assert!(scored.is_empty());
        assert_eq!(scorer.service().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_service_errors_become_scoring_errors() {
        let request = RecommendationRequest::new(workouts(), None);

        let scorer = AiScorer::new(CannedService::failing(|| AiClientError::EmptyResponse));
        assert_eq!(scorer.score(&request).await, Err(ScoringError::EmptyResponse));

        let scorer = AiScorer::new(CannedService::failing(|| {
            AiClientError::Connection("refused".to_string())
        }));
        assert!(matches!(
            scorer.score(&request).await,
            Err(ScoringError::Upstream(_))
        ));

        let scorer = AiScorer::new(CannedService::replying("I think Core Blast is nice"));
        assert!(matches!(
            scorer.score(&request).await,
            Err(ScoringError::Malformed(_))
        ));
    }
}

use std::time::Duration;

use pipeline::DEFAULT_MAX_RECOMMENDATIONS;

pub const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 30;

/// Tunables for a `RecommendationOrchestrator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on scored recommendations per cycle
    pub max_recommendations: usize,
    /// Applied to each scorer call
    pub scoring_timeout: Duration,
    /// Try the heuristic scorer before the full-catalog fallback
    pub heuristic_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            scoring_timeout: Duration::from_secs(DEFAULT_SCORING_TIMEOUT_SECS),
            heuristic_fallback: false,
        }
    }
}

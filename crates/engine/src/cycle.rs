//! Outcome of one recommendation cycle.

use catalog::{PersistReport, Recommendation};
use serde::Serialize;

/// Which strategy produced the recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CyclePath {
    AiScored,
    HeuristicScored,
    /// Every catalog workout, unscored
    CatalogFallback,
}

/// Whether the recommendations were written to the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistOutcome {
    Persisted(PersistReport),
    Skipped { reason: String },
}

impl PersistOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCycle {
    pub recommendations: Vec<Recommendation>,
    pub path: CyclePath,
    pub persistence: PersistOutcome,
}

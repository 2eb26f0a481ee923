//! Threshold, order and cap a list of scored candidates.

use crate::types::ScoredCandidate;

/// Minimum score for a candidate to be recommended
pub const RECOMMENDATION_THRESHOLD: f64 = 60.0;

/// Drop candidates below the threshold, sort by score descending and keep at
/// most `max`. The sort is stable, so equal scores keep their input order.
pub fn rank(candidates: Vec<ScoredCandidate>, max: usize) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|c| c.score >= RECOMMENDATION_THRESHOLD)
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(max);
    ranked
}

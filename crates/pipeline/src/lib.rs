//! Pipeline for filtering and scoring workout candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing the workout catalog
//! - FilterPipeline for compiling a `WorkoutFilter` into a filter chain
//! - Scorer trait shared by every scoring strategy
//! - HeuristicScorer, the deterministic rule-based strategy
//!
//! ## Architecture
//! Listing and recommending use separate paths:
//! 1. Listing: `WorkoutFilter` -> `FilterPipeline` -> workouts sorted by name
//! 2. Recommending: `RecommendationRequest` -> `Scorer` -> ranked `ScoredCandidate`s
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, HeuristicScorer, RecommendationRequest};
//!
//! let listed = FilterPipeline::compile(&filter)?.apply(workouts.clone())?;
//!
//! let request = RecommendationRequest::new(workouts, user.map(|u| u.preferences));
//! let ranked = HeuristicScorer::new().recommend(&request);
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod heuristic;
pub mod ranking;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{PipelineError, ScoringError};
pub use filter_pipeline::FilterPipeline;
pub use heuristic::{heuristic_score, HeuristicScorer};
pub use ranking::{rank, RECOMMENDATION_THRESHOLD};
pub use traits::{Filter, Scorer};
pub use types::{RecommendationRequest, ScoredCandidate, DEFAULT_MAX_RECOMMENDATIONS};

//! AI scoring client for workout recommendations.
//!
//! This crate lets a language model act as a `pipeline::Scorer`. It handles:
//! - Talking to an OpenAI-compatible `chat/completions` endpoint
//! - Building the scoring prompt from a `RecommendationRequest`
//! - Validating the untrusted reply into `ScoredCandidate`s
//!
//! ## Example Usage
//! ```ignore
//! use ai_client::{AiScorer, OpenAiReasoningService};
//! use std::sync::Arc;
//!
//! let service = OpenAiReasoningService::from_env()?;
//! let scorer: Arc<dyn pipeline::Scorer> = Arc::new(AiScorer::new(service));
//! ```

pub mod error;
pub mod prompt;
pub mod response;
pub mod scorer;
pub mod service;

pub use error::AiClientError;
pub use prompt::build_prompt;
pub use response::parse_scored_candidates;
pub use scorer::AiScorer;
pub use service::{OpenAiConfig, OpenAiReasoningService, Prompt, ReasoningService};

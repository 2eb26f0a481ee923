//! Engine crate for the workout recommendation service.
//!
//! This crate contains the orchestrator that coordinates the record store,
//! the scoring strategies and the fallback path.

pub mod config;
pub mod cycle;
pub mod error;
pub mod orchestrator;

pub use config::EngineConfig;
pub use cycle::{CyclePath, PersistOutcome, RecommendationCycle};
pub use error::EngineError;
pub use orchestrator::RecommendationOrchestrator;

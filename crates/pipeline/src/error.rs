use std::time::Duration;

use thiserror::Error;

/// Errors raised while compiling or applying a workout filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

/// Failure of a scoring strategy. Callers treat every variant as
/// "no usable scores" and move on to the next strategy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("upstream scoring failure: {0}")]
    Upstream(String),

    #[error("malformed scoring response: {0}")]
    Malformed(String),

    #[error("scoring service returned an empty response")]
    EmptyResponse,

    #[error("scoring timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

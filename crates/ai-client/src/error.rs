use pipeline::ScoringError;
use thiserror::Error;

/// Errors that can occur when talking to the reasoning service
#[derive(Error, Debug)]
pub enum AiClientError {
    #[error("Invalid reasoning service configuration: {0}")]
    Config(String),

    #[error("Failed to connect to reasoning service: {0}")]
    Connection(String),

    #[error("Reasoning service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from reasoning service: {0}")]
    InvalidResponse(String),

    #[error("Reasoning service returned no content")]
    EmptyResponse,

    #[error("Malformed recommendation payload: {0}")]
    MalformedPayload(String),
}

impl From<AiClientError> for ScoringError {
    fn from(err: AiClientError) -> Self {
        match err {
            AiClientError::EmptyResponse => ScoringError::EmptyResponse,
            AiClientError::InvalidResponse(msg) | AiClientError::MalformedPayload(msg) => {
                ScoringError::Malformed(msg)
            }
            other => ScoringError::Upstream(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AiClientError>;

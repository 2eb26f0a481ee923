use catalog::CatalogError;
use pipeline::PipelineError;
use thiserror::Error;

/// Errors surfaced to callers of the orchestrator.
///
/// Scoring failures never appear here; they are absorbed by the fallback
/// path.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("record store error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

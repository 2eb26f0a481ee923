//! Error types for the catalog crate.
//!
//! Two kinds of failure live here:
//! - `CatalogError` is a hard failure of the record store (I/O, SQL, bad data)
//! - `ReferentialViolation` describes why a single recommendation was skipped
//!   during a batch write; it is never returned as an error

use thiserror::Error;

use crate::types::{UserId, WorkoutId};

/// Errors that can occur while reading from or writing to a record store
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The SQLite backend rejected a query or transaction
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A JSON column or seed document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error occurred while reading a seed file or creating the database directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored field had a value outside its domain
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A write could not be applied as a whole
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Why a recommendation was left out of a batch write.
///
/// Violations are handled per record: the offending record is dropped and
/// its siblings are still written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferentialViolation {
    #[error("recommendation {recommendation_id} has no owning user")]
    NoOwner { recommendation_id: String },

    #[error("user {0} does not exist")]
    MissingUser(UserId),

    #[error("workout {0} does not exist")]
    MissingWorkout(WorkoutId),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;

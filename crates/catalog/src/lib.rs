//! # Catalog Crate
//!
//! Data model and persistence for the workout recommendation engine.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Workout, User, Preferences, Recommendation, ...)
//! - **store**: The `RecordStore` trait the engine is written against
//! - **memory**: `MemoryStore`, a process-local store
//! - **sqlite**: `SqliteStore`, a SQLite-backed store with transactional batches
//! - **seed**: Load users and workouts from a JSON document
//! - **error**: Error types
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{seed, RecordStore, SqliteStore};
//! use std::path::Path;
//!
//! let store = SqliteStore::open(Path::new("data/workouts.db")).await?;
//! seed::load_seed_file(Path::new("data/seed.json"))?.apply(&store).await?;
//!
//! let workouts = store.workouts().await?;
//! let user = store.user("user-1").await?;
//! ```

pub mod error;
pub mod memory;
pub mod migrations;
pub mod seed;
pub mod sqlite;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, ReferentialViolation, Result};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{resolve_owner, RecordStore};
pub use types::{
    // Type aliases
    UserId,
    WorkoutId,
    // Core types
    Difficulty,
    PersistReport,
    Preferences,
    Recommendation,
    RecommendationOrigin,
    StoredRecommendation,
    User,
    Workout,
    WorkoutFilter,
    // Helpers
    owner_from_recommendation_id,
    ANONYMOUS_USER,
};

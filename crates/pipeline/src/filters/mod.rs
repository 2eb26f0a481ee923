//! Filter implementations for the workout listing pipeline.
//!
//! Each field of a `WorkoutFilter` compiles to one of these. They are
//! composed by `FilterPipeline` and combine with logical AND.

pub mod difficulty;
pub mod duration;
pub mod equipment;
pub mod muscle_group;
pub mod search;

// Re-export for convenience
pub use difficulty::DifficultyFilter;
pub use duration::DurationFilter;
pub use equipment::EquipmentFilter;
pub use muscle_group::MuscleGroupFilter;
pub use search::SearchFilter;

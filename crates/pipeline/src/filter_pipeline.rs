//! The FilterPipeline orchestrates multiple filters.
//!
//! A `WorkoutFilter` is compiled into a chain of `Filter` trait objects,
//! one per present field, which are then applied in sequence.

use crate::error::Result;
use crate::filters::{DifficultyFilter, DurationFilter, EquipmentFilter, MuscleGroupFilter, SearchFilter};
use crate::traits::Filter;
use catalog::{Workout, WorkoutFilter};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::compile(&WorkoutFilter {
///     difficulty: Some(Difficulty::Advanced),
///     min_duration: Some(30),
///     ..Default::default()
/// })?;
///
/// let workouts = pipeline.apply(store.workouts().await?)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Build the pipeline for a structured filter.
    ///
    /// Absent fields, blank search text and empty lists add nothing. The only
    /// rejected shape is `min_duration > max_duration`.
    pub fn compile(filter: &WorkoutFilter) -> Result<Self> {
        let mut pipeline = Self::new();

        if let Some(search) = filter.search.as_deref().and_then(SearchFilter::new) {
            pipeline = pipeline.add_filter(search);
        }
        if let Some(difficulty) = filter.difficulty {
            pipeline = pipeline.add_filter(DifficultyFilter::new(difficulty));
        }
        if filter.min_duration.is_some() || filter.max_duration.is_some() {
            pipeline =
                pipeline.add_filter(DurationFilter::new(filter.min_duration, filter.max_duration)?);
        }
        if let Some(groups) = filter.muscle_groups.as_deref().and_then(MuscleGroupFilter::new) {
            pipeline = pipeline.add_filter(groups);
        }
        if let Some(equipment) = filter.equipment.as_deref().and_then(EquipmentFilter::new) {
            pipeline = pipeline.add_filter(equipment);
        }

        tracing::debug!("Compiled workout filter into {} stages", pipeline.len());
        Ok(pipeline)
    }

    /// Number of filters in the chain
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence, then sort by name ascending with ties
    /// broken by id ascending.
    pub fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        let mut current = workouts;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }

        current.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::filters::fixtures::{create_test_workouts, workout};
    use catalog::Difficulty;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::compile(&WorkoutFilter::default()).unwrap();
        assert!(pipeline.is_empty());

        let filtered = pipeline.apply(create_test_workouts()).unwrap();
        let names: Vec<&str> = filtered.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Core Blast", "Leg Day", "Morning Stretch", "Upper Body Pump"]
        );
    }

    #[test]
    fn test_fields_combine_with_and() {
        let filter = WorkoutFilter {
            difficulty: Some(Difficulty::Advanced),
            min_duration: Some(30),
            ..Default::default()
        };
        let pipeline = FilterPipeline::compile(&filter).unwrap();
        assert_eq!(pipeline.len(), 2);

        let filtered = pipeline.apply(create_test_workouts()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "w2");
    }

    #[test]
    fn test_blank_and_empty_fields_add_no_stages() {
        let filter = WorkoutFilter {
            search: Some("  ".to_string()),
            muscle_groups: Some(vec![]),
            equipment: Some(vec![]),
            ..Default::default()
        };
        let pipeline = FilterPipeline::compile(&filter).unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_inverted_duration_bounds_rejected() {
        let filter = WorkoutFilter {
            min_duration: Some(60),
            max_duration: Some(30),
            ..Default::default()
        };
        assert!(matches!(
            FilterPipeline::compile(&filter),
            Err(PipelineError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_name_ties_broken_by_id() {
        let workouts = vec![
            workout("b", "Same Name", Difficulty::Beginner, 15, &[], &[]),
            workout("a", "Same Name", Difficulty::Beginner, 15, &[], &[]),
        ];
        let filtered = FilterPipeline::new().apply(workouts).unwrap();

        assert_eq!(filtered[0].id, "a");
        assert_eq!(filtered[1].id, "b");
    }
}

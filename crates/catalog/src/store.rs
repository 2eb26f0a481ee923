//! The record store seam.
//!
//! The engine talks to persistence only through `RecordStore`. Two
//! implementations ship with this crate: `MemoryStore` and `SqliteStore`.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ReferentialViolation, Result};
use crate::types::{
    owner_from_recommendation_id, PersistReport, Preferences, Recommendation,
    StoredRecommendation, User, UserId, Workout,
};

/// Key/attribute store holding workouts, users and recommendation history.
///
/// Implementations serialize concurrent writers themselves; callers hold no
/// locks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the name of this store (for logging/debugging)
    fn name(&self) -> &str;

    /// All workouts, ordered by id
    async fn workouts(&self) -> Result<Vec<Workout>>;

    async fn workout(&self, id: &str) -> Result<Option<Workout>>;

    async fn user(&self, id: &str) -> Result<Option<User>>;

    /// Insert a workout or replace the one with the same id
    async fn upsert_workout(&self, workout: &Workout) -> Result<()>;

    /// Insert a user or replace the one with the same id
    async fn upsert_user(&self, user: &User) -> Result<()>;

    /// Replace a user's preferences.
    ///
    /// Returns the updated user, or `None` if no such user exists.
    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>>;

    /// Write-or-replace a batch of recommendations in one transaction.
    ///
    /// `user_id` is the owner of the batch. Records without a resolvable
    /// owner, or referencing a missing user or workout, are skipped and
    /// counted in the returned report; they never abort the batch.
    async fn store_recommendations(
        &self,
        user_id: Option<&str>,
        recommendations: &[Recommendation],
    ) -> Result<PersistReport>;

    /// Stored recommendations for a user, highest confidence first
    async fn recommendations_for(&self, user_id: &str) -> Result<Vec<StoredRecommendation>>;
}

/// Work out who owns a recommendation.
///
/// Order: the explicit batch owner, then the record's own `user_id`, then
/// the owner encoded in the record id.
pub fn resolve_owner(
    explicit: Option<&str>,
    recommendation: &Recommendation,
) -> std::result::Result<UserId, ReferentialViolation> {
    explicit
        .map(str::to_string)
        .or_else(|| recommendation.user_id.clone())
        .or_else(|| {
            owner_from_recommendation_id(&recommendation.id, &recommendation.workout.id)
        })
        .ok_or_else(|| ReferentialViolation::NoOwner {
            recommendation_id: recommendation.id.clone(),
        })
}

impl PersistReport {
    /// Count a skipped record
    pub fn record_skip(&mut self, violation: &ReferentialViolation) {
        debug!("Skipping recommendation: {}", violation);
        match violation {
            ReferentialViolation::NoOwner { .. } => self.skipped_no_owner += 1,
            ReferentialViolation::MissingUser(_) => self.skipped_missing_user += 1,
            ReferentialViolation::MissingWorkout(_) => self.skipped_missing_workout += 1,
        }
    }
}

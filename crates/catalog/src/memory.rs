//! In-memory record store.
//!
//! Holds everything in hash maps behind a single `RwLock`. A recommendation
//! batch is validated and applied while holding the write lock once, so
//! readers never observe half of a batch.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{ReferentialViolation, Result};
use crate::store::{resolve_owner, RecordStore};
use crate::types::{
    PersistReport, Preferences, Recommendation, StoredRecommendation, User, UserId, Workout,
    WorkoutId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    workouts: HashMap<WorkoutId, Workout>,
    /// Keyed by recommendation id
    recommendations: HashMap<String, StoredRecommendation>,
}

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with users and workouts
    pub fn with_data(users: Vec<User>, workouts: Vec<Workout>) -> Self {
        let tables = Tables {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            workouts: workouts.into_iter().map(|w| (w.id.clone(), w)).collect(),
            recommendations: HashMap::new(),
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Get counts for debugging/validation: (users, workouts, recommendations)
    pub async fn counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.read().await;
        (
            tables.users.len(),
            tables.workouts.len(),
            tables.recommendations.len(),
        )
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    async fn workouts(&self) -> Result<Vec<Workout>> {
        let tables = self.tables.read().await;
        let mut workouts: Vec<Workout> = tables.workouts.values().cloned().collect();
        workouts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(workouts)
    }

    async fn workout(&self, id: &str) -> Result<Option<Workout>> {
        Ok(self.tables.read().await.workouts.get(id).cloned())
    }

    async fn user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn upsert_workout(&self, workout: &Workout) -> Result<()> {
        self.tables
            .write()
            .await
            .workouts
            .insert(workout.id.clone(), workout.clone());
        Ok(())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        self.tables
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(user_id).map(|user| {
            user.preferences = preferences.clone();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn store_recommendations(
        &self,
        user_id: Option<&str>,
        recommendations: &[Recommendation],
    ) -> Result<PersistReport> {
        let mut tables = self.tables.write().await;
        let mut report = PersistReport::default();
        let mut staged = Vec::with_capacity(recommendations.len());

        for recommendation in recommendations {
            let checked = resolve_owner(user_id, recommendation).and_then(|owner| {
                if !tables.users.contains_key(&owner) {
                    return Err(ReferentialViolation::MissingUser(owner));
                }
                if !tables.workouts.contains_key(&recommendation.workout.id) {
                    return Err(ReferentialViolation::MissingWorkout(
                        recommendation.workout.id.clone(),
                    ));
                }
                Ok(owner)
            });
            match checked {
                Ok(owner) => staged.push(StoredRecommendation::from_recommendation(
                    recommendation,
                    owner,
                )),
                Err(violation) => report.record_skip(&violation),
            }
        }

        // Single commit point
        report.written = staged.len();
        for stored in staged {
            tables.recommendations.insert(stored.id.clone(), stored);
        }
        Ok(report)
    }

    async fn recommendations_for(&self, user_id: &str) -> Result<Vec<StoredRecommendation>> {
        let tables = self.tables.read().await;
        let mut stored: Vec<StoredRecommendation> = tables
            .recommendations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        stored.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(stored)
    }
}

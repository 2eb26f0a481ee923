//! Loading users and workouts from a JSON seed document.
//!
//! Format (timestamps optional, camelCase keys):
//! ```json
//! {
//!   "users":    [{ "id": "user-1", "email": "...", "name": "...", "fitnessLevel": "beginner" }],
//!   "workouts": [{ "id": "w1", "name": "...", "description": "...", "difficulty": "beginner",
//!                  "duration": 20, "muscleGroups": ["core"], "equipment": [], "instructions": [] }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::store::RecordStore;
use crate::types::{User, Workout};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

/// Read and validate a seed file
pub fn load_seed_file(path: &Path) -> Result<SeedData> {
    let raw = std::fs::read_to_string(path)?;
    let seed: SeedData = serde_json::from_str(&raw)?;
    seed.validate()?;
    info!(
        "Loaded seed file {}: {} users, {} workouts",
        path.display(),
        seed.users.len(),
        seed.workouts.len()
    );
    Ok(seed)
}

impl SeedData {
    /// Check ids are present and unique and durations are positive
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.id.trim().is_empty() || !seen.insert(user.id.as_str()) {
                return Err(invalid("user.id", &user.id));
            }
        }

        seen.clear();
        for workout in &self.workouts {
            if workout.id.trim().is_empty() || !seen.insert(workout.id.as_str()) {
                return Err(invalid("workout.id", &workout.id));
            }
            if workout.duration == 0 {
                return Err(invalid(
                    "workout.duration",
                    &format!("{} ({})", workout.duration, workout.id),
                ));
            }
        }
        Ok(())
    }

    /// Upsert everything into `store`. Returns (users, workouts) written.
    pub async fn apply(&self, store: &dyn RecordStore) -> Result<(usize, usize)> {
        for user in &self.users {
            store.upsert_user(user).await?;
        }
        for workout in &self.workouts {
            store.upsert_workout(workout).await?;
        }
        Ok((self.users.len(), self.workouts.len()))
    }
}

fn invalid(field: &str, value: &str) -> CatalogError {
    CatalogError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

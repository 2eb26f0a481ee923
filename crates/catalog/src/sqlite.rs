//! SQLite record store.
//!
//! Workouts and users live in plain tables with JSON-encoded list columns.
//! Recommendation batches are written inside one `sqlx` transaction, so a
//! failure part way leaves nothing behind.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{CatalogError, ReferentialViolation, Result};
use crate::migrations::BASE_SCHEMA;
use crate::store::{resolve_owner, RecordStore};
use crate::types::{
    Difficulty, PersistReport, Preferences, Recommendation, StoredRecommendation, User, Workout,
};

/// Record store persisted in a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!("Opened workout database at {}", path.display());
        Self::from_pool(pool).await
    }

    /// Private in-memory database, mostly for tests.
    ///
    /// Pinned to a single connection that never expires, since every new
    /// connection to `sqlite::memory:` is a fresh empty database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in BASE_SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        "SqliteStore"
    }

    async fn workouts(&self) -> Result<Vec<Workout>> {
        let rows = sqlx::query(
            r#"
SELECT id, name, description, difficulty, duration_minutes,
       muscle_groups, equipment, instructions, created_at, updated_at
FROM workouts
ORDER BY id
"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_workout).collect()
    }

    async fn workout(&self, id: &str) -> Result<Option<Workout>> {
        let row = sqlx::query(
            r#"
SELECT id, name, description, difficulty, duration_minutes,
       muscle_groups, equipment, instructions, created_at, updated_at
FROM workouts
WHERE id = ?1
"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_workout).transpose()
    }

    async fn user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
SELECT id, email, name, fitness_level, preferences, created_at, updated_at
FROM users
WHERE id = ?1
"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn upsert_workout(&self, workout: &Workout) -> Result<()> {
        sqlx::query(
            r#"
INSERT INTO workouts(
    id, name, description, difficulty, duration_minutes,
    muscle_groups, equipment, instructions, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
ON CONFLICT(id) DO UPDATE SET
    name = excluded.name,
    description = excluded.description,
    difficulty = excluded.difficulty,
    duration_minutes = excluded.duration_minutes,
    muscle_groups = excluded.muscle_groups,
    equipment = excluded.equipment,
    instructions = excluded.instructions,
    created_at = excluded.created_at,
    updated_at = excluded.updated_at
"#,
        )
        .bind(&workout.id)
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(workout.difficulty.as_str())
        .bind(i64::from(workout.duration))
        .bind(serde_json::to_string(&workout.muscle_groups)?)
        .bind(serde_json::to_string(&workout.equipment)?)
        .bind(serde_json::to_string(&workout.instructions)?)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
INSERT INTO users(id, email, name, fitness_level, preferences, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
    email = excluded.email,
    name = excluded.name,
    fitness_level = excluded.fitness_level,
    preferences = excluded.preferences,
    created_at = excluded.created_at,
    updated_at = excluded.updated_at
"#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.fitness_level.as_str())
        .bind(serde_json::to_string(&user.preferences)?)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET preferences = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(serde_json::to_string(preferences)?)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.user(user_id).await
    }

    async fn store_recommendations(
        &self,
        user_id: Option<&str>,
        recommendations: &[Recommendation],
    ) -> Result<PersistReport> {
        let mut report = PersistReport::default();
        let mut tx = self.pool.begin().await?;

        for recommendation in recommendations {
            let owner = match resolve_owner(user_id, recommendation) {
                Ok(owner) => owner,
                Err(violation) => {
                    report.record_skip(&violation);
                    continue;
                }
            };

            let user_exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE id = ?1")
                .bind(&owner)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
            if !user_exists {
                report.record_skip(&ReferentialViolation::MissingUser(owner));
                continue;
            }

            let workout_exists =
                sqlx::query_scalar::<_, i64>("SELECT 1 FROM workouts WHERE id = ?1")
                    .bind(&recommendation.workout.id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .is_some();
            if !workout_exists {
                report.record_skip(&ReferentialViolation::MissingWorkout(
                    recommendation.workout.id.clone(),
                ));
                continue;
            }

            sqlx::query(
                r#"
INSERT INTO workout_recommendations(
    id, user_id, workout_id, confidence, reasoning, ai_generated, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
    user_id = excluded.user_id,
    workout_id = excluded.workout_id,
    confidence = excluded.confidence,
    reasoning = excluded.reasoning,
    ai_generated = excluded.ai_generated,
    created_at = excluded.created_at
"#,
            )
            .bind(&recommendation.id)
            .bind(&owner)
            .bind(&recommendation.workout.id)
            .bind(recommendation.confidence)
            .bind(recommendation.reasoning.as_deref())
            .bind(recommendation.ai_generated)
            .bind(recommendation.created_at)
            .execute(&mut *tx)
            .await?;
            report.written += 1;
        }

        tx.commit().await?;
        debug!(
            "Committed recommendation batch: written={}, skipped={}",
            report.written,
            report.skipped()
        );
        Ok(report)
    }

    async fn recommendations_for(&self, user_id: &str) -> Result<Vec<StoredRecommendation>> {
        let rows = sqlx::query(
            r#"
SELECT id, user_id, workout_id, confidence, reasoning, ai_generated, created_at
FROM workout_recommendations
WHERE user_id = ?1
ORDER BY confidence DESC, id ASC
"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_stored_recommendation).collect()
    }
}

fn row_to_workout(row: &SqliteRow) -> Result<Workout> {
    let difficulty: String = row.try_get("difficulty")?;
    let duration: i64 = row.try_get("duration_minutes")?;
    let duration = u32::try_from(duration).map_err(|_| CatalogError::InvalidValue {
        field: "duration_minutes".to_string(),
        value: duration.to_string(),
    })?;
    let muscle_groups: String = row.try_get("muscle_groups")?;
    let equipment: String = row.try_get("equipment")?;
    let instructions: String = row.try_get("instructions")?;
    Ok(Workout {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        difficulty: difficulty.parse::<Difficulty>()?,
        duration,
        muscle_groups: serde_json::from_str(&muscle_groups)?,
        equipment: serde_json::from_str(&equipment)?,
        instructions: serde_json::from_str(&instructions)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let fitness_level: String = row.try_get("fitness_level")?;
    let preferences: String = row.try_get("preferences")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        fitness_level: fitness_level.parse::<Difficulty>()?,
        preferences: serde_json::from_str(&preferences)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_stored_recommendation(row: &SqliteRow) -> Result<StoredRecommendation> {
    Ok(StoredRecommendation {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        workout_id: row.try_get("workout_id")?,
        confidence: row.try_get("confidence")?,
        reasoning: row.try_get("reasoning")?,
        ai_generated: row.try_get("ai_generated")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

//! Core domain types for the workout catalog.
//!
//! These are the entity shapes shared by every crate in the workspace:
//! workouts, users and their preferences, listing filters, and the
//! recommendation records produced by a recommendation cycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a workout (e.g. "workout-1")
pub type WorkoutId = String;

/// Unique identifier for a user (e.g. "user-1")
pub type UserId = String;

/// Marker used in recommendation ids when no user was given
pub const ANONYMOUS_USER: &str = "anon";

// =============================================================================
// Difficulty
// =============================================================================

/// Difficulty level of a workout, also used as a user's fitness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Storage and wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(CatalogError::InvalidValue {
                field: "difficulty".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Workout
// =============================================================================

/// A workout in the catalog. Owned by the record store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Length in minutes
    pub duration: u32,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Ordered instruction steps
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Users and Preferences
// =============================================================================

/// What a user would like to train. Every field is optional; an absent
/// field means "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Preferred workout length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

impl Preferences {
    /// True when no preference is set at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub fitness_level: Difficulty,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Listing filter
// =============================================================================

/// Structured filter for listing workouts. `WorkoutFilter::default()` means
/// no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutFilter {
    /// Case-insensitive substring of the name or description
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Inclusive lower bound in minutes
    #[serde(default)]
    pub min_duration: Option<u32>,
    /// Inclusive upper bound in minutes
    #[serde(default)]
    pub max_duration: Option<u32>,
    /// Workout must target at least one of these
    #[serde(default)]
    pub muscle_groups: Option<Vec<String>>,
    /// Workout must use at least one of these
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
}

// =============================================================================
// Recommendations
// =============================================================================

/// Which branch of a recommendation cycle produced a record.
///
/// Each origin has its own id prefix so records from different branches
/// never share an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationOrigin {
    Ai,
    Heuristic,
    Fallback,
}

impl RecommendationOrigin {
    pub const ALL: [RecommendationOrigin; 3] = [
        RecommendationOrigin::Ai,
        RecommendationOrigin::Heuristic,
        RecommendationOrigin::Fallback,
    ];

    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Ai => "rec",
            Self::Heuristic => "heuristic",
            Self::Fallback => "fallback",
        }
    }

    /// The origin encoded in a recommendation id's prefix
    pub fn from_recommendation_id(recommendation_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|origin| {
            recommendation_id
                .strip_prefix(origin.prefix())
                .is_some_and(|rest| rest.starts_with('-'))
        })
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Heuristic => "heuristic",
            Self::Fallback => "fallback",
        }
    }

    /// Deterministic identity: `{prefix}-{workout_id}-{user_id|anon}`
    pub fn recommendation_id(&self, workout_id: &str, user_id: Option<&str>) -> String {
        format!(
            "{}-{}-{}",
            self.prefix(),
            workout_id,
            user_id.unwrap_or(ANONYMOUS_USER)
        )
    }
}

/// Recover the owning user from a recommendation id.
///
/// Only used for records that were built without an explicit owner. The
/// workout id is stripped as a known string rather than split on `-`, since
/// both ids may themselves contain hyphens.
pub fn owner_from_recommendation_id(recommendation_id: &str, workout_id: &str) -> Option<UserId> {
    RecommendationOrigin::ALL.iter().find_map(|origin| {
        let owner = recommendation_id
            .strip_prefix(origin.prefix())?
            .strip_prefix('-')?
            .strip_prefix(workout_id)?
            .strip_prefix('-')?;
        match owner {
            "" | ANONYMOUS_USER => None,
            owner => Some(owner.to_string()),
        }
    })
}

/// A workout recommended to a user (or to nobody in particular)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    /// Owning user; `None` for anonymous cycles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub workout: Workout,
    /// 0.0 - 1.0
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

/// A recommendation as it sits in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecommendation {
    pub id: String,
    pub user_id: UserId,
    pub workout_id: WorkoutId,
    pub confidence: f64,
    pub reasoning: Option<String>,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredRecommendation {
    pub fn origin(&self) -> Option<RecommendationOrigin> {
        RecommendationOrigin::from_recommendation_id(&self.id)
    }

    pub fn from_recommendation(recommendation: &Recommendation, user_id: UserId) -> Self {
        Self {
            id: recommendation.id.clone(),
            user_id,
            workout_id: recommendation.workout.id.clone(),
            confidence: recommendation.confidence,
            reasoning: recommendation.reasoning.clone(),
            ai_generated: recommendation.ai_generated,
            created_at: recommendation.created_at,
        }
    }
}

/// Outcome of one batch write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistReport {
    pub written: usize,
    pub skipped_no_owner: usize,
    pub skipped_missing_user: usize,
    pub skipped_missing_workout: usize,
}

impl PersistReport {
    pub fn skipped(&self) -> usize {
        self.skipped_no_owner + self.skipped_missing_user + self.skipped_missing_workout
    }
}

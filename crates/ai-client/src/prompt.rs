//! Prompt construction for workout scoring.

use catalog::{Difficulty, Preferences, Workout};
use pipeline::RecommendationRequest;
use serde::Serialize;

use crate::error::{AiClientError, Result};
use crate::service::Prompt;

const SYSTEM_PROMPT: &str = "You are a professional fitness trainer and workout expert. \
Your job is to analyze a list of workouts and provide recommendations based on user preferences.

You should consider:
- User's fitness level (beginner, intermediate, advanced)
- Preferred duration
- Muscle groups they want to target
- Available equipment
- Workout goals
- Exercise difficulty matching user's level
- Variety and balance in recommendations

Return your analysis as a JSON object of the form {\"recommendations\": [...]} where each entry has:
- workoutId: the ID of the workout
- score: a number from 0-100 indicating how well this workout matches the user's needs
- reasoning: a brief explanation of why this workout is good or not good for the user

Only recommend workouts with a score of 60 or higher, and limit to the most relevant ones.";

/// What the model sees of a workout. Instructions are left out to keep the
/// prompt small.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutSummary<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    difficulty: Difficulty,
    duration: u32,
    muscle_groups: &'a [String],
    equipment: &'a [String],
}

impl<'a> From<&'a Workout> for WorkoutSummary<'a> {
    fn from(workout: &'a Workout) -> Self {
        Self {
            id: &workout.id,
            name: &workout.name,
            description: &workout.description,
            difficulty: workout.difficulty,
            duration: workout.duration,
            muscle_groups: &workout.muscle_groups,
            equipment: &workout.equipment,
        }
    }
}

/// Build the scoring prompt for a recommendation request
pub fn build_prompt(request: &RecommendationRequest) -> Result<Prompt> {
    let empty = Preferences::default();
    let preferences = request.preferences.as_ref().unwrap_or(&empty);
    let summaries: Vec<WorkoutSummary<'_>> = request.workouts.iter().map(Into::into).collect();

    let preferences_json = serde_json::to_string_pretty(preferences)
        .map_err(|e| AiClientError::Config(format!("Failed to encode preferences: {e}")))?;
    let workouts_json = serde_json::to_string_pretty(&summaries)
        .map_err(|e| AiClientError::Config(format!("Failed to encode workouts: {e}")))?;

    let user = format!(
        "Analyze these workouts and provide recommendations:\n\n\
         User Preferences: {preferences_json}\n\n\
         Available Workouts: {workouts_json}\n\n\
         Please recommend up to {} workouts that best match the user's preferences.",
        request.max_recommendations
    );

    Ok(Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
        expects_json: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn workout() -> Workout {
        Workout {
            id: "w1".to_string(),
            name: "Core Blast".to_string(),
            description: "Planks and crunches".to_string(),
            difficulty: Difficulty::Beginner,
            duration: 20,
            muscle_groups: vec!["core".to_string()],
            equipment: vec!["mat".to_string()],
            instructions: vec!["Hold the plank for 60 seconds".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_embeds_condensed_workouts() {
        let request = RecommendationRequest::new(vec![workout()], None).with_max(3);
        let prompt = build_prompt(&request).unwrap();

        assert!(prompt.expects_json);
        assert!(prompt.user.contains("\"id\": \"w1\""));
        assert!(prompt.user.contains("\"muscleGroups\""));
        assert!(prompt.user.contains("up to 3 workouts"));
        assert!(!prompt.user.contains("Hold the plank"));
    }

    #[test]
    fn test_prompt_embeds_preferences() {
        let prefs = Preferences {
            duration: Some(25),
            goals: Some(vec!["strength".to_string()]),
            ..Default::default()
        };
        let request = RecommendationRequest::new(vec![workout()], Some(prefs));
        let prompt = build_prompt(&request).unwrap();

        assert!(prompt.user.contains("\"duration\": 25"));
        assert!(prompt.user.contains("strength"));
        assert!(prompt.system.contains("workoutId"));
    }
}

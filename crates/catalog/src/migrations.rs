/// Schema applied when a `SqliteStore` is opened. Each statement is idempotent.
pub const BASE_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    name TEXT NOT NULL,
    fitness_level TEXT NOT NULL,
    preferences TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS workouts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
    muscle_groups TEXT NOT NULL,
    equipment TEXT NOT NULL,
    instructions TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS workout_recommendations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    confidence REAL NOT NULL,
    reasoning TEXT,
    ai_generated INTEGER NOT NULL,
    created_at TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_recommendations_user_confidence
    ON workout_recommendations(user_id, confidence DESC)
"#,
];

//! SQL schema

pub const CURRENT_VERSION: i32 = 2;

pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

pub const SCHEMA: &str = r#"
-- Shared exercise catalog; name_key is the lower-cased name
CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    name_key TEXT NOT NULL UNIQUE,
    muscle_group TEXT,
    category TEXT,
    equipment TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exercise_aliases (
    exercise_id INTEGER NOT NULL REFERENCES exercises(id),
    alias TEXT NOT NULL,
    alias_key TEXT NOT NULL,
    PRIMARY KEY (exercise_id, alias_key)
);

CREATE INDEX IF NOT EXISTS idx_exercise_aliases_key ON exercise_aliases(alias_key);

CREATE TABLE IF NOT EXISTS workout_plans (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    week_start TEXT NOT NULL,
    plan_json TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(user_id, week_start)
);

CREATE TABLE IF NOT EXISTS workout_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    plan_id TEXT REFERENCES workout_plans(id),
    scheduled_date TEXT NOT NULL,
    title TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled',
    schema_version INTEGER NOT NULL DEFAULT 1,
    exercises_json TEXT NOT NULL,
    started_at TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_date ON workout_sessions(user_id, scheduled_date);
CREATE INDEX IF NOT EXISTS idx_workout_sessions_plan ON workout_sessions(plan_id);

CREATE TABLE IF NOT EXISTS exercise_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL REFERENCES workout_sessions(id),
    exercise_name TEXT NOT NULL,
    set_number INTEGER NOT NULL,
    weight_kg REAL NOT NULL,
    reps INTEGER NOT NULL,
    rpe REAL,
    notes TEXT,
    logged_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exercise_logs_session ON exercise_logs(session_id, exercise_name);
CREATE INDEX IF NOT EXISTS idx_exercise_logs_user ON exercise_logs(user_id, exercise_name);
"#;

/// Version 2: per-user training profile
pub const SCHEMA_V2: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    training_goals TEXT NOT NULL DEFAULT '[]',
    experience_level TEXT,
    available_days INTEGER,
    preferred_unit TEXT NOT NULL DEFAULT 'kg',
    training_objective TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

//! Plans, sessions and per-set logs

pub mod day;
pub mod payload;
pub mod status;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

pub use day::parse_day;
pub use payload::{
    ExerciseEntry, ExerciseGroup, GroupType, PlanInput, SessionExercises, SessionInput,
    SessionUpdate, TimerConfig, TimerMode,
};
pub use status::SessionStatus;

/// A week of training for one user
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start: NaiveDate,
    pub body: PlanInput,
    pub created_at: DateTime<Utc>,
}

/// One dated workout
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub title: String,
    pub status: SessionStatus,
    pub exercises: SessionExercises,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutSession {
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.status = self.status.start()?;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.status = self.status.complete()?;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// A single performed set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub exercise_name: String,
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f32>,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl ExerciseLog {
    pub fn volume(&self) -> f64 {
        self.weight_kg * f64::from(self.reps)
    }
}

/// Set to record against a running session
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewSet {
    #[serde(alias = "exerciseName")]
    pub exercise_name: String,
    #[serde(default, alias = "weightKg")]
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(default)]
    pub rpe: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSet {
    pub fn new(exercise_name: impl Into<String>, weight_kg: f64, reps: u32) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            weight_kg,
            reps,
            rpe: None,
            notes: None,
        }
    }
}

/// Partial edit of a logged set
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetUpdate {
    #[serde(default, alias = "weightKg")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub rpe: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SetUpdate {
    pub fn is_empty(&self) -> bool {
        self.weight_kg.is_none() && self.reps.is_none() && self.rpe.is_none() && self.notes.is_none()
    }
}

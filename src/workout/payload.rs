//! Exercise payloads carried by sessions
//!
//! Two schema versions exist. Version 1 is a flat list of exercises; version
//! 2 groups exercises (supersets, circuits) with a timer configuration. The
//! version travels with the stored session so old rows keep decoding.

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoachError, Result};

/// Rest between sets when a flat list is shown as groups
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// One exercise inside a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_count")]
    pub sets: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "youtubeUrl", skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, alias = "exerciseType", skip_serializing_if = "Option::is_none")]
    pub exercise_type: Option<String>,
    #[serde(default, alias = "targetRpe", skip_serializing_if = "Option::is_none")]
    pub target_rpe: Option<f32>,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    #[default]
    Single,
    Superset,
    Circuit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Standard,
    Emom,
    Amrap,
    Circuit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub mode: TimerMode,
    #[serde(default, alias = "restSeconds", skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(default, alias = "warmupRestSeconds", skip_serializing_if = "Option::is_none")]
    pub warmup_rest_seconds: Option<u32>,
    #[serde(default, alias = "intervalSeconds", skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,
    #[serde(default, alias = "totalRounds", skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
    #[serde(default, alias = "timeLimitSeconds", skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
    #[serde(default, alias = "workSeconds", skip_serializing_if = "Option::is_none")]
    pub work_seconds: Option<u32>,
    #[serde(default, alias = "circuitRestSeconds", skip_serializing_if = "Option::is_none")]
    pub circuit_rest_seconds: Option<u32>,
    #[serde(default, alias = "roundRestSeconds", skip_serializing_if = "Option::is_none")]
    pub round_rest_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, alias = "prepCountdownSeconds", skip_serializing_if = "Option::is_none")]
    pub prep_countdown_seconds: Option<u32>,
}

impl TimerConfig {
    pub fn standard(rest_seconds: u32) -> Self {
        Self {
            mode: TimerMode::Standard,
            rest_seconds: Some(rest_seconds),
            ..Default::default()
        }
    }
}

/// Exercises performed together under one timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseGroup {
    #[serde(default = "new_group_id", alias = "groupId")]
    pub group_id: String,
    #[serde(default, alias = "groupType")]
    pub group_type: GroupType,
    #[serde(default, alias = "timerConfig")]
    pub timer_config: TimerConfig,
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn new_group_id() -> String {
    Uuid::new_v4().to_string()
}

/// Versioned exercise list of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionExercises {
    /// Schema v1
    Flat(Vec<ExerciseEntry>),
    /// Schema v2
    Grouped(Vec<ExerciseGroup>),
}

impl Default for SessionExercises {
    fn default() -> Self {
        SessionExercises::Flat(Vec::new())
    }
}

impl SessionExercises {
    pub const FLAT_VERSION: i32 = 1;
    pub const GROUPED_VERSION: i32 = 2;

    /// Build from the two optional input shapes; groups win when both exist
    pub fn from_parts(
        exercises: Option<Vec<ExerciseEntry>>,
        groups: Option<Vec<ExerciseGroup>>,
    ) -> Option<Self> {
        match (groups, exercises) {
            (Some(groups), _) => Some(SessionExercises::Grouped(groups)),
            (None, Some(exercises)) => Some(SessionExercises::Flat(exercises)),
            (None, None) => None,
        }
    }

    pub fn schema_version(&self) -> i32 {
        match self {
            SessionExercises::Flat(_) => Self::FLAT_VERSION,
            SessionExercises::Grouped(_) => Self::GROUPED_VERSION,
        }
    }

    /// Decode a stored payload according to its schema version
    pub fn from_json(schema_version: i32, json: &str) -> Result<Self> {
        match schema_version {
            Self::FLAT_VERSION => Ok(SessionExercises::Flat(serde_json::from_str(json)?)),
            Self::GROUPED_VERSION => Ok(SessionExercises::Grouped(serde_json::from_str(json)?)),
            other => Err(CoachError::Corrupt(format!(
                "unknown exercise schema version {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn entries(&self) -> Vec<&ExerciseEntry> {
        match self {
            SessionExercises::Flat(list) => list.iter().collect(),
            SessionExercises::Grouped(groups) => {
                groups.iter().flat_map(|g| g.exercises.iter()).collect()
            }
        }
    }

    pub fn entries_mut(&mut self) -> Vec<&mut ExerciseEntry> {
        match self {
            SessionExercises::Flat(list) => list.iter_mut().collect(),
            SessionExercises::Grouped(groups) => groups
                .iter_mut()
                .flat_map(|g| g.exercises.iter_mut())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Grouped view; flat entries become single-exercise groups
    pub fn to_groups(&self) -> Vec<ExerciseGroup> {
        match self {
            SessionExercises::Grouped(groups) => groups.clone(),
            SessionExercises::Flat(list) => list
                .iter()
                .map(|entry| ExerciseGroup {
                    group_id: new_group_id(),
                    group_type: GroupType::Single,
                    timer_config: TimerConfig::standard(DEFAULT_REST_SECONDS),
                    exercises: vec![entry.clone()],
                    notes: None,
                })
                .collect(),
        }
    }
}

/// One day of a plan as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSession", into = "RawSession")]
pub struct SessionInput {
    pub day: String,
    pub title: String,
    pub exercises: SessionExercises,
}

#[derive(Serialize, Deserialize)]
struct RawSession {
    #[serde(default)]
    day: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exercises: Option<Vec<ExerciseEntry>>,
    #[serde(default, alias = "exerciseGroups", skip_serializing_if = "Option::is_none")]
    exercise_groups: Option<Vec<ExerciseGroup>>,
}

fn default_title() -> String {
    "Workout".to_string()
}

impl From<RawSession> for SessionInput {
    fn from(raw: RawSession) -> Self {
        Self {
            day: raw.day,
            title: raw.title,
            exercises: SessionExercises::from_parts(raw.exercises, raw.exercise_groups)
                .unwrap_or_default(),
        }
    }
}

impl From<SessionInput> for RawSession {
    fn from(input: SessionInput) -> Self {
        let (exercises, exercise_groups) = match input.exercises {
            SessionExercises::Flat(list) => (Some(list), None),
            SessionExercises::Grouped(groups) => (None, Some(groups)),
        };
        Self {
            day: input.day,
            title: input.title,
            exercises,
            exercise_groups,
        }
    }
}

impl SessionInput {
    pub fn new(day: impl Into<String>, title: impl Into<String>, exercises: SessionExercises) -> Self {
        Self {
            day: day.into(),
            title: title.into(),
            exercises,
        }
    }
}

/// A full week as submitted by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    #[serde(default)]
    pub sessions: Vec<SessionInput>,
}

/// Partial edit of a stored session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawSessionUpdate")]
pub struct SessionUpdate {
    pub title: Option<String>,
    pub exercises: Option<SessionExercises>,
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RawSessionUpdate {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    exercises: Option<Vec<ExerciseEntry>>,
    #[serde(default, alias = "exerciseGroups")]
    exercise_groups: Option<Vec<ExerciseGroup>>,
    #[serde(default, alias = "scheduledDate")]
    scheduled_date: Option<NaiveDate>,
}

impl From<RawSessionUpdate> for SessionUpdate {
    fn from(raw: RawSessionUpdate) -> Self {
        Self {
            title: raw.title,
            exercises: SessionExercises::from_parts(raw.exercises, raw.exercise_groups),
            scheduled_date: raw.scheduled_date,
        }
    }
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.exercises.is_none() && self.scheduled_date.is_none()
    }
}

/// Parse a set/rep count written as text: "8", " 10 ", or a range like
/// "8-12" (lower bound)
pub fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }

    let (low, high) = text.split_once(['-', '–'])?;
    let low = low.trim().parse::<u32>().ok()?;
    let high = high.trim().parse::<u32>().ok()?;
    (low <= high).then_some(low)
}

fn de_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl Visitor<'_> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer, a numeric string or a range like \"8-12\"")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("count {} is too large", v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("count {} is out of range", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<u32, E> {
            if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) {
                Ok(v as u32)
            } else {
                Err(E::custom(format!("count {} is not a whole number", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u32, E> {
            parse_count(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_are_coerced_at_the_boundary() {
        let entry: ExerciseEntry =
            serde_json::from_value(json!({"name": "Squat", "sets": "4", "reps": "8-12"})).unwrap();
        assert_eq!(entry.sets, 4);
        assert_eq!(entry.reps, 8);

        let entry: ExerciseEntry =
            serde_json::from_value(json!({"name": "Squat", "sets": 3.0, "reps": 5})).unwrap();
        assert_eq!((entry.sets, entry.reps), (3, 5));
    }

    #[test]
    fn test_ambiguous_counts_rejected() {
        for bad in [json!("AMRAP"), json!(-3), json!(2.5), json!("12-8")] {
            let result: std::result::Result<ExerciseEntry, _> =
                serde_json::from_value(json!({"name": "Squat", "sets": 3, "reps": bad}));
            assert!(result.is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_counts_serialize_as_integers() {
        let entry = ExerciseEntry::new("Plank", 3, 1);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"name": "Plank", "sets": 3, "reps": 1}));
    }

    #[test]
    fn test_camel_case_aliases_accepted() {
        let entry: ExerciseEntry = serde_json::from_value(json!({
            "name": "Lateral Raise", "sets": 3, "reps": 15,
            "youtubeUrl": "https://example.com/v", "targetRpe": 8.0
        }))
        .unwrap();
        assert_eq!(entry.youtube_url.as_deref(), Some("https://example.com/v"));
        assert_eq!(entry.target_rpe, Some(8.0));
    }

    #[test]
    fn test_session_input_flat() {
        let input: SessionInput = serde_json::from_value(json!({
            "day": "Monday",
            "exercises": [{"name": "bench", "sets": 4, "reps": 8}]
        }))
        .unwrap();
        assert_eq!(input.title, "Workout");
        assert_eq!(input.exercises.schema_version(), 1);
        assert_eq!(input.exercises.entries()[0].name, "bench");
    }

    #[test]
    fn test_session_input_grouped_preferred() {
        let input: SessionInput = serde_json::from_value(json!({
            "day": "Friday",
            "title": "Arms",
            "exercises": [{"name": "ignored", "sets": 1, "reps": 1}],
            "exerciseGroups": [{
                "groupType": "superset",
                "timerConfig": {"mode": "standard", "restSeconds": 60},
                "exercises": [
                    {"name": "curl", "sets": 3, "reps": 12},
                    {"name": "pushdown", "sets": 3, "reps": 12}
                ]
            }]
        }))
        .unwrap();

        let SessionExercises::Grouped(groups) = &input.exercises else {
            panic!("expected grouped payload");
        };
        assert_eq!(groups[0].group_type, GroupType::Superset);
        assert_eq!(groups[0].timer_config.rest_seconds, Some(60));
        assert!(!groups[0].group_id.is_empty());
        assert_eq!(input.exercises.entries().len(), 2);
    }

    #[test]
    fn test_session_input_serializes_back_to_its_shape() {
        let input = SessionInput::new(
            "Monday",
            "Push",
            SessionExercises::Flat(vec![ExerciseEntry::new("Dip", 3, 10)]),
        );
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["exercises"][0]["name"], "Dip");
        assert!(value.get("exercise_groups").is_none());
    }

    #[test]
    fn test_stored_payload_dispatches_on_version() {
        let flat = SessionExercises::Flat(vec![ExerciseEntry::new("Plank", 3, 1)]);
        let json = flat.to_json().unwrap();
        assert_eq!(SessionExercises::from_json(1, &json).unwrap(), flat);
        assert!(matches!(
            SessionExercises::from_json(7, &json),
            Err(CoachError::Corrupt(_))
        ));
    }

    #[test]
    fn test_flat_projects_to_single_groups() {
        let flat = SessionExercises::Flat(vec![
            ExerciseEntry::new("Plank", 3, 1),
            ExerciseEntry::new("Dead Bug", 3, 10),
        ]);
        let groups = flat.to_groups();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.group_type == GroupType::Single));
        assert_eq!(groups[0].timer_config.rest_seconds, Some(DEFAULT_REST_SECONDS));
        assert_ne!(groups[0].group_id, groups[1].group_id);
    }

    #[test]
    fn test_session_update_emptiness() {
        let update: SessionUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.is_empty());

        let update: SessionUpdate =
            serde_json::from_value(json!({"scheduledDate": "2026-03-05"})).unwrap();
        assert_eq!(update.scheduled_date, NaiveDate::from_ymd_opt(2026, 3, 5));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("10"), Some(10));
        assert_eq!(parse_count(" 8 - 12 "), Some(8));
        assert_eq!(parse_count("8–10"), Some(8));
        assert_eq!(parse_count("to failure"), None);
    }
}

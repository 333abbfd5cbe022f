//! Read-side projections over logged sets
//!
//! Features:
//! - Logged exercise names and per-exercise history
//! - Volume, frequency and next-load analytics
//! - Weekly muscle group balance

pub mod muscle_balance;

pub use muscle_balance::{MuscleBalance, MuscleLoad};

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{DatedLog, Database, LogStore, SessionStore};
use crate::error::Result;
use crate::resolver::NameResolver;
use crate::workout::ExerciseLog;
use crate::workout::day::sub_days;

/// Best numbers of one exercise on one session date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub best_reps: u32,
    pub total_sets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistory {
    pub exercise_name: String,
    pub data_points: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetDetail {
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f32>,
}

/// Every set of one exercise on one session date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub sets: Vec<SetDetail>,
}

/// Read-only progress queries for one user at a time
pub struct Progress<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> Progress<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            today: Utc::now().date_naive(),
        }
    }

    /// Evaluate date windows relative to `today` instead of the clock
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Canonical name without registering anything new
    fn canonical(&self, raw: &str) -> Result<String> {
        let catalog = self.db.catalog();
        Ok(NameResolver::new(&catalog)
            .lookup(raw)?
            .map(|r| r.name)
            .unwrap_or_else(|| raw.trim().to_string()))
    }

    fn since(&self, days: u32) -> Result<NaiveDate> {
        sub_days(self.today, u64::from(days))
    }

    pub fn logged_exercise_names(&self, user_id: Uuid) -> Result<Vec<String>> {
        LogStore::new(self.db.connection()).exercise_names(user_id)
    }

    /// Per-date best weight, best reps and set count over the last `days`
    pub fn exercise_history(&self, user_id: Uuid, raw_name: &str, days: u32) -> Result<ExerciseHistory> {
        let exercise_name = self.canonical(raw_name)?;
        let logs = LogStore::new(self.db.connection()).history(user_id, &exercise_name, self.since(days)?)?;

        let mut by_date: BTreeMap<NaiveDate, HistoryPoint> = BTreeMap::new();
        for DatedLog { session_date, log } in logs {
            let point = by_date.entry(session_date).or_insert(HistoryPoint {
                date: session_date,
                max_weight: 0.0,
                best_reps: 0,
                total_sets: 0,
            });
            point.max_weight = point.max_weight.max(log.weight_kg);
            point.best_reps = point.best_reps.max(log.reps);
            point.total_sets += 1;
        }

        Ok(ExerciseHistory {
            exercise_name,
            data_points: by_date.into_values().collect(),
        })
    }

    /// Every set over the last `days`, grouped by session date
    pub fn history_detail(&self, user_id: Uuid, raw_name: &str, days: u32) -> Result<Vec<HistoryDay>> {
        let exercise_name = self.canonical(raw_name)?;
        let logs = LogStore::new(self.db.connection()).history(user_id, &exercise_name, self.since(days)?)?;

        let mut days_out: Vec<HistoryDay> = Vec::new();
        for DatedLog { session_date, log } in logs {
            let detail = SetDetail {
                set_number: log.set_number,
                weight_kg: log.weight_kg,
                reps: log.reps,
                rpe: log.rpe,
            };
            match days_out.last_mut() {
                Some(day) if day.date == session_date => day.sets.push(detail),
                _ => days_out.push(HistoryDay {
                    date: session_date,
                    sets: vec![detail],
                }),
            }
        }

        Ok(days_out)
    }

    /// Latest sets of one exercise, newest first
    pub fn recent_sets(&self, user_id: Uuid, raw_name: &str, limit: usize) -> Result<Vec<ExerciseLog>> {
        let exercise_name = self.canonical(raw_name)?;
        LogStore::new(self.db.connection()).recent(user_id, &exercise_name, limit)
    }

    pub fn analytics(&self, user_id: Uuid) -> Result<Analytics> {
        let logs = LogStore::new(self.db.connection()).all_for_user(user_id)?;
        let completed = SessionStore::new(self.db.connection()).completed_dates(user_id)?;
        Ok(Analytics::new(logs, completed))
    }

    pub fn muscle_balance(&self, user_id: Uuid) -> Result<MuscleBalance> {
        let logs = LogStore::new(self.db.connection()).all_for_user(user_id)?;

        let catalog = self.db.catalog();
        let mut groups = HashMap::new();
        for entry in &logs {
            let name = entry.log.exercise_name.as_str();
            if !groups.contains_key(name) {
                groups.insert(name.to_string(), catalog.muscle_group_of(name)?);
            }
        }

        Ok(MuscleBalance::from_logs(
            &logs,
            |name: &str| groups.get(name).copied().flatten(),
            self.today,
        ))
    }
}

/// Suggested load for the next set of an exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSuggestion {
    pub weight_kg: f64,
    pub reps: u32,
}

/// Training analytics
pub struct Analytics {
    logs: Vec<DatedLog>,
    completed: Vec<NaiveDate>,
}

impl Analytics {
    /// `logs` oldest first; `completed` holds dates of completed sessions
    pub fn new(logs: Vec<DatedLog>, completed: Vec<NaiveDate>) -> Self {
        Self { logs, completed }
    }

    fn sets_of<'s>(&'s self, exercise: &str) -> impl DoubleEndedIterator<Item = &'s ExerciseLog> + 's {
        let key = exercise.to_lowercase();
        self.logs
            .iter()
            .map(|entry| &entry.log)
            .filter(move |log| log.exercise_name.to_lowercase() == key)
    }

    /// Total volume (weight × reps) for an exercise
    pub fn total_volume(&self, exercise: &str) -> f64 {
        self.sets_of(exercise).map(ExerciseLog::volume).sum()
    }

    /// Completed sessions per week over the span they cover
    pub fn weekly_frequency(&self) -> f64 {
        let (Some(first), Some(last)) = (self.completed.iter().min(), self.completed.iter().max()) else {
            return 0.0;
        };
        if self.completed.len() < 2 {
            return 0.0;
        }

        let days = (*last - *first).num_days() as f64;
        if days == 0.0 {
            return self.completed.len() as f64;
        }

        (self.completed.len() as f64 / days) * 7.0
    }

    /// Mean of the last five sets with one more rep
    pub fn predict_next_load(&self, exercise: &str) -> Option<LoadSuggestion> {
        let recent: Vec<_> = self.sets_of(exercise).rev().take(5).collect();
        if recent.is_empty() {
            return None;
        }

        let n = recent.len() as f64;
        let weight = recent.iter().map(|l| l.weight_kg).sum::<f64>() / n;
        let reps = recent.iter().map(|l| f64::from(l.reps)).sum::<f64>() / n;

        Some(LoadSuggestion {
            weight_kg: (weight * 2.0).round() / 2.0,
            reps: (reps.round() as u32).saturating_add(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use crate::exercises::MuscleGroup;
    use crate::schedule::Scheduler;
    use crate::tracking::Tracker;
    use crate::workout::{NewSet, SessionExercises, SessionInput};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn dated(name: &str, day: u32, weight_kg: f64, reps: u32) -> DatedLog {
        DatedLog {
            session_date: date(day),
            log: ExerciseLog {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                session_id: Uuid::nil(),
                exercise_name: name.to_string(),
                set_number: 1,
                weight_kg,
                reps,
                rpe: None,
                notes: None,
                logged_at: Utc::now(),
            },
        }
    }

    /// Run one session on `day` (week of March 2) with the given sets
    fn train(db: &mut Database, user: Uuid, day: &str, sets: &[(&str, f64, u32)]) {
        let input = SessionInput::new(day, "Session", SessionExercises::default());
        let added = Scheduler::new(db).add_session_to_week(user, date(2), &input).unwrap();
        let mut tracker = Tracker::new(db);
        tracker.start_session(user, added.session_id).unwrap();
        for (name, weight, reps) in sets {
            tracker.log_set(user, added.session_id, &NewSet::new(*name, *weight, *reps)).unwrap();
        }
        tracker.complete_session(user, added.session_id).unwrap();
    }

    #[test]
    fn test_total_volume() {
        let analytics = Analytics::new(
            vec![
                dated("Barbell Back Squat", 2, 100.0, 5),
                dated("Barbell Back Squat", 4, 110.0, 3),
                dated("Plank", 4, 0.0, 1),
            ],
            vec![],
        );
        assert_eq!(analytics.total_volume("barbell back squat"), 830.0);
        assert_eq!(analytics.total_volume("Deadlift"), 0.0);
    }

    #[test]
    fn test_weekly_frequency() {
        assert_eq!(Analytics::new(vec![], vec![]).weekly_frequency(), 0.0);
        assert_eq!(Analytics::new(vec![], vec![date(2)]).weekly_frequency(), 0.0);
        assert_eq!(Analytics::new(vec![], vec![date(2), date(2)]).weekly_frequency(), 2.0);

        let freq = Analytics::new(vec![], vec![date(2), date(9)]).weekly_frequency();
        assert!((freq - 2.0).abs() < 0.1, "Expected ~2, got {}", freq);
    }

    #[test]
    fn test_predict_next_load_uses_last_five() {
        let mut logs = vec![dated("Overhead Press", 1, 20.0, 12)];
        for reps in [8, 8, 7, 6, 6] {
            logs.push(dated("Overhead Press", 2, 50.0, reps));
        }
        let analytics = Analytics::new(logs, vec![]);

        let suggestion = analytics.predict_next_load("Overhead Press").unwrap();
        assert_eq!(suggestion.weight_kg, 50.0);
        assert_eq!(suggestion.reps, 8);
        assert!(analytics.predict_next_load("Arnold Press").is_none());
    }

    #[test]
    fn test_predict_next_load_saturates_reps() {
        let analytics = Analytics::new(vec![dated("Plank", 2, 0.0, u32::MAX)], vec![]);
        let suggestion = analytics.predict_next_load("Plank").unwrap();
        assert_eq!(suggestion.reps, u32::MAX);
    }

    #[test]
    fn test_history_window_beyond_calendar_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let progress = Progress::new(&db).as_of(date(8));
        assert!(matches!(
            progress.exercise_history(Uuid::new_v4(), "squat", u32::MAX),
            Err(CoachError::DateOutOfRange(_))
        ));
        assert!(progress.history_detail(Uuid::new_v4(), "squat", u32::MAX).is_err());
    }

    #[test]
    fn test_recent_sets_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();
        let user = Uuid::new_v4();

        train(&mut db, user, "Monday", &[("squat", 100.0, 5), ("squat", 105.0, 5), ("squat", 110.0, 3)]);
        train(&mut db, user, "Tuesday", &[("bench", 60.0, 8)]);

        let progress = Progress::new(&db);
        let recent = progress.recent_sets(user, "back squat", 2).unwrap();
        let weights: Vec<f64> = recent.iter().map(|l| l.weight_kg).collect();
        assert_eq!(weights, vec![110.0, 105.0]);
        assert!(recent.iter().all(|l| l.exercise_name == "Barbell Back Squat"));

        assert_eq!(progress.recent_sets(user, "squat", 10).unwrap().len(), 3);
        assert!(progress.recent_sets(Uuid::new_v4(), "squat", 10).unwrap().is_empty());
    }

    #[test]
    fn test_history_groups_by_session_date() {
        let mut db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();
        let user = Uuid::new_v4();

        train(&mut db, user, "Monday", &[("bench", 70.0, 10), ("bench", 72.5, 8), ("squat", 100.0, 5)]);
        train(&mut db, user, "Thursday", &[("Bench Press", 75.0, 6)]);

        let progress = Progress::new(&db).as_of(date(8));
        let history = progress.exercise_history(user, "flat bench", 30).unwrap();
        assert_eq!(history.exercise_name, "Barbell Bench Press");
        assert_eq!(
            history.data_points,
            vec![
                HistoryPoint { date: date(2), max_weight: 72.5, best_reps: 10, total_sets: 2 },
                HistoryPoint { date: date(5), max_weight: 75.0, best_reps: 6, total_sets: 1 },
            ]
        );

        let detail = progress.history_detail(user, "bench", 30).unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0].sets.len(), 2);
        assert_eq!(detail[0].sets[1].set_number, 2);

        // Window excludes Monday
        let recent = progress.exercise_history(user, "bench", 4).unwrap();
        assert_eq!(recent.data_points.len(), 1);

        assert_eq!(
            progress.logged_exercise_names(user).unwrap(),
            vec!["Barbell Back Squat", "Barbell Bench Press"]
        );
        assert!(progress.logged_exercise_names(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_reads_do_not_register_exercises() {
        let mut db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();
        let before = db.catalog().count().unwrap();

        let progress = Progress::new(&db);
        let history = progress.exercise_history(Uuid::new_v4(), "  Sled Push ", 90).unwrap();
        assert_eq!(history.exercise_name, "Sled Push");
        assert!(history.data_points.is_empty());
        assert_eq!(db.catalog().count().unwrap(), before);
    }

    #[test]
    fn test_analytics_and_balance_from_store() {
        let mut db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();
        let user = Uuid::new_v4();

        train(&mut db, user, "Monday", &[("squat", 100.0, 5), ("squat", 100.0, 5)]);
        train(&mut db, user, "Wednesday", &[("pull up", 0.0, 8), ("Mystery Move", 10.0, 10)]);

        let progress = Progress::new(&db).as_of(date(4));
        let analytics = progress.analytics(user).unwrap();
        assert_eq!(analytics.total_volume("Barbell Back Squat"), 1000.0);
        assert!((analytics.weekly_frequency() - 7.0).abs() < 1e-9);

        let balance = progress.muscle_balance(user).unwrap();
        assert_eq!(balance.get_load(MuscleGroup::Legs).unwrap().week_sets, 2);
        assert_eq!(balance.get_load(MuscleGroup::Back).unwrap().today_sets, 1);
        assert_eq!(balance.get_load(MuscleGroup::Chest).unwrap().week_sets, 0);
    }
}

//! Muscle group load tracking for balanced training

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::db::DatedLog;
use crate::exercises::MuscleGroup;

/// Set counts for a single muscle group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleLoad {
    pub group: MuscleGroup,
    pub today_sets: u32,
    pub week_sets: u32,
    pub last_trained: Option<NaiveDate>,
}

/// Tracks muscle group load from logged sets
pub struct MuscleBalance {
    loads: HashMap<MuscleGroup, MuscleLoad>,
}

impl MuscleBalance {
    /// Build from logged sets; `classify` maps an exercise name to its group
    /// and sets of unclassified exercises are skipped
    pub fn from_logs<F>(logs: &[DatedLog], classify: F, today: NaiveDate) -> Self
    where
        F: Fn(&str) -> Option<MuscleGroup>,
    {
        let mut loads: HashMap<MuscleGroup, MuscleLoad> = MuscleGroup::all()
            .iter()
            .map(|group| {
                (
                    *group,
                    MuscleLoad {
                        group: *group,
                        today_sets: 0,
                        week_sets: 0,
                        last_trained: None,
                    },
                )
            })
            .collect();

        let week_start = today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN);

        for entry in logs {
            let Some(group) = classify(&entry.log.exercise_name) else {
                continue;
            };
            let Some(load) = loads.get_mut(&group) else {
                continue;
            };

            let date = entry.session_date;
            if date == today {
                load.today_sets += 1;
            }
            if date >= week_start && date <= today {
                load.week_sets += 1;
            }
            if load.last_trained.is_none_or(|last| last < date) {
                load.last_trained = Some(date);
            }
        }

        Self { loads }
    }

    pub fn get_load(&self, group: MuscleGroup) -> Option<&MuscleLoad> {
        self.loads.get(&group)
    }

    /// Least worked this week first, excluding full body
    pub fn underworked_groups(&self, limit: usize) -> Vec<MuscleGroup> {
        let mut loads: Vec<_> = self
            .loads
            .values()
            .filter(|l| l.group != MuscleGroup::FullBody)
            .collect();
        loads.sort_by_key(|l| (l.week_sets, l.group));
        loads.into_iter().take(limit).map(|l| l.group).collect()
    }

    /// Balance score (0-100); 100 means equal weekly sets in every group
    pub fn balance_score(&self) -> f32 {
        let sets: Vec<f32> = self
            .loads
            .values()
            .filter(|l| l.group != MuscleGroup::FullBody)
            .map(|l| l.week_sets as f32)
            .collect();

        let total: f32 = sets.iter().sum();
        if sets.is_empty() || total == 0.0 {
            return 0.0;
        }

        let mean = total / sets.len() as f32;
        let variance = sets.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / sets.len() as f32;
        let cv = variance.sqrt() / mean;

        // CV of 0 scores 100, CV of 1 or more scores 0
        ((1.0 - cv.min(1.0)) * 100.0).max(0.0)
    }

    /// Weekly sets per group with a small bar, busiest first
    pub fn weekly_report(&self) -> Vec<(MuscleGroup, u32, &'static str)> {
        let max_sets = self
            .loads
            .values()
            .filter(|l| l.group != MuscleGroup::FullBody)
            .map(|l| l.week_sets)
            .max()
            .unwrap_or(1)
            .max(1);

        let mut report: Vec<_> = self
            .loads
            .values()
            .filter(|l| l.group != MuscleGroup::FullBody)
            .map(|load| {
                let ratio = load.week_sets as f32 / max_sets as f32;
                let bar = match ratio {
                    r if r >= 0.75 => "[++++]",
                    r if r >= 0.50 => "[+++.]",
                    r if r >= 0.25 => "[++..]",
                    r if r > 0.0 => "[+...]",
                    _ => "[....]",
                };
                (load.group, load.week_sets, bar)
            })
            .collect();

        report.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        report
    }
}

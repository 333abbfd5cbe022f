//! Per-user training profile: goals, experience, weekly availability and
//! the unit weights are shown in. The coach reads it before planning.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::{Database, ProfileStore};
use crate::error::{CoachError, Result};

/// Longest training objective accepted, in characters
pub const MAX_OBJECTIVE_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            other => Err(CoachError::Corrupt(format!("unknown experience level '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kg" => Ok(WeightUnit::Kg),
            "lbs" => Ok(WeightUnit::Lbs),
            other => Err(CoachError::Corrupt(format!("unknown weight unit '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: String,
    pub training_goals: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub available_days: Option<u32>,
    pub preferred_unit: WeightUnit,
    /// Free-text measurable goal, e.g. "10 pull-ups by June"
    pub training_objective: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile edit; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, alias = "trainingGoals")]
    pub training_goals: Option<Vec<String>>,
    #[serde(default, alias = "experienceLevel")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, alias = "availableDays")]
    pub available_days: Option<u32>,
    #[serde(default, alias = "preferredUnit")]
    pub preferred_unit: Option<WeightUnit>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.training_goals.is_none()
            && self.experience_level.is_none()
            && self.available_days.is_none()
            && self.preferred_unit.is_none()
    }
}

/// Profile reads and edits for one unit of work
pub struct Profiles<'a> {
    db: &'a mut Database,
}

impl<'a> Profiles<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Create the user's profile if missing and return the stored one
    pub fn create(&mut self, user_id: Uuid, display_name: &str) -> Result<Profile> {
        let tx = self.db.transaction()?;
        let store = ProfileStore::new(&tx);

        let now = Utc::now();
        let inserted = store.insert(&Profile {
            user_id,
            display_name: display_name.trim().to_string(),
            training_goals: Vec::new(),
            experience_level: None,
            available_days: None,
            preferred_unit: WeightUnit::default(),
            training_objective: None,
            created_at: now,
            updated_at: now,
        })?;
        let profile = store.get(user_id)?.ok_or(CoachError::NotFound("Profile"))?;
        tx.commit()?;

        if inserted {
            info!(user_id = %user_id, "Profile created");
        }
        Ok(profile)
    }

    pub fn get(&self, user_id: Uuid) -> Result<Profile> {
        ProfileStore::new(self.db.connection())
            .get(user_id)?
            .ok_or(CoachError::NotFound("Profile"))
    }

    pub fn update(&mut self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile> {
        if update.is_empty() {
            return Err(CoachError::NoFields);
        }

        let tx = self.db.transaction()?;
        let store = ProfileStore::new(&tx);
        let mut profile = store.get(user_id)?.ok_or(CoachError::NotFound("Profile"))?;

        if let Some(goals) = update.training_goals {
            profile.training_goals = goals;
        }
        if let Some(level) = update.experience_level {
            profile.experience_level = Some(level);
        }
        if let Some(days) = update.available_days {
            profile.available_days = Some(days);
        }
        if let Some(unit) = update.preferred_unit {
            profile.preferred_unit = unit;
        }
        profile.updated_at = Utc::now();

        store.save(&profile)?;
        tx.commit()?;

        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }

    /// Replace the training objective; blank text clears it
    pub fn set_training_objective(&mut self, user_id: Uuid, objective: &str) -> Result<Option<String>> {
        let chars = objective.chars().count();
        if chars > MAX_OBJECTIVE_CHARS {
            return Err(CoachError::ObjectiveTooLong(chars));
        }

        let tx = self.db.transaction()?;
        let store = ProfileStore::new(&tx);
        let mut profile = store.get(user_id)?.ok_or(CoachError::NotFound("Profile"))?;

        let objective = objective.trim();
        profile.training_objective = (!objective.is_empty()).then(|| objective.to_string());
        profile.updated_at = Utc::now();

        store.save(&profile)?;
        tx.commit()?;

        info!(user_id = %user_id, cleared = profile.training_objective.is_none(), "Training objective set");
        Ok(profile.training_objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_profile() -> (Database, Uuid) {
        let mut db = Database::open_in_memory().unwrap();
        let user = Uuid::new_v4();
        Profiles::new(&mut db).create(user, " Sam ").unwrap();
        (db, user)
    }

    #[test]
    fn test_create_defaults_and_is_idempotent() {
        let (mut db, user) = with_profile();
        let mut profiles = Profiles::new(&mut db);

        let profile = profiles.get(user).unwrap();
        assert_eq!(profile.display_name, "Sam");
        assert!(profile.training_goals.is_empty());
        assert_eq!(profile.preferred_unit, WeightUnit::Kg);
        assert_eq!(profile.experience_level, None);

        let again = profiles.create(user, "Someone Else").unwrap();
        assert_eq!(again.display_name, "Sam");
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        let mut db = Database::open_in_memory().unwrap();
        let mut profiles = Profiles::new(&mut db);
        let stranger = Uuid::new_v4();

        assert!(matches!(profiles.get(stranger), Err(CoachError::NotFound("Profile"))));
        let update = ProfileUpdate { available_days: Some(3), ..Default::default() };
        assert!(matches!(profiles.update(stranger, update), Err(CoachError::NotFound(_))));
        assert!(matches!(
            profiles.set_training_objective(stranger, "Run 5k"),
            Err(CoachError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let (mut db, user) = with_profile();
        let mut profiles = Profiles::new(&mut db);

        let update: ProfileUpdate = serde_json::from_str(
            r#"{"trainingGoals": ["strength", "mobility"], "experienceLevel": "intermediate", "availableDays": 4}"#,
        )
        .unwrap();
        let updated = profiles.update(user, update).unwrap();
        assert_eq!(updated.training_goals, vec!["strength", "mobility"]);
        assert_eq!(updated.experience_level, Some(ExperienceLevel::Intermediate));
        assert_eq!(updated.available_days, Some(4));
        assert_eq!(updated.preferred_unit, WeightUnit::Kg);

        let unit = ProfileUpdate { preferred_unit: Some(WeightUnit::Lbs), ..Default::default() };
        let updated = profiles.update(user, unit).unwrap();
        assert_eq!(updated.preferred_unit, WeightUnit::Lbs);
        assert_eq!(updated.available_days, Some(4));
        assert!(updated.updated_at >= updated.created_at);

        assert_eq!(profiles.get(user).unwrap(), updated);
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let (mut db, user) = with_profile();
        let mut profiles = Profiles::new(&mut db);
        assert!(matches!(profiles.update(user, ProfileUpdate::default()), Err(CoachError::NoFields)));

        let parsed: ProfileUpdate = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_training_objective_set_and_cleared() {
        let (mut db, user) = with_profile();
        let mut profiles = Profiles::new(&mut db);

        let set = profiles.set_training_objective(user, "10 pull-ups in 6 months").unwrap();
        assert_eq!(set.as_deref(), Some("10 pull-ups in 6 months"));
        assert_eq!(
            profiles.get(user).unwrap().training_objective.as_deref(),
            Some("10 pull-ups in 6 months")
        );

        assert_eq!(profiles.set_training_objective(user, "  ").unwrap(), None);
        assert_eq!(profiles.get(user).unwrap().training_objective, None);
    }

    #[test]
    fn test_training_objective_length_limit() {
        let (mut db, user) = with_profile();
        let mut profiles = Profiles::new(&mut db);

        let at_limit = "é".repeat(MAX_OBJECTIVE_CHARS);
        assert!(profiles.set_training_objective(user, &at_limit).is_ok());

        let too_long = "x".repeat(MAX_OBJECTIVE_CHARS + 1);
        assert!(matches!(
            profiles.set_training_objective(user, &too_long),
            Err(CoachError::ObjectiveTooLong(1001))
        ));
        assert_eq!(profiles.get(user).unwrap().training_objective, Some(at_limit));
    }

    #[test]
    fn test_unknown_stored_unit_is_corrupt() {
        let (db, user) = with_profile();
        db.connection()
            .execute("UPDATE profiles SET preferred_unit = 'stone'", [])
            .unwrap();
        assert!(matches!(
            ProfileStore::new(db.connection()).get(user),
            Err(CoachError::Corrupt(_))
        ));
    }
}

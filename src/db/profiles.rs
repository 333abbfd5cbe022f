//! Training profile persistence

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::Result;
use crate::profile::Profile;

use super::{parse_timestamp, parse_uuid};

struct ProfileRow {
    user_id: String,
    display_name: String,
    training_goals: String,
    experience_level: Option<String>,
    available_days: Option<u32>,
    preferred_unit: String,
    training_objective: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            display_name: row.get(1)?,
            training_goals: row.get(2)?,
            experience_level: row.get(3)?,
            available_days: row.get(4)?,
            preferred_unit: row.get(5)?,
            training_objective: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_profile(self) -> Result<Profile> {
        Ok(Profile {
            user_id: parse_uuid(&self.user_id)?,
            display_name: self.display_name,
            training_goals: serde_json::from_str(&self.training_goals)?,
            experience_level: self.experience_level.map(|l| l.parse()).transpose()?,
            available_days: self.available_days,
            preferred_unit: self.preferred_unit.parse()?,
            training_objective: self.training_objective,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// One profile row per user
pub struct ProfileStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProfileStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert unless the user already has a profile; true when inserted
    pub fn insert(&self, profile: &Profile) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO profiles
             (user_id, display_name, training_goals, experience_level, available_days,
              preferred_unit, training_objective, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                profile.user_id.to_string(),
                profile.display_name,
                serde_json::to_string(&profile.training_goals)?,
                profile.experience_level.map(|l| l.as_str()),
                profile.available_days,
                profile.preferred_unit.as_str(),
                profile.training_objective,
                profile.created_at.to_rfc3339(),
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(changed == 1)
    }

    pub fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, display_name, training_goals, experience_level, available_days,
                        preferred_unit, training_objective, created_at, updated_at
                 FROM profiles WHERE user_id = ?1",
                params![user_id.to_string()],
                ProfileRow::from_row,
            )
            .optional()?;
        row.map(ProfileRow::into_profile).transpose()
    }

    /// Write every mutable column back
    pub fn save(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "UPDATE profiles SET display_name = ?2, training_goals = ?3, experience_level = ?4,
                    available_days = ?5, preferred_unit = ?6, training_objective = ?7, updated_at = ?8
             WHERE user_id = ?1",
            params![
                profile.user_id.to_string(),
                profile.display_name,
                serde_json::to_string(&profile.training_goals)?,
                profile.experience_level.map(|l| l.as_str()),
                profile.available_days,
                profile.preferred_unit.as_str(),
                profile.training_objective,
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

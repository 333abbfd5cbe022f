//! Plan and session persistence

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::Result;
use crate::workout::{PlanInput, SessionExercises, SessionStatus, WorkoutPlan, WorkoutSession};

use super::{parse_date, parse_optional_timestamp, parse_timestamp, parse_uuid};

const SESSION_COLUMNS: &str = "id, user_id, plan_id, scheduled_date, title, status, schema_version,
     exercises_json, started_at, completed_at, created_at";

/// Raw session row before decoding
struct SessionRow {
    id: String,
    user_id: String,
    plan_id: Option<String>,
    scheduled_date: String,
    title: String,
    status: String,
    schema_version: i32,
    exercises_json: String,
    started_at: Option<String>,
    completed_at: Option<String>,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            plan_id: row.get(2)?,
            scheduled_date: row.get(3)?,
            title: row.get(4)?,
            status: row.get(5)?,
            schema_version: row.get(6)?,
            exercises_json: row.get(7)?,
            started_at: row.get(8)?,
            completed_at: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn into_session(self) -> Result<WorkoutSession> {
        Ok(WorkoutSession {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            plan_id: self.plan_id.as_deref().map(parse_uuid).transpose()?,
            scheduled_date: parse_date(&self.scheduled_date)?,
            title: self.title,
            status: self.status.parse()?,
            exercises: SessionExercises::from_json(self.schema_version, &self.exercises_json)?,
            started_at: parse_optional_timestamp(self.started_at)?,
            completed_at: parse_optional_timestamp(self.completed_at)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Plans and sessions of all users; every read is scoped by `user_id`
pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== Plans ==========

    pub fn find_plan_id(&self, user_id: Uuid, week_start: NaiveDate) -> Result<Option<Uuid>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM workout_plans WHERE user_id = ?1 AND week_start = ?2",
                params![user_id.to_string(), week_start.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        id.as_deref().map(parse_uuid).transpose()
    }

    pub fn get_plan(&self, user_id: Uuid, week_start: NaiveDate) -> Result<Option<WorkoutPlan>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, plan_json, created_at FROM workout_plans WHERE user_id = ?1 AND week_start = ?2",
                params![user_id.to_string(), week_start.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((id, plan_json, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(WorkoutPlan {
            id: parse_uuid(&id)?,
            user_id,
            week_start,
            body: serde_json::from_str(&plan_json)?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    pub fn insert_plan(&self, user_id: Uuid, week_start: NaiveDate, body: &PlanInput) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO workout_plans (id, user_id, week_start, plan_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                user_id.to_string(),
                week_start.to_string(),
                serde_json::to_string(body)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(id)
    }

    /// Remove a plan together with its sessions and their logs; returns the
    /// number of sessions removed
    pub fn delete_plan(&self, plan_id: Uuid) -> Result<usize> {
        let plan_id = plan_id.to_string();
        self.conn.execute(
            "DELETE FROM exercise_logs
             WHERE session_id IN (SELECT id FROM workout_sessions WHERE plan_id = ?1)",
            params![plan_id],
        )?;
        let sessions = self
            .conn
            .execute("DELETE FROM workout_sessions WHERE plan_id = ?1", params![plan_id])?;
        self.conn
            .execute("DELETE FROM workout_plans WHERE id = ?1", params![plan_id])?;
        Ok(sessions)
    }

    // ========== Sessions ==========

    pub fn insert(&self, session: &WorkoutSession) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO workout_sessions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                SESSION_COLUMNS
            ),
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                session.plan_id.map(|id| id.to_string()),
                session.scheduled_date.to_string(),
                session.title,
                session.status.as_str(),
                session.exercises.schema_version(),
                session.exercises.to_json()?,
                session.started_at.map(|t| t.to_rfc3339()),
                session.completed_at.map(|t| t.to_rfc3339()),
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Write back every mutable column of `session`
    pub fn save(&self, session: &WorkoutSession) -> Result<()> {
        self.conn.execute(
            "UPDATE workout_sessions
             SET scheduled_date = ?3, title = ?4, status = ?5, schema_version = ?6,
                 exercises_json = ?7, started_at = ?8, completed_at = ?9
             WHERE id = ?1 AND user_id = ?2",
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                session.scheduled_date.to_string(),
                session.title,
                session.status.as_str(),
                session.exercises.schema_version(),
                session.exercises.to_json()?,
                session.started_at.map(|t| t.to_rfc3339()),
                session.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Session owned by `user_id`; another user's session reads as missing
    pub fn get(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<WorkoutSession>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM workout_sessions WHERE id = ?1 AND user_id = ?2",
                    SESSION_COLUMNS
                ),
                params![session_id.to_string(), user_id.to_string()],
                SessionRow::from_row,
            )
            .optional()?;
        row.map(SessionRow::into_session).transpose()
    }

    /// Status of a session owned by `user_id`
    pub fn status(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<SessionStatus>> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM workout_sessions WHERE id = ?1 AND user_id = ?2",
                params![session_id.to_string(), user_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        status.map(|s| s.parse::<SessionStatus>()).transpose()
    }

    /// Sessions of a plan on one date
    pub fn ids_on_date(&self, user_id: Uuid, plan_id: Uuid, date: NaiveDate) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM workout_sessions WHERE user_id = ?1 AND plan_id = ?2 AND scheduled_date = ?3",
        )?;
        let ids = stmt
            .query_map(
                params![user_id.to_string(), plan_id.to_string(), date.to_string()],
                |row| row.get::<_, String>(0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        ids.iter().map(|id| parse_uuid(id)).collect()
    }

    /// Delete a session after its logs; returns the number of logs removed
    pub fn delete(&self, session_id: Uuid) -> Result<usize> {
        let session_id = session_id.to_string();
        let logs = self
            .conn
            .execute("DELETE FROM exercise_logs WHERE session_id = ?1", params![session_id])?;
        self.conn
            .execute("DELETE FROM workout_sessions WHERE id = ?1", params![session_id])?;
        Ok(logs)
    }

    /// Sessions dated within `start..=end`, earliest first
    pub fn list_between(&self, user_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Vec<WorkoutSession>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM workout_sessions
             WHERE user_id = ?1 AND scheduled_date >= ?2 AND scheduled_date <= ?3
             ORDER BY scheduled_date, created_at",
            SESSION_COLUMNS
        ))?;
        let rows = stmt
            .query_map(
                params![user_id.to_string(), start.to_string(), end.to_string()],
                SessionRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(SessionRow::into_session).collect()
    }

    /// Sessions of a user that reached `completed`, earliest first
    pub fn completed_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT scheduled_date FROM workout_sessions
             WHERE user_id = ?1 AND status = 'completed'
             ORDER BY scheduled_date",
        )?;
        let dates = stmt
            .query_map(params![user_id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        dates.iter().map(|d| parse_date(d)).collect()
    }
}

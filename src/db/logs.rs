//! Per-set exercise log persistence

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::Result;
use crate::workout::ExerciseLog;

use super::{parse_date, parse_timestamp, parse_uuid};

const LOG_COLUMNS: &str =
    "l.id, l.user_id, l.session_id, l.exercise_name, l.set_number, l.weight_kg, l.reps, l.rpe, l.notes, l.logged_at";

struct LogRow {
    id: String,
    user_id: String,
    session_id: String,
    exercise_name: String,
    set_number: u32,
    weight_kg: f64,
    reps: u32,
    rpe: Option<f32>,
    notes: Option<String>,
    logged_at: String,
}

impl LogRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            session_id: row.get(2)?,
            exercise_name: row.get(3)?,
            set_number: row.get(4)?,
            weight_kg: row.get(5)?,
            reps: row.get(6)?,
            rpe: row.get(7)?,
            notes: row.get(8)?,
            logged_at: row.get(9)?,
        })
    }

    fn into_log(self) -> Result<ExerciseLog> {
        Ok(ExerciseLog {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            session_id: parse_uuid(&self.session_id)?,
            exercise_name: self.exercise_name,
            set_number: self.set_number,
            weight_kg: self.weight_kg,
            reps: self.reps,
            rpe: self.rpe,
            notes: self.notes,
            logged_at: parse_timestamp(&self.logged_at)?,
        })
    }
}

/// A logged set together with the date of its session
#[derive(Debug, Clone, PartialEq)]
pub struct DatedLog {
    pub session_date: NaiveDate,
    pub log: ExerciseLog,
}

/// Exercise logs of all users; every read is scoped by `user_id`
pub struct LogStore<'a> {
    conn: &'a Connection,
}

impl<'a> LogStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Set number for the next set of `exercise_name` in the session
    pub fn next_set_number(&self, session_id: Uuid, exercise_name: &str) -> Result<u32> {
        let next = self.conn.query_row(
            "SELECT COALESCE(MAX(set_number), 0) + 1 FROM exercise_logs
             WHERE session_id = ?1 AND exercise_name = ?2",
            params![session_id.to_string(), exercise_name],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    pub fn insert(&self, log: &ExerciseLog) -> Result<()> {
        self.conn.execute(
            "INSERT INTO exercise_logs
             (id, user_id, session_id, exercise_name, set_number, weight_kg, reps, rpe, notes, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.session_id.to_string(),
                log.exercise_name,
                log.set_number,
                log.weight_kg,
                log.reps,
                log.rpe,
                log.notes,
                log.logged_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn save(&self, log: &ExerciseLog) -> Result<()> {
        self.conn.execute(
            "UPDATE exercise_logs SET weight_kg = ?3, reps = ?4, rpe = ?5, notes = ?6
             WHERE id = ?1 AND user_id = ?2",
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.weight_kg,
                log.reps,
                log.rpe,
                log.notes,
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, user_id: Uuid, log_id: Uuid) -> Result<Option<ExerciseLog>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM exercise_logs l WHERE l.id = ?1 AND l.user_id = ?2",
                    LOG_COLUMNS
                ),
                params![log_id.to_string(), user_id.to_string()],
                LogRow::from_row,
            )
            .optional()?;
        row.map(LogRow::into_log).transpose()
    }

    pub fn delete(&self, log_id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM exercise_logs WHERE id = ?1", params![log_id.to_string()])?;
        Ok(())
    }

    /// Sets of one exercise within a session, in set order
    pub fn list_for_session(&self, user_id: Uuid, session_id: Uuid, exercise_name: &str) -> Result<Vec<ExerciseLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM exercise_logs l
             WHERE l.session_id = ?1 AND l.exercise_name = ?2 AND l.user_id = ?3
             ORDER BY l.set_number",
            LOG_COLUMNS
        ))?;
        let rows = stmt
            .query_map(
                params![session_id.to_string(), exercise_name, user_id.to_string()],
                LogRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(LogRow::into_log).collect()
    }

    /// Number of logs attached to a session, whoever owns them
    pub fn count_for_session(&self, session_id: Uuid) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM exercise_logs WHERE session_id = ?1",
            params![session_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Distinct exercise names the user has logged, alphabetical
    pub fn exercise_names(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT exercise_name FROM exercise_logs WHERE user_id = ?1 ORDER BY exercise_name",
        )?;
        let names = stmt
            .query_map(params![user_id.to_string()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Sets of one exercise in sessions dated on or after `since`, oldest first
    pub fn history(&self, user_id: Uuid, exercise_name: &str, since: NaiveDate) -> Result<Vec<DatedLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}, s.scheduled_date FROM exercise_logs l
             JOIN workout_sessions s ON s.id = l.session_id
             WHERE l.user_id = ?1 AND l.exercise_name = ?2 AND s.scheduled_date >= ?3
             ORDER BY s.scheduled_date, l.set_number, l.logged_at",
            LOG_COLUMNS
        ))?;
        let rows = stmt
            .query_map(
                params![user_id.to_string(), exercise_name, since.to_string()],
                |row| Ok((LogRow::from_row(row)?, row.get::<_, String>(10)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(log, date)| {
                Ok(DatedLog {
                    session_date: parse_date(&date)?,
                    log: log.into_log()?,
                })
            })
            .collect()
    }

    /// Most recent sets of one exercise, newest first
    pub fn recent(&self, user_id: Uuid, exercise_name: &str, limit: usize) -> Result<Vec<ExerciseLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM exercise_logs l
             WHERE l.user_id = ?1 AND l.exercise_name = ?2
             ORDER BY l.logged_at DESC, l.rowid DESC
             LIMIT ?3",
            LOG_COLUMNS
        ))?;
        let rows = stmt
            .query_map(
                params![user_id.to_string(), exercise_name, limit as i64],
                LogRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(LogRow::into_log).collect()
    }

    /// Every set the user has logged, oldest first
    pub fn all_for_user(&self, user_id: Uuid) -> Result<Vec<DatedLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}, s.scheduled_date FROM exercise_logs l
             JOIN workout_sessions s ON s.id = l.session_id
             WHERE l.user_id = ?1
             ORDER BY s.scheduled_date, l.logged_at",
            LOG_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok((LogRow::from_row(row)?, row.get::<_, String>(10)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(log, date)| {
                Ok(DatedLog {
                    session_date: parse_date(&date)?,
                    log: log.into_log()?,
                })
            })
            .collect()
    }
}

//! Session lifecycle and per-set logging

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::{Database, LogStore, SessionStore, SqliteCatalog};
use crate::error::{CoachError, Result};
use crate::resolver::NameResolver;
use crate::workout::{ExerciseLog, NewSet, SetUpdate, WorkoutSession};

/// Starts and completes sessions and records the sets performed in them
pub struct Tracker<'a> {
    db: &'a mut Database,
}

impl<'a> Tracker<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// scheduled → in_progress, stamping `started_at`
    pub fn start_session(&mut self, user_id: Uuid, session_id: Uuid) -> Result<WorkoutSession> {
        self.transition(user_id, session_id, |session| session.start(Utc::now()))
    }

    /// in_progress → completed, stamping `completed_at`
    pub fn complete_session(&mut self, user_id: Uuid, session_id: Uuid) -> Result<WorkoutSession> {
        self.transition(user_id, session_id, |session| session.complete(Utc::now()))
    }

    fn transition<F>(&mut self, user_id: Uuid, session_id: Uuid, apply: F) -> Result<WorkoutSession>
    where
        F: FnOnce(&mut WorkoutSession) -> Result<()>,
    {
        let tx = self.db.transaction()?;
        let store = SessionStore::new(&tx);

        let mut session = store
            .get(user_id, session_id)?
            .ok_or(CoachError::NotFound("Session"))?;
        apply(&mut session)?;
        store.save(&session)?;
        tx.commit()?;

        info!(user_id = %user_id, session_id = %session_id, status = %session.status, "Session status changed");
        Ok(session)
    }

    /// Record one set against a running session
    pub fn log_set(&mut self, user_id: Uuid, session_id: Uuid, set: &NewSet) -> Result<ExerciseLog> {
        let tx = self.db.transaction()?;
        let sessions = SessionStore::new(&tx);
        let logs = LogStore::new(&tx);

        sessions
            .status(user_id, session_id)?
            .ok_or(CoachError::NotFound("Session"))?
            .ensure_accepts_logs()?;

        let catalog = SqliteCatalog::new(&tx);
        let exercise_name = NameResolver::new(&catalog).resolve(&set.exercise_name)?;
        let set_number = logs.next_set_number(session_id, &exercise_name)?;

        let log = ExerciseLog {
            id: Uuid::new_v4(),
            user_id,
            session_id,
            exercise_name,
            set_number,
            weight_kg: set.weight_kg,
            reps: set.reps,
            rpe: set.rpe,
            notes: set.notes.clone(),
            logged_at: Utc::now(),
        };
        logs.insert(&log)?;
        tx.commit()?;

        info!(
            user_id = %user_id,
            session_id = %session_id,
            exercise = %log.exercise_name,
            set_number,
            weight_kg = log.weight_kg,
            reps = log.reps,
            "Set logged"
        );
        Ok(log)
    }

    /// Sets of one exercise in a session, in order; any session status
    pub fn list_sets(&self, user_id: Uuid, session_id: Uuid, exercise_name: &str) -> Result<Vec<ExerciseLog>> {
        let conn = self.db.connection();
        if SessionStore::new(conn).status(user_id, session_id)?.is_none() {
            return Err(CoachError::NotFound("Session"));
        }

        let catalog = SqliteCatalog::new(conn);
        let name = NameResolver::new(&catalog)
            .lookup(exercise_name)?
            .map(|r| r.name)
            .unwrap_or_else(|| exercise_name.trim().to_string());

        LogStore::new(conn).list_for_session(user_id, session_id, &name)
    }

    pub fn update_set(&mut self, user_id: Uuid, log_id: Uuid, update: SetUpdate) -> Result<ExerciseLog> {
        let tx = self.db.transaction()?;
        let logs = LogStore::new(&tx);

        let mut log = logs
            .get(user_id, log_id)?
            .ok_or(CoachError::NotFound("Exercise log"))?;
        if update.is_empty() {
            return Err(CoachError::NoFields);
        }
        ensure_session_running(&tx, user_id, log.session_id)?;

        if let Some(weight_kg) = update.weight_kg {
            log.weight_kg = weight_kg;
        }
        if let Some(reps) = update.reps {
            log.reps = reps;
        }
        if let Some(rpe) = update.rpe {
            log.rpe = Some(rpe);
        }
        if let Some(notes) = update.notes {
            log.notes = Some(notes);
        }

        logs.save(&log)?;
        tx.commit()?;
        Ok(log)
    }

    pub fn delete_set(&mut self, user_id: Uuid, log_id: Uuid) -> Result<()> {
        let tx = self.db.transaction()?;
        let logs = LogStore::new(&tx);

        let log = logs
            .get(user_id, log_id)?
            .ok_or(CoachError::NotFound("Exercise log"))?;
        ensure_session_running(&tx, user_id, log.session_id)?;

        logs.delete(log_id)?;
        tx.commit()?;
        info!(user_id = %user_id, log_id = %log_id, "Set deleted");
        Ok(())
    }
}

fn ensure_session_running(conn: &rusqlite::Connection, user_id: Uuid, session_id: Uuid) -> Result<()> {
    SessionStore::new(conn)
        .status(user_id, session_id)?
        .ok_or(CoachError::NotFound("Session"))?
        .ensure_accepts_logs()
}

//! Weekly plan scheduling
//!
//! A plan is saved per user and week. Saving again for the same week
//! replaces the previous plan and every session it produced; adding a single
//! day replaces only that day. Exercise names are canonicalised through the
//! resolver before anything is stored.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DeletePolicy;
use crate::db::{Database, SessionStore, SqliteCatalog};
use crate::error::{CoachError, Result};
use crate::resolver::{ExerciseCatalog, NameResolver};
use crate::workout::day::{date_in_week, week_end};
use crate::workout::{
    PlanInput, SessionExercises, SessionInput, SessionStatus, SessionUpdate, WorkoutPlan,
    WorkoutSession, parse_day,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPlan {
    pub plan_id: Uuid,
    pub sessions_created: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedSession {
    pub session_id: Uuid,
    pub scheduled_date: NaiveDate,
}

/// Plan and session mutations for one unit of work
pub struct Scheduler<'a> {
    db: &'a mut Database,
    delete_policy: DeletePolicy,
}

impl<'a> Scheduler<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Replace the user's plan for `week_start` with `plan`.
    ///
    /// Sessions whose day label is not a weekday name are dropped; the
    /// returned count tells the caller how many were kept.
    pub fn save_plan(&mut self, user_id: Uuid, week_start: NaiveDate, plan: &PlanInput) -> Result<SavedPlan> {
        let tx = self.db.transaction()?;
        let store = SessionStore::new(&tx);
        let catalog = SqliteCatalog::new(&tx);
        let resolver = NameResolver::new(&catalog);

        if let Some(previous) = store.find_plan_id(user_id, week_start)? {
            let removed = store.delete_plan(previous)?;
            debug!(user_id = %user_id, %week_start, removed, "Replaced previous plan");
        }

        let plan_id = store.insert_plan(user_id, week_start, plan)?;
        let mut sessions_created = 0;

        for input in &plan.sessions {
            let Some(day) = parse_day(&input.day) else {
                warn!(user_id = %user_id, day = %input.day, "Skipping session with unrecognized day");
                continue;
            };

            let session = build_session(
                &resolver,
                user_id,
                plan_id,
                date_in_week(week_start, day)?,
                input,
            )?;
            store.insert(&session)?;
            sessions_created += 1;
        }

        tx.commit()?;
        info!(
            user_id = %user_id,
            %week_start,
            %plan_id,
            sessions_created,
            submitted = plan.sessions.len(),
            "Plan saved"
        );

        Ok(SavedPlan {
            plan_id,
            sessions_created,
        })
    }

    /// Add or replace one day of the week's plan, leaving other days alone
    pub fn add_session_to_week(&mut self, user_id: Uuid, week_start: NaiveDate, input: &SessionInput) -> Result<AddedSession> {
        let day = parse_day(&input.day).ok_or_else(|| CoachError::InvalidDay(input.day.clone()))?;
        let scheduled_date = date_in_week(week_start, day)?;

        let tx = self.db.transaction()?;
        let store = SessionStore::new(&tx);
        let catalog = SqliteCatalog::new(&tx);
        let resolver = NameResolver::new(&catalog);

        let plan_id = match store.find_plan_id(user_id, week_start)? {
            Some(id) => id,
            None => store.insert_plan(user_id, week_start, &PlanInput::default())?,
        };

        for existing in store.ids_on_date(user_id, plan_id, scheduled_date)? {
            let logs = store.delete(existing)?;
            debug!(session_id = %existing, logs, "Replaced session on the same day");
        }

        let session = build_session(&resolver, user_id, plan_id, scheduled_date, input)?;
        store.insert(&session)?;
        tx.commit()?;

        info!(user_id = %user_id, session_id = %session.id, %scheduled_date, "Session added to week");
        Ok(AddedSession {
            session_id: session.id,
            scheduled_date,
        })
    }

    /// Apply a partial update; exercise names are resolved again
    pub fn update_session(&mut self, user_id: Uuid, session_id: Uuid, update: SessionUpdate) -> Result<WorkoutSession> {
        let tx = self.db.transaction()?;
        let store = SessionStore::new(&tx);

        let mut session = store
            .get(user_id, session_id)?
            .ok_or(CoachError::NotFound("Session"))?;
        if update.is_empty() {
            return Err(CoachError::NoFields);
        }

        if let Some(title) = update.title {
            session.title = title;
        }
        if let Some(date) = update.scheduled_date {
            session.scheduled_date = date;
        }
        if let Some(mut exercises) = update.exercises {
            let catalog = SqliteCatalog::new(&tx);
            canonicalize(&NameResolver::new(&catalog), &mut exercises)?;
            session.exercises = exercises;
        }

        store.save(&session)?;
        tx.commit()?;

        info!(user_id = %user_id, session_id = %session_id, "Session updated");
        Ok(session)
    }

    /// Delete a session and its logs, subject to the delete policy
    pub fn delete_session(&mut self, user_id: Uuid, session_id: Uuid) -> Result<Uuid> {
        let tx = self.db.transaction()?;
        let store = SessionStore::new(&tx);

        let status = store
            .status(user_id, session_id)?
            .ok_or(CoachError::NotFound("Session"))?;
        if !self.delete_policy.permits(status) {
            return Err(CoachError::NotDeletable(status));
        }

        let logs = store.delete(session_id)?;
        tx.commit()?;

        info!(user_id = %user_id, session_id = %session_id, %status, logs, "Session deleted");
        Ok(session_id)
    }

    pub fn get_session(&self, user_id: Uuid, session_id: Uuid) -> Result<WorkoutSession> {
        SessionStore::new(self.db.connection())
            .get(user_id, session_id)?
            .ok_or(CoachError::NotFound("Session"))
    }

    pub fn get_plan(&self, user_id: Uuid, week_start: NaiveDate) -> Result<Option<WorkoutPlan>> {
        SessionStore::new(self.db.connection()).get_plan(user_id, week_start)
    }

    /// Sessions in the seven days starting at `week_start`
    pub fn list_week(&self, user_id: Uuid, week_start: NaiveDate) -> Result<Vec<WorkoutSession>> {
        self.planned_workouts(user_id, week_start, week_end(week_start)?)
    }

    /// Sessions dated within `start..=end`
    pub fn planned_workouts(&self, user_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Vec<WorkoutSession>> {
        SessionStore::new(self.db.connection()).list_between(user_id, start, end)
    }
}

fn build_session<C: ExerciseCatalog + ?Sized>(
    resolver: &NameResolver<'_, C>,
    user_id: Uuid,
    plan_id: Uuid,
    scheduled_date: NaiveDate,
    input: &SessionInput,
) -> Result<WorkoutSession> {
    let mut exercises = input.exercises.clone();
    canonicalize(resolver, &mut exercises)?;

    Ok(WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        plan_id: Some(plan_id),
        scheduled_date,
        title: input.title.clone(),
        status: SessionStatus::Scheduled,
        exercises,
        started_at: None,
        completed_at: None,
        created_at: Utc::now(),
    })
}

/// Replace every exercise name with its canonical form
fn canonicalize<C: ExerciseCatalog + ?Sized>(
    resolver: &NameResolver<'_, C>,
    exercises: &mut SessionExercises,
) -> Result<()> {
    for entry in exercises.entries_mut() {
        entry.name = resolver.resolve(&entry.name)?;
    }
    Ok(())
}

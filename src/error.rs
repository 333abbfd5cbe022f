//! Error types shared by the catalog, scheduler and tracker

use thiserror::Error;

use crate::workout::SessionStatus;

/// Failures raised by the coaching core.
///
/// Every variant is scoped to a single call; none of them is fatal to the
/// process. `NotFound` covers both "does not exist" and "belongs to another
/// user" so that callers cannot detect other users' records.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Cannot {action} session with status '{status}'")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("Session is not in progress (status '{0}')")]
    SessionNotInProgress(SessionStatus),

    #[error("No valid fields to update")]
    NoFields,

    #[error("Cannot delete a session with status '{0}'. Only scheduled sessions can be deleted")]
    NotDeletable(SessionStatus),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Training objective is {0} characters; at most 1000 are allowed")]
    ObjectiveTooLong(usize),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, CoachError>;

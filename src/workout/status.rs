use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// Lifecycle of a workout session: scheduled → in_progress → completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }

    /// Status after starting; only a scheduled session can start
    pub fn start(self) -> Result<Self> {
        match self {
            SessionStatus::Scheduled => Ok(SessionStatus::InProgress),
            status => Err(CoachError::InvalidTransition {
                action: "start",
                status,
            }),
        }
    }

    /// Status after completing; only a running session can complete
    pub fn complete(self) -> Result<Self> {
        match self {
            SessionStatus::InProgress => Ok(SessionStatus::Completed),
            status => Err(CoachError::InvalidTransition {
                action: "complete",
                status,
            }),
        }
    }

    /// Sets may only be logged, edited or removed while the session runs
    pub fn ensure_accepts_logs(self) -> Result<()> {
        match self {
            SessionStatus::InProgress => Ok(()),
            status => Err(CoachError::SessionNotInProgress(status)),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(CoachError::Corrupt(format!("unknown session status '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        let running = SessionStatus::Scheduled.start().unwrap();
        assert_eq!(running, SessionStatus::InProgress);
        assert_eq!(running.complete().unwrap(), SessionStatus::Completed);
    }

    #[test]
    fn test_no_skipping_or_rewinding() {
        assert!(matches!(
            SessionStatus::Scheduled.complete(),
            Err(CoachError::InvalidTransition { action: "complete", status: SessionStatus::Scheduled })
        ));
        assert!(SessionStatus::InProgress.start().is_err());
        assert!(SessionStatus::Completed.start().is_err());
        assert!(SessionStatus::Completed.complete().is_err());
    }

    #[test]
    fn test_only_running_sessions_accept_logs() {
        assert!(SessionStatus::InProgress.ensure_accepts_logs().is_ok());
        assert!(matches!(
            SessionStatus::Completed.ensure_accepts_logs(),
            Err(CoachError::SessionNotInProgress(SessionStatus::Completed))
        ));
        assert!(SessionStatus::Scheduled.ensure_accepts_logs().is_err());
    }

    #[test]
    fn test_text_round_trip() {
        for status in [
            SessionStatus::Scheduled,
            SessionStatus::InProgress,
            SessionStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("paused".parse::<SessionStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&SessionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}

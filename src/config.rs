//! Runtime settings

use std::path::PathBuf;

use clap::ValueEnum;

use crate::workout::SessionStatus;

pub const DEFAULT_DB_PATH: &str = "gymcoach.db";

/// Which sessions may be deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DeletePolicy {
    /// Any status; logs go with the session
    #[default]
    Unconditional,
    /// Only sessions that have not started
    ScheduledOnly,
}

impl DeletePolicy {
    pub fn permits(self, status: SessionStatus) -> bool {
        match self {
            DeletePolicy::Unconditional => true,
            DeletePolicy::ScheduledOnly => status == SessionStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub delete_policy: DeletePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            delete_policy: DeletePolicy::default(),
        }
    }
}

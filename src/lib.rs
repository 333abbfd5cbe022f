//! gymcoach - Workout planning core for a conversational fitness coach
//!
//! Resolves free-text exercise names against a shared catalog, turns weekly
//! plans into dated sessions and tracks the sets logged while training.

pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod profile;
pub mod progress;
pub mod resolver;
pub mod schedule;
pub mod tracking;
pub mod workout;

pub use config::{DeletePolicy, Settings};
pub use db::Database;
pub use error::{CoachError, Result};
pub use profile::Profiles;
pub use resolver::NameResolver;
pub use schedule::Scheduler;
pub use tracking::Tracker;

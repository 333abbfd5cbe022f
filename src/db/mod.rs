//! Database module - SQLite storage for the catalog, plans, sessions and logs

pub mod catalog;
pub mod logs;
pub mod profiles;
pub mod schema;
pub mod sessions;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoachError, Result};
use crate::resolver::trigram;
use schema::{CURRENT_VERSION, SCHEMA, SCHEMA_V2, SCHEMA_VERSION_TABLE};

pub use catalog::{SearchHit, SqliteCatalog};
pub use logs::{DatedLog, LogStore};
pub use profiles::ProfileStore;
pub use sessions::SessionStore;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

        let db = Self { conn };
        db.initialize()?;
        debug!(path = %path.as_ref().display(), "Database opened");
        Ok(db)
    }

    /// Open an in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        register_similarity(&self.conn)?;

        self.conn.execute_batch(SCHEMA_VERSION_TABLE)?;
        let version = self.schema_version()?;
        if version < CURRENT_VERSION {
            self.migrate(version)?;
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }

    fn migrate(&self, from_version: i32) -> Result<()> {
        if from_version < 1 {
            self.conn.execute_batch(SCHEMA)?;
            self.record_version(1)?;
        }
        if from_version < 2 {
            self.conn.execute_batch(SCHEMA_V2)?;
            self.record_version(2)?;
        }

        info!(from = from_version, to = CURRENT_VERSION, "Database migrated");
        Ok(())
    }

    fn record_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![version, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction; the write lock is taken immediately so
    /// concurrent writers queue behind the busy timeout
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    pub fn catalog(&self) -> SqliteCatalog<'_> {
        SqliteCatalog::new(&self.conn)
    }

    /// Insert the built-in catalog; returns how many exercises were new
    pub fn seed_catalog(&mut self) -> Result<usize> {
        let tx = self.transaction()?;
        let inserted = SqliteCatalog::new(&tx).seed()?;
        tx.commit()?;
        info!(inserted, "Exercise catalog seeded");
        Ok(inserted)
    }
}

/// Expose trigram similarity to SQL as `similarity(a, b)`
fn register_similarity(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "similarity",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let a: Option<String> = ctx.get(0)?;
            let b: Option<String> = ctx.get(1)?;
            Ok(match (a, b) {
                (Some(a), Some(b)) => trigram::similarity(&a, &b),
                _ => 0.0,
            })
        },
    )?;
    Ok(())
}

pub(crate) fn parse_uuid(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text).map_err(|e| CoachError::Corrupt(format!("bad id '{}': {}", text, e)))
}

pub(crate) fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| CoachError::Corrupt(format!("bad date '{}': {}", text, e)))
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| CoachError::Corrupt(format!("bad timestamp '{}': {}", text, e)))
}

pub(crate) fn parse_optional_timestamp(text: Option<String>) -> Result<Option<DateTime<Utc>>> {
    text.as_deref().map(parse_timestamp).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), CURRENT_VERSION);

        let tables: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('exercises', 'exercise_aliases', 'workout_plans', 'workout_sessions', 'exercise_logs', 'profiles')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.seed_catalog().unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), CURRENT_VERSION);
        assert!(db.catalog().count().unwrap() > 0);
    }

    #[test]
    fn test_version_one_database_gains_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA_VERSION_TABLE).unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (1, '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), 2);
        let profiles: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profiles, 0);
    }

    #[test]
    fn test_similarity_available_in_sql() {
        let db = Database::open_in_memory().unwrap();
        let score: f64 = db
            .connection()
            .query_row("SELECT similarity('Lat Pulldown', 'lat pulldown')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(score, 1.0);

        let null_score: f64 = db
            .connection()
            .query_row("SELECT similarity(NULL, 'squat')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null_score, 0.0);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = Database::open_in_memory().unwrap();
        let result = db.connection().execute(
            "INSERT INTO exercise_logs (id, user_id, session_id, exercise_name, set_number, weight_kg, reps, logged_at)
             VALUES ('l', 'u', 'missing-session', 'Squat', 1, 100.0, 5, '2026-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_catalog_twice_inserts_once() {
        let mut db = Database::open_in_memory().unwrap();
        let first = db.seed_catalog().unwrap();
        assert_eq!(first, crate::exercises::SEED_EXERCISES.len());
        assert_eq!(db.seed_catalog().unwrap(), 0);
    }

    #[test]
    fn test_parse_helpers_reject_garbage() {
        assert!(matches!(parse_uuid("nope"), Err(CoachError::Corrupt(_))));
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert_eq!(parse_optional_timestamp(None).unwrap(), None);
    }
}

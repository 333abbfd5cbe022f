//! SQLite-backed exercise catalog

use std::str::FromStr;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::exercises::{Category, Equipment, Exercise, MuscleGroup, SEED_EXERCISES};
use crate::resolver::{Candidate, ExerciseCatalog};

/// Minimum similarity for free-text catalog search
pub const SEARCH_THRESHOLD: f64 = 0.10;

/// Catalog search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub muscle_group: Option<MuscleGroup>,
    pub category: Option<Category>,
    pub equipment: Option<Equipment>,
    pub similarity: f64,
}

/// Catalog queries over a connection or an open transaction
pub struct SqliteCatalog<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCatalog<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert every built-in exercise that is not present yet
    pub fn seed(&self) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0;

        for exercise in SEED_EXERCISES {
            let changed = self.conn.execute(
                "INSERT OR IGNORE INTO exercises (name, name_key, muscle_group, category, equipment, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    exercise.name,
                    exercise.name.to_lowercase(),
                    exercise.muscle_group.as_str(),
                    exercise.category.as_str(),
                    exercise.equipment.as_str(),
                    now,
                ],
            )?;
            if changed == 0 {
                continue;
            }

            let id = self.conn.last_insert_rowid();
            for alias in exercise.aliases {
                self.add_alias(id, alias)?;
            }
            inserted += 1;
        }

        Ok(inserted)
    }

    pub fn add_alias(&self, exercise_id: i64, alias: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO exercise_aliases (exercise_id, alias, alias_key) VALUES (?1, ?2, ?3)",
            params![exercise_id, alias.trim(), alias.trim().to_lowercase()],
        )?;
        Ok(())
    }

    /// Full catalog row, looked up by canonical name
    pub fn get(&self, name: &str) -> Result<Option<Exercise>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, muscle_group, category, equipment FROM exercises WHERE name_key = ?1",
                params![name.trim().to_lowercase()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, muscle_group, category, equipment)) = row else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT alias FROM exercise_aliases WHERE exercise_id = ?1 ORDER BY rowid")?;
        let aliases = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(Some(Exercise {
            id,
            name,
            aliases,
            muscle_group: classify(muscle_group),
            category: classify(category),
            equipment: classify(equipment),
        }))
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Muscle group recorded for the exercise, if it is classified
    pub fn muscle_group_of(&self, name: &str) -> Result<Option<MuscleGroup>> {
        let stored: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT muscle_group FROM exercises WHERE name_key = ?1",
                params![name.trim().to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(classify(stored.flatten()))
    }

    /// Free-text search, best match first
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, muscle_group, category, equipment, score FROM (
                 SELECT name, muscle_group, category, equipment, similarity(name, ?1) AS score
                 FROM exercises
             )
             WHERE score >= ?2
             ORDER BY score DESC, name ASC
             LIMIT ?3",
        )?;

        let rows = stmt
            .query_map(params![query.trim(), SEARCH_THRESHOLD, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .map(|(name, muscle_group, category, equipment, score)| SearchHit {
                name,
                muscle_group: classify(muscle_group),
                category: classify(category),
                equipment: classify(equipment),
                similarity: (score * 100.0).round() / 100.0,
            })
            .collect())
    }
}

impl ExerciseCatalog for SqliteCatalog<'_> {
    fn find_by_name(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT name FROM exercises WHERE name_key = ?1",
                params![name.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn find_by_alias(&self, alias: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT e.name FROM exercise_aliases a
                 JOIN exercises e ON e.id = a.exercise_id
                 WHERE a.alias_key = ?1
                 ORDER BY e.id
                 LIMIT 1",
                params![alias.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn similar(&self, query: &str, min_similarity: f64, limit: usize) -> Result<Vec<Candidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, muscle_group, score FROM (
                 SELECT name, muscle_group, similarity(name, ?1) AS score FROM exercises
             )
             WHERE score >= ?2
             ORDER BY score DESC, name ASC
             LIMIT ?3",
        )?;

        let rows = stmt
            .query_map(params![query, min_similarity, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .map(|(name, muscle_group, similarity)| Candidate {
                name,
                muscle_group: classify(muscle_group),
                similarity,
            })
            .collect())
    }

    fn register(&self, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO exercises (name, name_key, created_at) VALUES (?1, ?2, ?3)",
            params![name, name.to_lowercase(), Utc::now().to_rfc3339()],
        )?;
        Ok(changed == 1)
    }
}

/// Parse a stored classification; values outside the vocabulary read as unset
fn classify<T: FromStr>(stored: Option<String>) -> Option<T> {
    let text = stored?;
    match text.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(value = %text, "Ignoring unknown catalog classification");
            None
        }
    }
}

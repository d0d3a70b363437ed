//! SQLite-based session log and key-value storage.
//!
//! Provides persistent storage for:
//! - Completed clinical sessions and breathing runs
//! - Session statistics (daily and all-time)
//! - Key-value store for engine snapshots and widget state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, KvStore};
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Clinical,
    Breathing,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Clinical => "clinical",
            SessionKind::Breathing => "breathing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub kind: String,
    pub label: String,
    pub duration_secs: u64,
    pub extended_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_clinical_min: u64,
    pub total_breathing_min: u64,
    pub today_sessions: u64,
    pub today_clinical_min: u64,
}

/// SQLite database for the session log and the kv table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/sessionflow/sessionflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?
            .join("sessionflow.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path (tests use a temp dir).
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    kind          TEXT NOT NULL,
                    label         TEXT NOT NULL DEFAULT '',
                    duration_secs INTEGER NOT NULL,
                    extended_min  INTEGER NOT NULL DEFAULT 0,
                    started_at    TEXT NOT NULL,
                    completed_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
                CREATE INDEX IF NOT EXISTS idx_sessions_kind ON sessions(kind);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        kind: SessionKind,
        label: &str,
        duration_secs: u64,
        extended_min: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO sessions (kind, label, duration_secs, extended_min, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                kind.as_str(),
                label,
                duration_secs,
                extended_min,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, label, duration_secs, extended_min, started_at, completed_at
             FROM sessions ORDER BY completed_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, u64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, kind, label, duration_secs, extended_min, started_at, completed_at) = row?;
            records.push(SessionRecord {
                id,
                kind,
                label,
                duration_secs,
                extended_min,
                started_at: parse_timestamp(&started_at),
                completed_at: parse_timestamp(&completed_at),
            });
        }
        Ok(records)
    }

    pub fn stats_all(&self) -> Result<Stats, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             GROUP BY kind",
        )?;

        let mut stats = Stats::default();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (kind, count, secs) = row?;
            stats.total_sessions += count;
            match kind.as_str() {
                "clinical" => stats.total_clinical_min += secs / 60,
                "breathing" => stats.total_breathing_min += secs / 60,
                _ => {}
            }
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stmt2 = self.conn.prepare(
            "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             WHERE kind = 'clinical' AND completed_at >= ?1",
        )?;
        let row = stmt2.query_row(params![format!("{today}T00:00:00+00:00")], |row| {
            Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?))
        })?;
        stats.today_sessions = row.0;
        stats.today_clinical_min = row.1 / 60;

        Ok(stats)
    }

    pub fn stats_today(&self) -> Result<Stats, StorageError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             WHERE completed_at >= ?1
             GROUP BY kind",
        )?;

        let mut stats = Stats::default();
        let rows = stmt.query_map(params![format!("{today}T00:00:00+00:00")], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (kind, count, secs) = row?;
            stats.total_sessions += count;
            match kind.as_str() {
                "clinical" => {
                    stats.total_clinical_min += secs / 60;
                    stats.today_sessions += count;
                    stats.today_clinical_min += secs / 60;
                }
                "breathing" => stats.total_breathing_min += secs / 60,
                _ => {}
            }
        }
        Ok(stats)
    }

    fn kv_get_raw(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn kv_set_raw(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KvStore for Database {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get_raw(key)?)
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set_raw(key, value)?)
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_count_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionKind::Clinical, "Dana", 2700, 10, now, now)
            .unwrap();
        db.record_session(SessionKind::Breathing, "4-7-8", 76, 0, now, now)
            .unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_clinical_min, 45);
        assert_eq!(stats.total_breathing_min, 1);
        assert_eq!(stats.today_sessions, 1);
    }

    #[test]
    fn stats_today_counts_todays_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionKind::Clinical, "", 3600, 0, now, now)
            .unwrap();

        let stats = db.stats_today().unwrap();
        assert_eq!(stats.today_sessions, 1);
        assert_eq!(stats.today_clinical_min, 60);
    }

    #[test]
    fn recent_sessions_preserve_fields() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionKind::Clinical, "Dana", 2400, 5, now, now)
            .unwrap();

        let records = db.recent_sessions(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "clinical");
        assert_eq!(records[0].label, "Dana");
        assert_eq!(records[0].duration_secs, 2400);
        assert_eq!(records[0].extended_min, 5);
    }

    #[test]
    fn kv_roundtrip_and_overwrite() {
        let mut db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);

        db.kv_set("engine", "{\"a\":1}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().as_deref(), Some("{\"a\":1}"));

        db.kv_set("engine", "{\"a\":2}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().as_deref(), Some("{\"a\":2}"));
    }
}

// src/db.rs

use crate::error::MinerError;
use crate::model::{Checkpoint, MatchRecord};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed persistence: the append-only match table and the
/// one-row-per-repository checkpoint table.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Database, MinerError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Database, MinerError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Database, MinerError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS commit_analysis (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_name TEXT,
                commit_hash TEXT,
                commit_timestamp TEXT,
                author TEXT,
                affected_files TEXT,
                found_keywords TEXT,
                commit_type TEXT,
                commit_number INTEGER
            );
            CREATE TABLE IF NOT EXISTS checkpoint (
                repo_name TEXT PRIMARY KEY,
                last_commit TEXT NOT NULL,
                total_time REAL NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;
        Ok(Database { conn })
    }

    /// Append one match record. Never updates or deletes; restarts that
    /// reprocess a commit will append again, which is acceptable because
    /// the checkpoint advances after every processed commit.
    pub fn append_match(
        &self,
        record: &MatchRecord,
        sequence_number: u32,
    ) -> Result<(), MinerError> {
        self.conn.execute(
            "INSERT INTO commit_analysis
             (project_name, commit_hash, commit_timestamp, author,
              affected_files, found_keywords, commit_type, commit_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.repo,
                record.commit_hash,
                record.timestamp.to_rfc3339(),
                record.author,
                serde_json::to_string(&record.affected_files)?,
                serde_json::to_string(&record.matched_keywords)?,
                record.category.label(),
                sequence_number,
            ],
        )?;
        Ok(())
    }

    /// Upsert the cursor for one repository. At most one row per
    /// repository name exists at any time.
    pub fn save_checkpoint(
        &self,
        repo: &str,
        last_commit: &str,
        total_time: f64,
    ) -> Result<(), MinerError> {
        self.conn.execute(
            "INSERT INTO checkpoint (repo_name, last_commit, total_time, updated_at)
             VALUES (?1, ?2, ?3,
                     (SELECT IFNULL(MAX(updated_at), 0) + 1 FROM checkpoint))
             ON CONFLICT(repo_name) DO UPDATE SET
                 last_commit = excluded.last_commit,
                 total_time = excluded.total_time,
                 updated_at = excluded.updated_at",
            params![repo, last_commit, total_time],
        )?;
        Ok(())
    }

    /// Cursor for one repository, if a previous run recorded one.
    pub fn load_checkpoint(&self, repo: &str) -> Result<Option<Checkpoint>, MinerError> {
        let row = self
            .conn
            .query_row(
                "SELECT repo_name, last_commit, total_time
                 FROM checkpoint WHERE repo_name = ?1",
                params![repo],
                |row| {
                    Ok(Checkpoint {
                        repo: row.get(0)?,
                        last_commit: row.get(1)?,
                        total_time: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Read-only access to the underlying connection, for reporting
    /// queries and tests.
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    /// Most recently written cursor across all repositories; this names
    /// the repository an interrupted run was working on.
    pub fn latest_checkpoint(&self) -> Result<Option<Checkpoint>, MinerError> {
        let row = self
            .conn
            .query_row(
                "SELECT repo_name, last_commit, total_time
                 FROM checkpoint ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| {
                    Ok(Checkpoint {
                        repo: row.get(0)?,
                        last_commit: row.get(1)?,
                        total_time: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn record(repo: &str, hash: &str) -> MatchRecord {
        MatchRecord {
            repo: repo.to_string(),
            commit_hash: hash.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            author: "Ada".to_string(),
            affected_files: BTreeSet::from(["scorer.py".to_string()]),
            matched_keywords: BTreeSet::from(["fairness".to_string()]),
            category: Category::BugFixing,
        }
    }

    #[test]
    fn match_rows_append_and_keep_json_columns() {
        let db = Database::open_in_memory().unwrap();
        db.append_match(&record("demo", "a1"), 1).unwrap();
        db.append_match(&record("demo", "a1"), 1).unwrap(); // duplicates allowed

        let (count, files, keywords, commit_type): (i64, String, String, String) = db
            .conn
            .query_row(
                "SELECT COUNT(*),
                        MAX(affected_files), MAX(found_keywords), MAX(commit_type)
                 FROM commit_analysis",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(files, r#"["scorer.py"]"#);
        assert_eq!(keywords, r#"["fairness"]"#);
        assert_eq!(commit_type, "Bug Fixing");
    }

    #[test]
    fn checkpoint_is_a_single_row_per_repo() {
        let db = Database::open_in_memory().unwrap();
        for (i, hash) in ["h1", "h2", "h3"].iter().enumerate() {
            db.save_checkpoint("demo", hash, i as f64).unwrap();
        }
        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM checkpoint", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let cp = db.load_checkpoint("demo").unwrap().unwrap();
        assert_eq!(cp.last_commit, "h3");
        assert_eq!(cp.total_time, 2.0);
    }

    #[test]
    fn load_is_keyed_by_repo_name() {
        let db = Database::open_in_memory().unwrap();
        db.save_checkpoint("alpha", "a9", 1.0).unwrap();
        db.save_checkpoint("beta", "b7", 2.0).unwrap();

        assert_eq!(
            db.load_checkpoint("alpha").unwrap().unwrap().last_commit,
            "a9"
        );
        assert_eq!(
            db.load_checkpoint("beta").unwrap().unwrap().last_commit,
            "b7"
        );
        assert!(db.load_checkpoint("gamma").unwrap().is_none());
    }

    #[test]
    fn latest_checkpoint_tracks_the_newest_write() {
        let db = Database::open_in_memory().unwrap();
        db.save_checkpoint("alpha", "a1", 1.0).unwrap();
        db.save_checkpoint("beta", "b1", 2.0).unwrap();
        db.save_checkpoint("alpha", "a2", 3.0).unwrap();

        let latest = db.latest_checkpoint().unwrap().unwrap();
        assert_eq!(latest.repo, "alpha");
        assert_eq!(latest.last_commit, "a2");
    }

    #[test]
    fn empty_database_has_no_checkpoint() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.latest_checkpoint().unwrap().is_none());
    }
}

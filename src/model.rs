// src/model.rs

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// One entry of the repository catalog. Identity is `name`; the catalog
/// order defines processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    /// Remote URL or local path of the repository
    pub location: String,
}

/// A single file's change within a commit
#[derive(Debug, Clone)]
pub struct ModifiedFile {
    pub path: String,
    /// Unified diff text for this file
    pub diff: String,
}

/// One commit as produced by the stream, oldest-first traversal order
#[derive(Debug, Clone)]
pub struct MinedCommit {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub message: String,
    pub files: Vec<ModifiedFile>,
}

/// Coarse commit-purpose label assigned by first-match keyword scan
/// over the commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    BugFixing,
    NewFeature,
    Enhancement,
    Refactoring,
    Unknown,
}

impl Category {
    /// Label used in the `commit_type` column
    pub fn label(&self) -> &'static str {
        match self {
            Category::BugFixing => "Bug Fixing",
            Category::NewFeature => "New Feature",
            Category::Enhancement => "Enhancement",
            Category::Refactoring => "Refactoring",
            Category::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted outcome for one commit that contained at least one keyword
/// hit in its added/removed diff lines. Immutable once written.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub repo: String,
    pub commit_hash: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub affected_files: BTreeSet<String>,
    pub matched_keywords: BTreeSet<String>,
    pub category: Category,
}

/// Durable per-repository cursor: the last fully processed commit and
/// cumulative wall-clock time spent, one live row per repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub repo: String,
    pub last_commit: String,
    pub total_time: f64,
}

// src/scanner.rs

use crate::classify::classify;
use crate::keywords::KeywordSet;
use crate::model::{MatchRecord, MinedCommit};
use std::collections::BTreeSet;
use tracing::debug;

/// Scans a commit's diffs for keyword hits on added/removed lines.
/// Holds the keyword set for the whole run; one scanner per run.
pub struct DiffScanner<'a> {
    keywords: &'a KeywordSet,
}

impl<'a> DiffScanner<'a> {
    pub fn new(keywords: &'a KeywordSet) -> DiffScanner<'a> {
        DiffScanner { keywords }
    }

    /// Scan every line of every modified file. Only lines carrying added
    /// or removed content count; `+++`/`---` file headers do not. The
    /// first keyword hit in a line records the file and the keyword and
    /// ends that line's scan. A commit with no hits yields None.
    pub fn scan(&self, repo: &str, commit: &MinedCommit) -> Option<MatchRecord> {
        let mut affected_files = BTreeSet::new();
        let mut matched_keywords = BTreeSet::new();

        for file in &commit.files {
            for line in file.diff.lines() {
                if !is_content_line(line) {
                    continue;
                }
                if let Some(keyword) = self.keywords.first_match(line) {
                    debug!(
                        "keyword {:?} in {} at commit {}",
                        keyword.text(),
                        file.path,
                        commit.hash
                    );
                    affected_files.insert(file.path.clone());
                    matched_keywords.insert(keyword.text().to_string());
                }
            }
        }

        if affected_files.is_empty() {
            return None;
        }

        Some(MatchRecord {
            repo: repo.to_string(),
            commit_hash: commit.hash.clone(),
            timestamp: commit.timestamp,
            author: commit.author.clone(),
            affected_files,
            matched_keywords,
            category: classify(&commit.message),
        })
    }
}

/// Added/removed content lines only, not the `+++`/`---` diff headers.
fn is_content_line(line: &str) -> bool {
    (line.starts_with('+') && !line.starts_with("+++"))
        || (line.starts_with('-') && !line.starts_with("---"))
}

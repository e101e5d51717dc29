// src/stream.rs

use crate::error::MinerError;
use crate::model::{MinedCommit, ModifiedFile};
use chrono::{DateTime, Utc};
use git2::{Diff, DiffOptions, Oid, Patch, Repository, Sort};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::info;

/// Commits materialized per internal batch. Purely a throughput/memory
/// control; consumers see one continuous sequence.
const CHUNK_SIZE: usize = 200;

/// Open a repository for mining. A location that is a local directory is
/// opened in place; anything else is treated as a remote URL and cloned
/// under `clone_dir/<name>` (or reopened there if a previous run already
/// cloned it).
pub fn open_or_clone(
    location: &str,
    clone_dir: &Path,
    name: &str,
) -> Result<Repository, MinerError> {
    let local = Path::new(location);
    if local.is_dir() {
        return Ok(Repository::open(local)?);
    }

    let target = clone_dir.join(name);
    if target.exists() {
        return Ok(Repository::open(&target)?);
    }
    fs::create_dir_all(clone_dir)?;
    info!("cloning {} into {}", location, target.display());
    Ok(Repository::clone(location, &target)?)
}

/// Lazy, finite, forward-only sequence of commits in original
/// chronological order (oldest first), with per-file unified diffs.
///
/// If a resume hash is supplied, every commit up to and including that
/// hash is discarded before yielding begins; a hash that never appears
/// in the history yields an empty stream.
pub struct CommitStream {
    repo: Repository,
    oids: Vec<Oid>,
    next: usize,
    total: usize,
    buffer: VecDeque<MinedCommit>,
}

impl CommitStream {
    pub fn new(repo: Repository, resume_after: Option<&str>) -> Result<CommitStream, MinerError> {
        // 1. Collect the full history, oldest first.
        let all_oids: Vec<Oid> = if repo.is_empty()? {
            Vec::new()
        } else {
            let mut revwalk = repo.revwalk()?;
            revwalk.push_head()?;
            revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
            revwalk.collect::<Result<_, _>>()?
        };
        let total = all_oids.len();

        // 2. Skip through the resume cursor, cursor included.
        let oids = match resume_after {
            None => all_oids,
            Some(hash) => match all_oids.iter().position(|oid| oid.to_string() == hash) {
                Some(pos) => all_oids[pos + 1..].to_vec(),
                None => Vec::new(),
            },
        };

        Ok(CommitStream {
            repo,
            oids,
            next: 0,
            total,
            buffer: VecDeque::new(),
        })
    }

    /// Total commits in the repository, resume cursor ignored. Used only
    /// for progress reporting.
    pub fn total_commits(&self) -> usize {
        self.total
    }

    /// Commits this stream will still yield.
    pub fn remaining(&self) -> usize {
        self.oids.len() - self.next + self.buffer.len()
    }

    /// Next commit in chronological order, or None once exhausted.
    pub fn next_commit(&mut self) -> Result<Option<MinedCommit>, MinerError> {
        if self.buffer.is_empty() {
            self.fill_buffer()?;
        }
        Ok(self.buffer.pop_front())
    }

    fn fill_buffer(&mut self) -> Result<(), MinerError> {
        let end = (self.next + CHUNK_SIZE).min(self.oids.len());
        for i in self.next..end {
            let commit = self.materialize(self.oids[i])?;
            self.buffer.push_back(commit);
        }
        self.next = end;
        Ok(())
    }

    fn materialize(&self, oid: Oid) -> Result<MinedCommit, MinerError> {
        let commit = self.repo.find_commit(oid)?;

        // Diff against the first parent; the root commit diffs against
        // the empty tree.
        let parent_tree = match commit.parents().next() {
            Some(parent) => Some(parent.tree()?),
            None => None,
        };
        let tree = commit.tree()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(true);
        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;
        let files = patch_texts(&diff)?;

        // The signature borrows the commit, so copy the author out
        // before the commit is consumed by the struct build.
        let author = commit.author().name().unwrap_or("Unknown").to_string();
        let message = commit.message().unwrap_or("").to_string();

        Ok(MinedCommit {
            hash: oid.to_string(),
            timestamp: DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or_default(),
            author,
            message,
            files,
        })
    }
}

/// Render each delta of a diff as unified patch text. Binary deltas have
/// no patch and are skipped.
fn patch_texts(diff: &Diff) -> Result<Vec<ModifiedFile>, MinerError> {
    let mut files = Vec::new();
    for idx in 0..diff.deltas().len() {
        let Some(mut patch) = Patch::from_diff(diff, idx)? else {
            continue;
        };
        let path = diff
            .get_delta(idx)
            .and_then(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().into_owned())
            })
            .unwrap_or_default();
        let buf = patch.to_buf()?;
        files.push(ModifiedFile {
            path,
            diff: String::from_utf8_lossy(&buf).into_owned(),
        });
    }
    Ok(files)
}

// src/miner.rs

use crate::db::Database;
use crate::error::MinerError;
use crate::keywords::KeywordSet;
use crate::model::RepositoryRef;
use crate::scanner::DiffScanner;
use crate::stream::{open_or_clone, CommitStream};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const STATUS_EVERY: u64 = 10;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Totals for a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub repos_processed: usize,
    pub commits_processed: u64,
    pub matches_found: u64,
    /// Cumulative wall-clock seconds, carried across interrupted runs
    pub total_time: f64,
}

/// Drives the pipeline: repository selection, commit streaming,
/// scanning, and persistence. Strictly sequential; one repository is
/// fully drained before the next begins.
pub struct Miner<'a> {
    catalog: &'a [RepositoryRef],
    keywords: &'a KeywordSet,
    db: &'a Database,
    clone_dir: PathBuf,
    max_retries: u32,
}

impl<'a> Miner<'a> {
    pub fn new(
        catalog: &'a [RepositoryRef],
        keywords: &'a KeywordSet,
        db: &'a Database,
        clone_dir: PathBuf,
        max_retries: u32,
    ) -> Miner<'a> {
        Miner {
            catalog,
            keywords,
            db,
            clone_dir,
            max_retries: max_retries.max(1),
        }
    }

    /// Run the full catalog from the resume point to exhaustion.
    ///
    /// The resume point is the catalog index of the most recently
    /// checkpointed repository (index 0 when there is none); every
    /// repository from there on resumes at its own checkpointed commit.
    /// The checkpoint advances after every processed commit, so killing
    /// the process loses at most the in-flight commit, which is redone
    /// on restart.
    pub fn run(&self) -> Result<RunSummary, MinerError> {
        let scanner = DiffScanner::new(self.keywords);

        let latest = self.db.latest_checkpoint()?;
        let start_index = latest
            .as_ref()
            .and_then(|cp| self.catalog.iter().position(|r| r.name == cp.repo))
            .unwrap_or(0);
        let carried_time = latest.map(|cp| cp.total_time).unwrap_or(0.0);
        let started = Instant::now();

        let total_repos = self.catalog.len();
        let mut summary = RunSummary::default();

        for (index, repo_ref) in self.catalog.iter().enumerate().skip(start_index) {
            info!("processing repository {} ({})", repo_ref.name, repo_ref.location);

            let repo = self.with_retry(&format!("opening repository {}", repo_ref.name), || {
                open_or_clone(&repo_ref.location, &self.clone_dir, &repo_ref.name)
            })?;
            let resume = self.db.load_checkpoint(&repo_ref.name)?;
            let mut stream =
                CommitStream::new(repo, resume.as_ref().map(|cp| cp.last_commit.as_str()))?;

            let total_commits = stream.total_commits();
            let bar = ProgressBar::new(stream.remaining() as u64);
            bar.set_message(format!("Mining {}", repo_ref.name));

            let mut processed: u64 = 0;
            let mut matches: u32 = 0;

            while let Some(commit) = stream.next_commit()? {
                processed += 1;

                // A scan failure is deliberately not caught here; it
                // halts the run with the commit context in the logs.
                if let Some(record) = scanner.scan(&repo_ref.name, &commit) {
                    matches += 1;
                    self.db.append_match(&record, matches)?;
                }

                let total_time = carried_time + started.elapsed().as_secs_f64();
                self.with_retry("saving checkpoint", || {
                    self.db
                        .save_checkpoint(&repo_ref.name, &commit.hash, total_time)
                })?;

                bar.inc(1);
                let remaining = stream.remaining();
                if processed % STATUS_EVERY == 0 || remaining == 0 {
                    bar.set_message(format!(
                        "Current Repo: {} | Repo: {}/{} | Commit: {}/{} | Time: {:.2}s | Repos left: {} | Commits left: {}",
                        repo_ref.name,
                        index + 1,
                        total_repos,
                        processed,
                        total_commits,
                        total_time,
                        total_repos - (index + 1),
                        remaining,
                    ));
                }
            }

            bar.finish_with_message(format!(
                "{}: {} commits processed, {} matched",
                repo_ref.name, processed, matches
            ));

            summary.repos_processed += 1;
            summary.commits_processed += processed;
            summary.matches_found += u64::from(matches);
        }

        summary.total_time = carried_time + started.elapsed().as_secs_f64();
        info!(
            "mining completed: {} repositories, {} commits, {:.2}s total",
            summary.repos_processed, summary.commits_processed, summary.total_time
        );
        Ok(summary)
    }

    /// Bounded exponential backoff: up to `max_retries` attempts, delay
    /// doubling from 500 ms, then escalate as fatal.
    fn with_retry<T>(
        &self,
        operation: &str,
        mut f: impl FnMut() -> Result<T, MinerError>,
    ) -> Result<T, MinerError> {
        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match f() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_retries => {
                    return Err(MinerError::RetriesExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        operation, attempt, self.max_retries, e, delay
                    );
                    thread::sleep(delay);
                    delay *= 2;
                }
            }
        }
    }
}

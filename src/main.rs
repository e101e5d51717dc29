// src/main.rs

mod cli;

use clap::Parser;
use cli::Args;
use commit_miner::error::MinerError;
use commit_miner::miner::Miner;
use commit_miner::{catalog, db::Database, keywords::KeywordSet};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("commit_miner=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error mining repositories: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MinerError> {
    let args = Args::parse();
    let start_time = Instant::now();

    let keywords = KeywordSet::load(&args.keywords);
    println!("Loaded {} keyword patterns.", keywords.len());

    let repos = catalog::load(&args.catalog)?;
    println!("Catalog lists {} repositories.", repos.len());

    let db = Database::open(&args.database)?;
    let miner = Miner::new(&repos, &keywords, &db, args.clone_dir, args.max_retries);
    let summary = miner.run()?;

    println!(
        "Mining finished in {:.2?}. Processed {} commits across {} repositories, {} matched.",
        start_time.elapsed(),
        summary.commits_processed,
        summary.repos_processed,
        summary.matches_found
    );
    println!("Cumulative mining time: {:.2}s.", summary.total_time);
    Ok(())
}

// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV catalog of repositories to mine (header row, then name,url)
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Keyword file, one pattern per line; `*` is a wildcard
    #[arg(short, long, default_value = "keywords.txt")]
    pub keywords: PathBuf,

    /// SQLite database holding match records and checkpoints
    #[arg(short, long, default_value = "commit_analysis.db")]
    pub database: PathBuf,

    /// Directory remote repositories are cloned into
    #[arg(long, default_value = "cloned_repos")]
    pub clone_dir: PathBuf,

    /// Attempts before a failing clone or checkpoint write becomes fatal
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,
}

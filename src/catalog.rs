// src/catalog.rs

use crate::error::MinerError;
use crate::model::RepositoryRef;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load the repository catalog from a CSV file: a header row, then one
/// repository per row as `name,url[,...]`. Columns beyond the first two
/// are ignored, as are rows that are too short.
pub fn load(path: &Path) -> Result<Vec<RepositoryRef>, MinerError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        MinerError::catalog(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut repos = Vec::new();
    for line in contents.lines().skip(1) {
        let fields = split_row(line);
        match (fields.first(), fields.get(1)) {
            (Some(name), Some(location)) if !name.is_empty() && !location.is_empty() => {
                repos.push(RepositoryRef {
                    name: name.clone(),
                    location: location.clone(),
                });
            }
            _ => debug!("skipping malformed catalog row: {:?}", line),
        }
    }
    Ok(repos)
}

/// Split one CSV row on commas, honoring double-quoted fields (with
/// `""` as an escaped quote inside them). Fields are trimmed.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

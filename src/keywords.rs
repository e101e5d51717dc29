// src/keywords.rs

use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::Path;
use tracing::warn;

/// One compiled match pattern. `text` is the literal line from the
/// keyword file; it is what gets reported when the pattern hits.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    pattern: Regex,
}

impl Keyword {
    fn compile(text: &str) -> Option<Keyword> {
        // Escape everything, then re-open `*` as a wildcard. Matches are
        // word-bounded so a keyword never hits inside a larger token.
        let escaped = regex::escape(text).replace(r"\*", ".*");
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", escaped))
            .case_insensitive(true)
            .build();
        match pattern {
            Ok(pattern) => Some(Keyword {
                text: text.to_string(),
                pattern,
            }),
            Err(e) => {
                warn!("skipping unusable keyword {:?}: {}", text, e);
                None
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// The ordered set of patterns to look for in diff lines. Built once at
/// startup and borrowed by the scanner for the life of the run.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Load keywords from a plain-text file, one per line. `#`-prefixed
    /// and blank lines are ignored. A missing or unreadable file is not
    /// fatal: mining proceeds with an empty set and finds nothing.
    pub fn load(path: &Path) -> KeywordSet {
        match fs::read_to_string(path) {
            Ok(contents) => KeywordSet::parse(&contents),
            Err(e) => {
                warn!(
                    "keywords file {} not readable ({}); using an empty list",
                    path.display(),
                    e
                );
                KeywordSet::default()
            }
        }
    }

    pub fn parse(contents: &str) -> KeywordSet {
        let keywords = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Keyword::compile)
            .collect();
        KeywordSet { keywords }
    }

    /// First keyword matching the line, in file order, or None.
    pub fn first_match(&self, line: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.matches(line))
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blanks() {
        let set = KeywordSet::parse("# a comment\n\nfairness\n  \nbias\n");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let set = KeywordSet::parse("fairness\n");
        assert!(set.first_match("+ FAIRNESS score").is_some());
    }

    #[test]
    fn matching_is_word_bounded() {
        let set = KeywordSet::parse("bias\n");
        assert!(set.first_match("- fix the bias term").is_some());
        assert!(set.first_match("+ unbiased estimator").is_none());
    }

    #[test]
    fn star_matches_any_substring() {
        let set = KeywordSet::parse("demographic * parity\n");
        assert!(set
            .first_match("+ demographic statistical parity check")
            .is_some());
        assert!(set.first_match("+ demographic drift").is_none());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let set = KeywordSet::parse("a.b\n");
        assert!(set.first_match("+ use a.b here").is_some());
        assert!(set.first_match("+ use axb here").is_none());
    }

    #[test]
    fn first_match_preserves_file_order() {
        let set = KeywordSet::parse("fair*\nfairness\n");
        let hit = set.first_match("+ fairness metric").unwrap();
        assert_eq!(hit.text(), "fair*");
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let set = KeywordSet::load(Path::new("/no/such/keywords.txt"));
        assert!(set.is_empty());
    }
}

//! Markdown changelog parser
//!
//! A changelog is a sequence of chapters, each opened by a level-2
//! heading such as `## 1.5.3 (2025-07-09)`. Chapters whose heading is not
//! a dotted version followed by an ISO date (e.g. `## Unreleased`) are
//! skipped.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use liftoff_core::error::{ChangelogError, Result};
use liftoff_core::Change;

/// Regex for release headings: `<version> (<YYYY-MM-DD>)`
static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<version>\d+(?:\.\d+)*)\s+\((?P<date>\d{4}-\d{2}-\d{2})\)")
        .expect("Invalid regex")
});

/// Result of parsing a changelog document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Release entries in document order
    pub changes: Vec<Change>,
    /// Headings of chapters that were not releases
    pub skipped: Vec<String>,
}

struct Chapter<'a> {
    heading: &'a str,
    body: Vec<&'a str>,
}

/// Parse a changelog into its release entries
pub fn parse_changelog(text: &str) -> Vec<Change> {
    parse_changelog_detailed(text).changes
}

/// Parse a changelog, also reporting the chapters that were skipped
pub fn parse_changelog_detailed(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for chapter in split_chapters(text) {
        match parse_heading(chapter.heading) {
            Some((version, date)) => {
                let notes = chapter.body.join("\n").trim().to_string();
                debug!(version = %version, date = %date, "parsed changelog chapter");
                outcome.changes.push(Change::new(version, date, notes));
            }
            None => {
                let heading = chapter.heading.trim().to_string();
                warn!(heading = %heading, "ignoring changelog chapter without version");
                outcome.skipped.push(heading);
            }
        }
    }

    outcome
}

/// Read and parse a changelog file
pub fn load_changelog(path: &Path) -> Result<ParseOutcome> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChangelogError::FileNotFound(path.to_path_buf()).into());
        }
        Err(e) => return Err(ChangelogError::Io(e).into()),
    };
    Ok(parse_changelog_detailed(&text))
}

fn split_chapters(text: &str) -> Vec<Chapter<'_>> {
    let mut chapters: Vec<Chapter<'_>> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }

        if !in_fence {
            if let Some(heading) = chapter_heading(trimmed) {
                chapters.push(Chapter {
                    heading,
                    body: Vec::new(),
                });
                continue;
            }
        }

        // Text before the first chapter is preamble
        if let Some(chapter) = chapters.last_mut() {
            chapter.body.push(line);
        }
    }

    chapters
}

fn chapter_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest)
}

fn parse_heading(heading: &str) -> Option<(String, NaiveDate)> {
    let caps = HEADING_REGEX.captures(heading)?;
    let version = caps.name("version")?.as_str().to_string();
    let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y-%m-%d").ok()?;
    Some((version, date))
}

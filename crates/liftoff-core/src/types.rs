//! Core types for liftoff

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::version::{version_to_code, VersionTuple};

/// A single release entry from the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Dotted numeric version, e.g. `1.5.3`
    pub version_name: String,
    /// Release date
    pub version_date: NaiveDate,
    /// Release notes as markdown
    pub notes_md: String,
}

impl Change {
    /// Create a new change
    pub fn new(
        version_name: impl Into<String>,
        version_date: NaiveDate,
        notes_md: impl Into<String>,
    ) -> Self {
        Self {
            version_name: version_name.into(),
            version_date,
            notes_md: notes_md.into(),
        }
    }

    /// Numeric ordering key of the version
    pub fn version_tuple(&self) -> Result<VersionTuple> {
        VersionTuple::parse(&self.version_name)
    }

    /// Fixed-width store version code
    pub fn version_code(&self) -> Result<String> {
        version_to_code(&self.version_name)
    }

    /// Release date formatted as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.version_date.format("%Y-%m-%d").to_string()
    }
}

/// Find the change with the highest version.
///
/// Versions are compared numerically. Changes whose version cannot be
/// parsed are ignored, and on ties the earliest change wins.
pub fn latest_change(changes: &[Change]) -> Option<&Change> {
    let mut best: Option<(&Change, VersionTuple)> = None;
    for change in changes {
        let Ok(tuple) = change.version_tuple() else {
            continue;
        };
        match &best {
            Some((_, current)) if *current >= tuple => {}
            _ => best = Some((change, tuple)),
        }
    }
    best.map(|(change, _)| change)
}

//! Liftoff Changelog - Changelog parsing for store metadata
//!
//! This crate reads a markdown changelog made of `## <version> (<date>)`
//! chapters into [`Change`](liftoff_core::Change) entries, and formats
//! entries back for store listings.

pub mod formatter;
pub mod parser;

pub use formatter::format_fastlane_entry;
pub use parser::{load_changelog, parse_changelog, parse_changelog_detailed, ParseOutcome};

//! Changelog entry formatting

use liftoff_core::Change;

/// Format a change as a fastlane changelog file body
pub fn format_fastlane_entry(change: &Change) -> String {
    format!(
        "## {} ({})\n\n{}\n\n",
        change.version_name,
        change.date_string(),
        change.notes_md
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_fastlane_entry() {
        let change = Change::new(
            "1.5.3",
            NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            "- Fixed dice rolling off the table",
        );
        assert_eq!(
            format_fastlane_entry(&change),
            "## 1.5.3 (2025-07-09)\n\n- Fixed dice rolling off the table\n\n"
        );
    }
}

//! Store descriptions extracted from the project README.
//!
//! The README convention is:
//!
//! - anything before the first heading (usually badges) is ignored;
//! - the first heading is the application title;
//! - the first line after it is the short description;
//! - the rest of the document is the full description, optionally cut at
//!   an `<!-- end-of-description -->` marker.
//!
//! Image embeds are dropped everywhere.

use std::sync::LazyLock;

use liftoff_core::text::title_case;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{MetadataError, Result};

/// Marker that ends the store description inside a markdown document
pub const END_OF_DESCRIPTION: &str = "end-of-description";

static END_OF_DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)<!--\s*{}\s*-->",
        regex::escape(END_OF_DESCRIPTION)
    ))
    .expect("Invalid regex")
});

/// Title and descriptions of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub title: String,
    pub short_description: String,
    pub full_description: String,
}

/// Extract the title, short and full descriptions from a README
pub fn extract_description(markdown: &str) -> Result<Description> {
    let mut lines = markdown.lines();

    let heading = lines
        .by_ref()
        .find(|line| line.trim_start().starts_with('#'))
        .ok_or_else(|| MetadataError::InvalidFormat("README has no title heading".to_string()))?;

    let title = title_case(&heading.replace('#', "").trim().replace('-', " "));

    let mut body = lines
        .filter(|line| !line.trim_start().starts_with("!["))
        .skip_while(|line| line.trim().is_empty());

    let short_description = body
        .next()
        .map(|line| line.trim().to_string())
        .ok_or_else(|| {
            MetadataError::InvalidFormat(
                "README has no short description line after the title".to_string(),
            )
        })?;

    let rest: Vec<&str> = body.collect();
    let full_description = cutoff_on_mark(rest.join("\n").trim()).trim().to_string();

    Ok(Description {
        title,
        short_description,
        full_description,
    })
}

/// Cut the text at the `end-of-description` marker, if present
pub fn cutoff_on_mark(content: &str) -> &str {
    match END_OF_DESCRIPTION_REGEX.find(content) {
        Some(found) => &content[..found.start()],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_triple_is_recovered() {
        let desc =
            extract_description("# Title\nShort line\nBody first\n\nBody second").unwrap();
        assert_eq!(desc.title, "Title");
        assert_eq!(desc.short_description, "Short line");
        assert_eq!(desc.full_description, "Body first\n\nBody second");
    }

    #[test]
    fn test_badges_images_and_blank_lines_are_ignored() {
        let readme = "\
[![CI](https://example.com/badge.svg)](https://example.com)

# godot-dice-roller

![screenshot](screenshots/main.png)

Roll 3D dice in your Godot games.

![another](screenshots/other.png)
## Features

- Physics based
";
        let desc = extract_description(readme).unwrap();
        assert_eq!(desc.title, "Godot Dice Roller");
        assert_eq!(desc.short_description, "Roll 3D dice in your Godot games.");
        assert_eq!(desc.full_description, "## Features\n\n- Physics based");
    }

    #[test]
    fn test_end_of_description_marker() {
        let readme = "# App\nShort\n\nKept text.\n\n<!-- End-Of-Description -->\n\n## Development\nDropped\n";
        let desc = extract_description(readme).unwrap();
        assert_eq!(desc.full_description, "Kept text.");
    }

    #[test]
    fn test_cutoff_on_mark_variants() {
        assert_eq!(cutoff_on_mark("a<!--end-of-description-->b"), "a");
        assert_eq!(cutoff_on_mark("a<!--   END-OF-DESCRIPTION \n -->b"), "a");
        assert_eq!(cutoff_on_mark("no marker"), "no marker");
    }

    #[test]
    fn test_missing_heading_is_an_error() {
        assert!(matches!(
            extract_description("no heading here"),
            Err(MetadataError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_short_description_is_an_error() {
        assert!(matches!(
            extract_description("# Title\n\n![img](x.png)\n\n"),
            Err(MetadataError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_full_description_is_allowed() {
        let desc = extract_description("# Title\nShort").unwrap();
        assert_eq!(desc.full_description, "");
    }

    #[test]
    fn test_heading_hashes_are_removed() {
        let desc = extract_description("## my-app ##\nShort").unwrap();
        assert_eq!(desc.title, "My App");
    }
}

//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Change;

/// Overrides read from the optional configuration file.
///
/// Any field left at its default is derived later from the project's
/// documentation files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Reverse-DNS application id, e.g. `net.example.my_app`
    pub unique_name: String,

    /// Repository name used in release tags
    pub repo_name: String,

    /// SPDX license identifier
    pub license: String,

    /// Application title
    pub title: String,

    /// One line description
    pub short_description: String,

    /// Long description as markdown
    pub full_description: String,

    /// Desktop categories
    pub categories: Vec<String>,

    /// Search keywords
    pub keywords: Vec<String>,

    /// Explicit release list, replacing the changelog
    pub changes: Vec<Change>,

    /// Repository browse URL
    pub repo_url: Option<String>,

    /// Raw content URL prefix of the default branch
    pub repo_raw: Option<String>,

    /// Issue tracker URL
    pub issues_url: Option<String>,

    /// Store previews (screenshots and videos)
    pub previews: Vec<Preview>,

    /// Command line for the desktop launcher
    pub desktop_exec: Option<String>,

    /// Splash screen SVG carrying the version label
    pub splash: Option<PathBuf>,

    /// Input and output path layout
    pub paths: Layout,
}

/// A store preview entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preview {
    /// Preview kind (`image`, `video`)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Image path inside the repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repoimage: Option<String>,

    /// Caption shown with the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// External link of the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Thumbnail link of the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Paths read and written by the generators, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Project readme
    pub readme: PathBuf,
    /// Changelog
    pub changes: PathBuf,
    /// License text
    pub license: PathBuf,
    /// Directory holding PNG screenshots
    pub screenshots: PathBuf,
    /// Square application icon
    pub icon: PathBuf,
    /// Export presets template
    pub presets_template: PathBuf,
    /// Generated export presets
    pub presets: PathBuf,
    /// Flatpak descriptors directory
    pub flatpak_dir: PathBuf,
    /// Fastlane root
    pub fastlane_dir: PathBuf,
    /// Fastlane locale directory for the Android listing
    pub fastlane_locale_dir: PathBuf,
    /// Android export output directory
    pub android_build_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            changes: PathBuf::from("CHANGES.md"),
            license: PathBuf::from("LICENSE"),
            screenshots: PathBuf::from("screenshots"),
            icon: PathBuf::from("icon.png"),
            presets_template: PathBuf::from("tools/export_presets_template.cfg"),
            presets: PathBuf::from("export_presets.cfg"),
            flatpak_dir: PathBuf::from("tools/flatpak"),
            fastlane_dir: PathBuf::from("fastlane"),
            fastlane_locale_dir: PathBuf::from("fastlane/metadata/android/en-US"),
            android_build_dir: PathBuf::from("build/android"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ConfigFile = serde_yaml::from_str(
            "unique_name: net.example.dice\ncategories: [Game, BoardGame]\npaths:\n  readme: docs/README.md\n",
        )
        .unwrap();

        assert_eq!(config.unique_name, "net.example.dice");
        assert_eq!(config.categories, vec!["Game", "BoardGame"]);
        assert!(config.title.is_empty());
        assert!(config.changes.is_empty());
        assert_eq!(config.paths.readme, PathBuf::from("docs/README.md"));
        assert_eq!(config.paths.changes, PathBuf::from("CHANGES.md"));
    }

    #[test]
    fn test_preview_type_field() {
        let config: ConfigFile = serde_yaml::from_str(
            "previews:\n  - type: image\n    repoimage: screenshots/main.png\n    link: https://example.com/main.png\n",
        )
        .unwrap();

        let preview = &config.previews[0];
        assert_eq!(preview.kind.as_deref(), Some("image"));
        assert_eq!(preview.repoimage.as_deref(), Some("screenshots/main.png"));
        assert!(preview.caption.is_none());
    }
}

//! Resolved project configuration.
//!
//! The optional config file provides overrides. Every field it leaves at
//! its default is derived from the project itself: the README gives the
//! title and descriptions, CHANGES.md the releases, LICENSE the SPDX id
//! and the git `origin` remote the repository URLs.

use std::path::{Path, PathBuf};

use liftoff_changelog::load_changelog;
use liftoff_core::config::{ConfigFile, Preview, DEFAULT_DESKTOP_EXEC, DEFAULT_RAW_BRANCH_REF};
use liftoff_core::error::{ChangelogError, ConfigError};
use liftoff_core::types::latest_change;
use liftoff_core::{Change, LiftoffError};
use liftoff_git::GitRepo;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::license::{infer_license, LicenseMatcher};
use crate::readme::extract_description;
use crate::workspace::{read_required, Workspace};
use crate::{MetadataError, Result};

/// Fully resolved configuration shared by all generators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub unique_name: String,
    pub repo_name: String,
    /// SPDX license identifier
    pub license: String,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    /// Releases in document order
    pub changes: Vec<Change>,
    pub repo_url: Option<String>,
    pub repo_raw: Option<String>,
    pub issues_url: Option<String>,
    pub previews: Vec<Preview>,
    pub desktop_exec: String,
    pub splash: Option<PathBuf>,
}

impl Config {
    /// Resolve the configuration of the project in `ws`
    #[instrument(skip_all, fields(root = %ws.root().display()))]
    pub fn load(ws: &Workspace, file: ConfigFile, matcher: &dyn LicenseMatcher) -> Result<Self> {
        if file.unique_name.is_empty() {
            return Err(LiftoffError::Config(ConfigError::InvalidValue {
                field: "unique_name".to_string(),
                message: "must be set in the config file".to_string(),
            })
            .into());
        }

        let mut title = file.title;
        let mut short_description = file.short_description;
        let mut full_description = file.full_description;
        if title.is_empty() || short_description.is_empty() || full_description.is_empty() {
            let readme = read_required(&ws.readme())?;
            let description = extract_description(&readme)?;
            debug!(title = %description.title, "read descriptions from README");
            if title.is_empty() {
                title = description.title;
            }
            if short_description.is_empty() {
                short_description = description.short_description;
            }
            if full_description.is_empty() {
                full_description = description.full_description;
            }
        }

        let changes = if file.changes.is_empty() {
            load_changes(&ws.changes())?
        } else {
            file.changes
        };

        let license = if file.license.is_empty() {
            infer_license(&ws.license(), matcher)?
        } else {
            file.license
        };

        let repo_url = file.repo_url.or_else(|| detect_repo_url(ws.root()));

        let repo_name = if !file.repo_name.is_empty() {
            file.repo_name
        } else {
            repo_url
                .as_deref()
                .and_then(last_path_segment)
                .or_else(|| ws.root_name())
                .unwrap_or_default()
        };

        let issues_url = file.issues_url.or_else(|| {
            repo_url
                .as_deref()
                .map(|url| format!("{}/issues", url.trim_end_matches('/')))
        });

        let repo_raw = file
            .repo_raw
            .or_else(|| repo_url.as_deref().and_then(github_raw_url));

        let config = Self {
            unique_name: file.unique_name,
            repo_name,
            license,
            title,
            short_description,
            full_description,
            categories: file.categories,
            keywords: file.keywords,
            changes,
            repo_url,
            repo_raw,
            issues_url,
            previews: file.previews,
            desktop_exec: file
                .desktop_exec
                .unwrap_or_else(|| DEFAULT_DESKTOP_EXEC.to_string()),
            splash: file.splash,
        };

        info!(
            unique_name = %config.unique_name,
            releases = config.changes.len(),
            license = %config.license,
            "resolved configuration"
        );
        Ok(config)
    }

    /// The release with the highest version
    pub fn last_version(&self) -> Option<&Change> {
        latest_change(&self.changes)
    }

    /// The release with the highest version, failing when there is none
    pub fn require_last_version(&self) -> Result<&Change> {
        self.last_version().ok_or(MetadataError::NoReleases)
    }
}

fn load_changes(path: &Path) -> Result<Vec<Change>> {
    match load_changelog(path) {
        Ok(outcome) => {
            if !outcome.skipped.is_empty() {
                info!(skipped = ?outcome.skipped, "skipped changelog chapters");
            }
            Ok(outcome.changes)
        }
        Err(LiftoffError::Changelog(ChangelogError::FileNotFound(path))) => {
            warn!(path = %path.display(), "changelog not found, no releases known");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn detect_repo_url(root: &Path) -> Option<String> {
    match GitRepo::discover(root).and_then(|repo| repo.browse_url("origin")) {
        Ok(url) => url,
        Err(e) => {
            debug!(error = %e, "repository url not derivable from git");
            None
        }
    }
}

fn last_path_segment(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(str::to_string)
}

/// Raw content prefix of the default branch, for GitHub hosted repositories
fn github_raw_url(repo_url: &str) -> Option<String> {
    let url = Url::parse(repo_url).ok()?;
    if url.host_str()? != "github.com" {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    Some(format!(
        "https://raw.githubusercontent.com/{}/{}/{}",
        owner, repo, DEFAULT_RAW_BRANCH_REF
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::license::tests::PhraseMatcher;
    use crate::LicenseError;
    use liftoff_core::config::Layout;
    use tempfile::TempDir;

    pub(crate) const README: &str = "\
# dice-roller

Roll dice in Godot

## Features

- Physics
  - Bouncy
- Sounds
";

    pub(crate) const CHANGES: &str = "\
# Changelog

## Unreleased

- Work in progress

## 1.10.0 (2025-03-01)

- Second release

## 1.9.2 (2024-11-20)

- First release
";

    pub(crate) const MIT: &str =
        "MIT License\n\nPermission is hereby granted, free of charge, to any person";

    /// A project directory with README, changelog and license
    pub(crate) fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), README).unwrap();
        std::fs::write(temp.path().join("CHANGES.md"), CHANGES).unwrap();
        std::fs::write(temp.path().join("LICENSE"), MIT).unwrap();
        temp
    }

    pub(crate) fn config_file() -> ConfigFile {
        ConfigFile {
            unique_name: "net.example.dice".to_string(),
            repo_url: Some("https://github.com/example/dice-roller".to_string()),
            categories: vec!["Game".to_string()],
            ..Default::default()
        }
    }

    pub(crate) fn load(temp: &TempDir) -> Config {
        let ws = Workspace::new(temp.path(), Layout::default());
        Config::load(&ws, config_file(), &PhraseMatcher).unwrap()
    }

    #[test]
    fn test_back_fill_from_project_files() {
        let temp = project();
        let config = load(&temp);

        assert_eq!(config.title, "Dice Roller");
        assert_eq!(config.short_description, "Roll dice in Godot");
        assert!(config.full_description.starts_with("## Features"));
        assert_eq!(config.license, "MIT");
        assert_eq!(config.changes.len(), 2);
        assert_eq!(config.changes[0].version_name, "1.10.0");
        assert_eq!(config.repo_name, "dice-roller");
        assert_eq!(
            config.issues_url.as_deref(),
            Some("https://github.com/example/dice-roller/issues")
        );
        assert_eq!(
            config.repo_raw.as_deref(),
            Some("https://raw.githubusercontent.com/example/dice-roller/refs/heads/main")
        );
        assert_eq!(config.desktop_exec, DEFAULT_DESKTOP_EXEC);
    }

    #[test]
    fn test_last_version_is_numeric() {
        let temp = project();
        let config = load(&temp);
        assert_eq!(config.last_version().unwrap().version_name, "1.10.0");
    }

    #[test]
    fn test_overrides_are_kept() {
        let temp = project();
        let ws = Workspace::new(temp.path(), Layout::default());
        let file = ConfigFile {
            title: "Custom".to_string(),
            license: "GPL-3.0-or-later".to_string(),
            repo_name: "dice".to_string(),
            desktop_exec: Some("dice %U".to_string()),
            ..config_file()
        };

        let config = Config::load(&ws, file, &PhraseMatcher).unwrap();
        assert_eq!(config.title, "Custom");
        assert_eq!(config.short_description, "Roll dice in Godot");
        assert_eq!(config.license, "GPL-3.0-or-later");
        assert_eq!(config.repo_name, "dice");
        assert_eq!(config.desktop_exec, "dice %U");
    }

    #[test]
    fn test_readme_not_needed_when_descriptions_given() {
        let temp = project();
        std::fs::remove_file(temp.path().join("README.md")).unwrap();
        let ws = Workspace::new(temp.path(), Layout::default());
        let file = ConfigFile {
            title: "T".to_string(),
            short_description: "S".to_string(),
            full_description: "F".to_string(),
            ..config_file()
        };

        let config = Config::load(&ws, file, &PhraseMatcher).unwrap();
        assert_eq!(config.full_description, "F");
    }

    #[test]
    fn test_missing_license_is_fatal() {
        let temp = project();
        std::fs::remove_file(temp.path().join("LICENSE")).unwrap();
        let ws = Workspace::new(temp.path(), Layout::default());

        let err = Config::load(&ws, config_file(), &PhraseMatcher).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::License(LicenseError::FileMissing(_))
        ));
    }

    #[test]
    fn test_missing_changelog_gives_no_releases() {
        let temp = project();
        std::fs::remove_file(temp.path().join("CHANGES.md")).unwrap();
        let config = load(&temp);

        assert!(config.changes.is_empty());
        assert!(matches!(
            config.require_last_version(),
            Err(MetadataError::NoReleases)
        ));
    }

    #[test]
    fn test_unique_name_is_required() {
        let temp = project();
        let ws = Workspace::new(temp.path(), Layout::default());
        let file = ConfigFile {
            unique_name: String::new(),
            ..config_file()
        };
        assert!(matches!(
            Config::load(&ws, file, &PhraseMatcher),
            Err(MetadataError::Core(LiftoffError::Config(
                ConfigError::InvalidValue { ref field, .. }
            ))) if field == "unique_name"
        ));
    }

    #[test]
    fn test_repo_url_from_git_origin() {
        let temp = project();
        let repo = git2::Repository::init(temp.path()).unwrap();
        repo.remote("origin", "git@gitlab.com:example/dice-roller.git")
            .unwrap();
        let ws = Workspace::new(temp.path(), Layout::default());
        let file = ConfigFile {
            repo_url: None,
            ..config_file()
        };

        let config = Config::load(&ws, file, &PhraseMatcher).unwrap();
        assert_eq!(
            config.repo_url.as_deref(),
            Some("https://gitlab.com/example/dice-roller")
        );
        assert_eq!(config.repo_name, "dice-roller");
        assert!(config.repo_raw.is_none());
    }

    #[test]
    fn test_repo_name_falls_back_to_root_dir() {
        let temp = project();
        let ws = Workspace::new(temp.path(), Layout::default());
        let file = ConfigFile {
            repo_url: None,
            ..config_file()
        };

        let config = Config::load(&ws, file, &PhraseMatcher).unwrap();
        assert!(config.repo_url.is_none());
        assert!(config.issues_url.is_none());
        assert_eq!(Some(config.repo_name), ws.root_name());
    }

    #[test]
    fn test_github_raw_url() {
        assert_eq!(
            github_raw_url("https://github.com/owner/repo").as_deref(),
            Some("https://raw.githubusercontent.com/owner/repo/refs/heads/main")
        );
        assert!(github_raw_url("https://codeberg.org/owner/repo").is_none());
        assert!(github_raw_url("https://github.com/owner").is_none());
    }
}

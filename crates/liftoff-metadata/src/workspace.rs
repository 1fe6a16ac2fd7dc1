//! Project workspace paths and file output helpers

use std::path::{Path, PathBuf};

use liftoff_core::config::Layout;
use tracing::{debug, info, warn};

use crate::{MetadataError, Result};

/// A project root together with its path layout
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    layout: Layout,
}

impl Workspace {
    /// Create a workspace rooted at `root`
    pub fn new(root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolve a project-relative path
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Name of the root directory
    pub fn root_name(&self) -> Option<String> {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        root.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    pub fn readme(&self) -> PathBuf {
        self.path(&self.layout.readme)
    }

    pub fn changes(&self) -> PathBuf {
        self.path(&self.layout.changes)
    }

    pub fn license(&self) -> PathBuf {
        self.path(&self.layout.license)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.path(&self.layout.screenshots)
    }

    pub fn icon(&self) -> PathBuf {
        self.path(&self.layout.icon)
    }

    pub fn presets_template(&self) -> PathBuf {
        self.path(&self.layout.presets_template)
    }

    pub fn presets(&self) -> PathBuf {
        self.path(&self.layout.presets)
    }

    pub fn flatpak_dir(&self) -> PathBuf {
        self.path(&self.layout.flatpak_dir)
    }

    pub fn fastlane_dir(&self) -> PathBuf {
        self.path(&self.layout.fastlane_dir)
    }

    pub fn fastlane_locale_dir(&self) -> PathBuf {
        self.path(&self.layout.fastlane_locale_dir)
    }
}

/// Files written and soft warnings raised by a generator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files created or overwritten
    pub written: Vec<PathBuf>,
    /// Recoverable problems that caused a step to be skipped
    pub warnings: Vec<String>,
}

impl GenerationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written file
    pub fn wrote(&mut self, path: impl Into<PathBuf>) {
        self.written.push(path.into());
    }

    /// Record and log a soft warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: GenerationReport) {
        self.written.extend(other.written);
        self.warnings.extend(other.warnings);
    }
}

/// Create a directory and its parents
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| MetadataError::file(path, e))
}

/// Read a text file, returning None if it doesn't exist
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MetadataError::file(path, e)),
    }
}

/// Read a text file that must exist
pub fn read_required(path: &Path) -> Result<String> {
    read_optional(path)?.ok_or_else(|| MetadataError::NotFound(path.display().to_string()))
}

/// Write a text file, creating parent directories as needed
pub fn write_text(path: &Path, content: &str, report: &mut GenerationReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content).map_err(|e| MetadataError::file(path, e))?;
    info!(path = %path.display(), bytes = content.len(), "wrote file");
    debug!(path = %path.display(), "{}", content);
    report.wrote(path);
    Ok(())
}

/// Copy a file, creating the target's parent directories as needed
pub fn copy_file(origin: &Path, target: &Path, report: &mut GenerationReport) -> Result<()> {
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(origin, target).map_err(|e| MetadataError::file(origin, e))?;
    info!(from = %origin.display(), to = %target.display(), "copied file");
    report.wrote(target);
    Ok(())
}

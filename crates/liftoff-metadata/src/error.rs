//! Error types for metadata operations.

use std::path::PathBuf;

use liftoff_core::LiftoffError;
use thiserror::Error;

/// Errors that can occur during metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file.
    #[error("I/O error on {path}: {source}")]
    FileIo {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid format encountered.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// XML could not be parsed or written.
    #[error("XML error: {0}")]
    Xml(String),

    /// Export preset could not be adapted.
    #[error("Export preset error: {0}")]
    Preset(String),

    /// License could not be determined.
    #[error(transparent)]
    License(#[from] LicenseError),

    /// An external tool exited with a failure.
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// Program name.
        tool: String,
        /// Exit status or spawn error.
        message: String,
    },

    /// No release was found in the changelog.
    #[error("No releases found; add a '## <version> (<date>)' chapter to the changelog")]
    NoReleases,

    /// Error from the core crates.
    #[error(transparent)]
    Core(#[from] LiftoffError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Errors raised while determining the project license.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The license file does not exist.
    #[error("License file not found at {0}; add one or set the SPDX id in the config")]
    FileMissing(PathBuf),

    /// The license text did not match any known license.
    #[error("License in {0} couldn't be identified; correct it or set the SPDX id in the config")]
    Unidentified(PathBuf),

    /// The SPDX id has no equivalent in the target vocabulary.
    #[error("License '{0}' has no Asset Library equivalent")]
    Unmapped(String),
}

impl MetadataError {
    /// Attach a path to an I/O error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetadataError::FileIo {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::SerializationError(err.to_string())
    }
}

impl From<liftoff_core::error::VersionError> for MetadataError {
    fn from(err: liftoff_core::error::VersionError) -> Self {
        MetadataError::Core(err.into())
    }
}

//! Store metadata generation for liftoff.
//!
//! This crate resolves the project configuration from its documentation
//! files and writes the store and packaging artifacts: the fastlane
//! Android listing, the Flatpak metainfo and desktop files, the Godot
//! export preset and the versioned splash screen.

pub mod captions;
pub mod config;
pub mod error;
pub mod fastlane;
pub mod flatpak;
pub mod license;
pub mod markup;
pub mod presets;
pub mod readme;
pub mod splash;
pub mod tools;
pub mod workspace;

pub use config::Config;
pub use error::{LicenseError, MetadataError};
pub use fastlane::{generate_fastlane, published_versions};
pub use flatpak::{update_metainfo, write_desktop_file};
pub use license::{asset_library_license, infer_license, LicenseMatcher, SpdxMatcher};
pub use markup::{CommonMarkRenderer, MarkdownRenderer};
pub use presets::adapt_android_preset;
pub use readme::{extract_description, Description};
pub use splash::update_splash_version;
pub use tools::{Tool, ToolRunner, ToolStatus, Tools};
pub use workspace::{GenerationReport, Workspace};

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

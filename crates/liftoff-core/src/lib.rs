//! Liftoff Core - Core library for store metadata generation
//!
//! This crate provides the foundational types, error handling, configuration
//! file loading and version arithmetic shared by the liftoff crates.

pub mod config;
pub mod error;
pub mod text;
pub mod types;
pub mod version;

pub use error::{LiftoffError, Result};
pub use types::Change;
pub use version::{code_to_version, version_code_number, version_to_code, VersionTuple};

//! External image tools.
//!
//! Raster and vector work is delegated to ImageMagick `convert` and
//! `inkscape`. Both are optional: a tool that is not installed reports
//! [`ToolStatus::Missing`] and the caller downgrades the step to a warning.

use std::ffi::OsString;
use std::process::Command;

use tracing::{debug, info};

use crate::{MetadataError, Result};

/// Outcome of running an external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// The tool ran and exited successfully
    Completed,
    /// The tool is not installed
    Missing,
}

/// Runs an external program to completion
pub trait ToolRunner {
    /// Program name, for messages
    fn name(&self) -> &str;

    /// Run with the given arguments, blocking until it exits
    fn run(&self, args: &[OsString]) -> Result<ToolStatus>;
}

/// A program looked up in `PATH`
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
}

impl Tool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ToolRunner for Tool {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[OsString]) -> Result<ToolStatus> {
        let path = match which::which(&self.program) {
            Ok(path) => path,
            Err(e) => {
                debug!(tool = %self.program, error = %e, "tool not found");
                return Ok(ToolStatus::Missing);
            }
        };

        info!(tool = %self.program, args = ?args, "running tool");
        let output = Command::new(&path)
            .args(args)
            .output()
            .map_err(|e| MetadataError::ToolFailed {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MetadataError::ToolFailed {
                tool: self.program.clone(),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(ToolStatus::Completed)
    }
}

/// The external tools used by the generators
pub struct Tools {
    /// ImageMagick, used to pad the store icon
    pub convert: Box<dyn ToolRunner>,
    /// Inkscape, used to render the splash screen
    pub inkscape: Box<dyn ToolRunner>,
}

impl Tools {
    /// Tools with custom program names
    pub fn with_names(convert: impl Into<String>, inkscape: impl Into<String>) -> Self {
        Self {
            convert: Box::new(Tool::new(convert)),
            inkscape: Box::new(Tool::new(inkscape)),
        }
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self::with_names("convert", "inkscape")
    }
}

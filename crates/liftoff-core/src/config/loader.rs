//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::ConfigFile;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        Err(e) => return Err(ConfigError::Io(e).into()),
    };

    let config: ConfigFile = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find the configuration file in the project root.
///
/// The candidates of [`config_file_names`] are checked in order and the
/// first existing one wins.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    debug!(root = %root.display(), "searching for config file");
    for name in config_file_names() {
        let config_path = root.join(name);
        if config_path.is_file() {
            info!(path = %config_path.display(), "found config file");
            return Some(config_path);
        }
    }

    debug!("no config file found");
    None
}

/// Load the configuration for a project.
///
/// An explicit path must exist. Without one, the project root is searched
/// and defaults are used when nothing is found.
pub fn load_project_config(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<(ConfigFile, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        let config = load_config(&path)?;
        return Ok((config, Some(path)));
    }

    match find_config(root) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            info!(root = %root.display(), "no config found, using defaults");
            Ok((ConfigFile::default(), None))
        }
    }
}

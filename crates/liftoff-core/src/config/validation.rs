//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::version::VersionTuple;

use super::types::ConfigFile;

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    debug!("validating configuration");
    validate_unique_name(config)?;
    validate_changes(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_unique_name(config: &ConfigFile) -> Result<()> {
    if config.unique_name.is_empty() {
        return Ok(());
    }

    let segments: Vec<&str> = config.unique_name.split('.').collect();
    let valid = segments.len() >= 2
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });

    if !valid {
        return Err(ConfigError::InvalidValue {
            field: "unique_name".to_string(),
            message: format!(
                "'{}' must be a reverse-DNS identifier like org.example.app",
                config.unique_name
            ),
        }
        .into());
    }

    Ok(())
}

fn validate_changes(config: &ConfigFile) -> Result<()> {
    for (index, change) in config.changes.iter().enumerate() {
        if VersionTuple::parse(&change.version_name).is_err() {
            return Err(ConfigError::InvalidValue {
                field: format!("changes[{}].version_name", index),
                message: format!("'{}' is not a dotted numeric version", change.version_name),
            }
            .into());
        }
    }
    Ok(())
}

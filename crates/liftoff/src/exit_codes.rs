//! Exit codes for the CLI

use liftoff_core::LiftoffError;
use liftoff_metadata::MetadataError;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Version or changelog error
pub const VERSION_ERROR: i32 = 4;

/// License could not be determined
pub const LICENSE_ERROR: i32 = 5;

/// An external tool failed
pub const TOOL_ERROR: i32 = 6;

/// Map an error chain to the process exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(metadata) = cause.downcast_ref::<MetadataError>() {
            return match metadata {
                MetadataError::Core(core) => for_core(core),
                MetadataError::License(_) => LICENSE_ERROR,
                MetadataError::ToolFailed { .. } => TOOL_ERROR,
                MetadataError::NoReleases => VERSION_ERROR,
                _ => ERROR,
            };
        }
        if let Some(core) = cause.downcast_ref::<LiftoffError>() {
            return for_core(core);
        }
    }
    ERROR
}

fn for_core(err: &LiftoffError) -> i32 {
    match err {
        LiftoffError::Config(_) => CONFIG_ERROR,
        LiftoffError::Version(_) | LiftoffError::Changelog(_) => VERSION_ERROR,
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use liftoff_core::error::ConfigError;
    use liftoff_metadata::LicenseError;
    use std::path::PathBuf;

    #[test]
    fn test_codes_follow_the_cause() {
        let license: anyhow::Result<()> =
            Err(MetadataError::License(LicenseError::Unmapped("X".to_string())).into());
        let err = license.context("failed to resolve project metadata").unwrap_err();
        assert_eq!(for_error(&err), LICENSE_ERROR);

        let config = anyhow::Error::from(LiftoffError::Config(ConfigError::NotFound(
            PathBuf::from("liftoff.yaml"),
        )));
        assert_eq!(for_error(&config), CONFIG_ERROR);

        assert_eq!(
            for_error(&anyhow::Error::from(MetadataError::NoReleases)),
            VERSION_ERROR
        );
        assert_eq!(for_error(&anyhow::anyhow!("other")), ERROR);
    }

    #[test]
    fn test_invalid_config_value_inside_metadata_error() {
        let invalid = ConfigError::InvalidValue {
            field: "unique_name".to_string(),
            message: "must be set in the config file".to_string(),
        };
        let result: anyhow::Result<()> =
            Err(MetadataError::Core(LiftoffError::Config(invalid)).into());
        let err = result.context("failed to resolve project metadata").unwrap_err();
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_core_errors_without_a_dedicated_code() {
        let io = LiftoffError::Io(std::io::Error::other("disk"));
        assert_eq!(for_error(&anyhow::Error::from(io)), ERROR);
        let changelog = LiftoffError::Changelog(liftoff_core::error::ChangelogError::FileNotFound(
            PathBuf::from("CHANGES.md"),
        ));
        assert_eq!(for_error(&anyhow::Error::from(changelog)), VERSION_ERROR);
    }
}

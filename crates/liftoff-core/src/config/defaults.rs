//! Default configuration values

/// Default configuration file, shared with the Godot Asset Library tooling
pub const DEFAULT_CONFIG_FILE: &str = "tools/assetlib.yaml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "liftoff.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "liftoff.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".liftoff.yaml";

/// Command used to launch the exported application from the desktop file
pub const DEFAULT_DESKTOP_EXEC: &str = "godot-runner %U";

/// Branch reference used in raw content URLs
pub const DEFAULT_RAW_BRANCH_REF: &str = "refs/heads/main";

/// Name of the export preset adapted for Android builds
pub const ANDROID_PRESET_NAME: &str = "Android";

/// Get list of config file names to search for, relative to the project root
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_FILE,
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
    ]
}

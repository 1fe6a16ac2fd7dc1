//! CLI definition and command handling

pub mod commands;
pub mod output;
mod project;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    AndroidCommand, CompletionsCommand, FlatpakCommand, GenerateCommand, ShowCommand,
    SplashCommand,
};

/// Liftoff - Store metadata generator for Godot projects
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Project root directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file, relative to the project root
    #[arg(long, global = true, env = "LIFTOFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `generate`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate all store metadata and packaging files
    Generate(GenerateCommand),

    /// Generate the Android store listing and export preset
    Android(AndroidCommand),

    /// Generate the Flatpak metainfo and desktop files
    Flatpak(FlatpakCommand),

    /// Update the version shown on the splash screen
    Splash(SplashCommand),

    /// Show the resolved project metadata
    Show(ShowCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            None => GenerateCommand::default().execute(self),
            Some(Commands::Generate(cmd)) => cmd.execute(self),
            Some(Commands::Android(cmd)) => cmd.execute(self),
            Some(Commands::Flatpak(cmd)) => cmd.execute(self),
            Some(Commands::Splash(cmd)) => cmd.execute(self),
            Some(Commands::Show(cmd)) => cmd.execute(self),
            Some(Commands::Completions(cmd)) => cmd.execute(self),
        }
    }

    /// Project root: `--directory` or the current directory
    pub fn project_root(&self) -> anyhow::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_generate() {
        let cli = Cli::try_parse_from(["liftoff"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "liftoff",
            "show",
            "-C",
            "/tmp/project",
            "--format",
            "json",
            "--config",
            "meta.yaml",
            "-q",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Show(_))));
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.config, Some(PathBuf::from("meta.yaml")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert_eq!(cli.project_root().unwrap(), PathBuf::from("/tmp/project"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["liftoff", "--format", "xml"]).is_err());
    }
}

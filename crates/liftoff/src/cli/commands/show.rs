//! Show command

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use liftoff_metadata::{asset_library_license, published_versions};

use crate::cli::output::{self, display_path, header, key_value, path_style, version_style};
use crate::cli::project::Project;
use crate::cli::{Cli, OutputFormat};

/// Show the resolved project metadata
#[derive(Debug, Default, Args)]
pub struct ShowCommand {
    /// Only print the last released version
    #[arg(long)]
    pub last_version: bool,
}

impl ShowCommand {
    /// Execute the show command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(last_version = self.last_version, "executing show command");
        let project = Project::load(cli)?;
        let config = &project.config;
        let root = project.workspace.root();

        let last_version = config.last_version().map(|c| c.version_name.clone());
        if self.last_version {
            let version = last_version.context("no released version in the changelog")?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "version": version }))
                }
                OutputFormat::Text => println!("{}", version),
            }
            return Ok(());
        }

        let assetlib = asset_library_license(&config.license).ok();
        let published = published_versions(&project.workspace.fastlane_locale_dir())
            .context("failed to read published changelogs")?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config_path": project
                        .config_path
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string()),
                    "config": config,
                    "last_version": last_version,
                    "asset_library_license": assetlib,
                    "published_versions": published,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", header(&config.title));
                println!();

                match &project.config_path {
                    Some(path) => println!(
                        "{}",
                        key_value(
                            "Config file",
                            &path_style().apply_to(display_path(path, root)).to_string()
                        )
                    ),
                    None => println!(
                        "{}",
                        key_value(
                            "Config file",
                            &format!("{} (using defaults)", style("not found").yellow())
                        )
                    ),
                }
                let version = match &last_version {
                    Some(v) => version_style().apply_to(v).to_string(),
                    None => style("none").dim().to_string(),
                };
                println!("{}", key_value("Last version", &version));
                println!(
                    "{}",
                    key_value(
                        "License",
                        &format!(
                            "{} (Asset Library: {})",
                            config.license,
                            assetlib.unwrap_or("unmapped")
                        )
                    )
                );
                let published = if published.is_empty() {
                    style("none").dim().to_string()
                } else {
                    published.join(", ")
                };
                println!("{}", key_value("Published", &published));
                println!();

                println!("{}", style("Resolved configuration").underlined());
                print!("{}", serde_yaml::to_string(config)?);
            }
        }

        if config.changes.is_empty() {
            output::warning("the changelog has no released versions");
        }

        Ok(())
    }
}

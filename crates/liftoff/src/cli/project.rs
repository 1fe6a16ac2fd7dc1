//! Project loading and the generation steps shared by commands

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use liftoff_core::config::load_project_config;
use liftoff_metadata::{
    generate_fastlane, update_metainfo, update_splash_version, write_desktop_file,
    CommonMarkRenderer, Config, GenerationReport, SpdxMatcher, Tools, Workspace,
};

use crate::cli::Cli;

/// External tool overrides
#[derive(Debug, Clone, Default, Args)]
pub struct ToolArgs {
    /// ImageMagick program used to pad the store icon
    #[arg(long, value_name = "PROGRAM", env = "LIFTOFF_CONVERT")]
    pub convert: Option<String>,

    /// Inkscape program used to render the splash screen
    #[arg(long, value_name = "PROGRAM", env = "LIFTOFF_INKSCAPE")]
    pub inkscape: Option<String>,
}

impl ToolArgs {
    pub fn tools(&self) -> Tools {
        Tools::with_names(
            self.convert.as_deref().unwrap_or("convert"),
            self.inkscape.as_deref().unwrap_or("inkscape"),
        )
    }
}

/// A project with its resolved configuration
pub struct Project {
    pub workspace: Workspace,
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl Project {
    /// Load the configuration file and derive everything it leaves out
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let root = cli.project_root()?;
        let (file, config_path) = load_project_config(&root, cli.config.as_deref())
            .context("failed to load configuration")?;

        let workspace = Workspace::new(&root, file.paths.clone());
        let config = Config::load(&workspace, file, &SpdxMatcher::new())
            .context("failed to resolve project metadata")?;
        info!(
            root = %root.display(),
            config = ?config_path,
            "project loaded"
        );

        Ok(Self {
            workspace,
            config,
            config_path,
        })
    }

    pub fn splash(&self, tools: &Tools, report: &mut GenerationReport) -> anyhow::Result<()> {
        let step = update_splash_version(&self.config, &self.workspace, tools)
            .context("failed to update the splash screen")?;
        report.merge(step);
        Ok(())
    }

    pub fn fastlane(&self, tools: &Tools, report: &mut GenerationReport) -> anyhow::Result<()> {
        let step = generate_fastlane(&self.config, &self.workspace, tools)
            .context("failed to generate fastlane metadata")?;
        report.merge(step);
        Ok(())
    }

    pub fn flatpak(&self, report: &mut GenerationReport) -> anyhow::Result<()> {
        let metainfo = update_metainfo(&self.config, &self.workspace, &CommonMarkRenderer)
            .context("failed to update the metainfo file")?;
        report.merge(metainfo);
        let desktop = write_desktop_file(&self.config, &self.workspace)
            .context("failed to write the desktop file")?;
        report.merge(desktop);
        Ok(())
    }
}

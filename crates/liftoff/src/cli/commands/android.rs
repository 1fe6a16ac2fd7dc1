//! Android command

use clap::Args;
use tracing::info;

use liftoff_metadata::GenerationReport;

use crate::cli::output;
use crate::cli::project::{Project, ToolArgs};
use crate::cli::Cli;

/// Generate the Android store listing and export preset
#[derive(Debug, Default, Args)]
pub struct AndroidCommand {
    #[command(flatten)]
    pub tools: ToolArgs,
}

impl AndroidCommand {
    /// Execute the android command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing android command");
        let project = Project::load(cli)?;
        let tools = self.tools.tools();

        // The feature graphic is copied from the rendered splash
        let mut report = GenerationReport::new();
        project.splash(&tools, &mut report)?;
        project.fastlane(&tools, &mut report)?;

        output::print_report(
            cli,
            project.workspace.root(),
            "Android metadata generated",
            &report,
        )
    }
}

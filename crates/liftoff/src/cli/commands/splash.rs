//! Splash command

use clap::Args;
use tracing::info;

use liftoff_metadata::GenerationReport;

use crate::cli::output;
use crate::cli::project::{Project, ToolArgs};
use crate::cli::Cli;

/// Update the version shown on the splash screen
#[derive(Debug, Default, Args)]
pub struct SplashCommand {
    #[command(flatten)]
    pub tools: ToolArgs,
}

impl SplashCommand {
    /// Execute the splash command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing splash command");
        let project = Project::load(cli)?;

        let mut report = GenerationReport::new();
        project.splash(&self.tools.tools(), &mut report)?;

        output::print_report(cli, project.workspace.root(), "Splash updated", &report)
    }
}

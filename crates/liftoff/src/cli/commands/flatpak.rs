//! Flatpak command

use clap::Args;
use tracing::info;

use liftoff_metadata::GenerationReport;

use crate::cli::output;
use crate::cli::project::Project;
use crate::cli::Cli;

/// Generate the Flatpak metainfo and desktop files
#[derive(Debug, Default, Args)]
pub struct FlatpakCommand {}

impl FlatpakCommand {
    /// Execute the flatpak command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing flatpak command");
        let project = Project::load(cli)?;

        let mut report = GenerationReport::new();
        project.flatpak(&mut report)?;

        output::print_report(
            cli,
            project.workspace.root(),
            "Flatpak metadata generated",
            &report,
        )
    }
}

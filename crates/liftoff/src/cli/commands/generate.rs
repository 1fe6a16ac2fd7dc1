//! Generate command

use clap::Args;
use tracing::info;

use liftoff_metadata::GenerationReport;

use crate::cli::output;
use crate::cli::project::{Project, ToolArgs};
use crate::cli::Cli;

/// Generate all store metadata and packaging files
#[derive(Debug, Default, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub tools: ToolArgs,

    /// Skip the splash screen update
    #[arg(long)]
    pub no_splash: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(no_splash = self.no_splash, "executing generate command");
        let project = Project::load(cli)?;
        let tools = self.tools.tools();

        let mut report = GenerationReport::new();
        if !self.no_splash {
            project.splash(&tools, &mut report)?;
        }
        project.fastlane(&tools, &mut report)?;
        project.flatpak(&mut report)?;

        output::print_report(
            cli,
            project.workspace.root(),
            "Store metadata generated",
            &report,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from(["liftoff", "generate", "--no-splash"]).unwrap();
        match cli.command {
            Some(Commands::Generate(cmd)) => {
                assert!(cmd.no_splash);
                assert!(cmd.tools.convert.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

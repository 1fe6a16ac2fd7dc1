//! Output formatting utilities

use std::path::Path;

use console::{style, Style};
use liftoff_metadata::GenerationReport;

use crate::cli::{Cli, OutputFormat};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Path relative to the project root when possible
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print the files written and warnings raised by a command
pub fn print_report(
    cli: &Cli,
    root: &Path,
    title: &str,
    report: &GenerationReport,
) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "written": report
                    .written
                    .iter()
                    .map(|p| display_path(p, root))
                    .collect::<Vec<_>>(),
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                for path in &report.written {
                    info(&path_style().apply_to(display_path(path, root)).to_string());
                }
            }
            for message in &report.warnings {
                warning(message);
            }
            if !cli.quiet {
                success(&format!(
                    "{} ({} files, {} warnings)",
                    title,
                    report.written.len(),
                    report.warnings.len()
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_path() {
        let root = PathBuf::from("/project");
        assert_eq!(
            display_path(&root.join("fastlane/title.txt"), &root),
            "fastlane/title.txt"
        );
        assert_eq!(display_path(Path::new("/elsewhere/x"), &root), "/elsewhere/x");
    }
}

use tracing::instrument;

use crate::config::Config;
use crate::workspace::{write_text, GenerationReport, Workspace};
use crate::Result;

/// Content of the freedesktop launcher entry
pub fn desktop_entry(config: &Config) -> String {
    format!(
        "[Desktop Entry]\n\
         Name={}\n\
         Comment={}\n\
         Categories={}\n\
         Icon={}\n\
         Exec={}\n\
         Type=Application\n\
         Terminal=false\n\
         StartupNotify=true\n",
        config.title,
        config.short_description,
        config.categories.join(";"),
        config.unique_name,
        config.desktop_exec,
    )
}

/// Write `{unique_name}.desktop` into the flatpak directory
#[instrument(skip_all)]
pub fn write_desktop_file(config: &Config, ws: &Workspace) -> Result<GenerationReport> {
    let mut report = GenerationReport::new();
    let path = ws
        .flatpak_dir()
        .join(format!("{}.desktop", config.unique_name));
    write_text(&path, &desktop_entry(config), &mut report)?;
    Ok(report)
}

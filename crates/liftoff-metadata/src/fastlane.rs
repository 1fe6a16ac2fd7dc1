//! Android store listing in the fastlane `supply` layout

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use liftoff_changelog::format_fastlane_entry;
use liftoff_core::code_to_version;
use liftoff_core::text::strip_emoji;
use liftoff_core::version::VersionTuple;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::presets::adapt_android_preset;
use crate::splash::splash_png;
use crate::tools::{ToolStatus, Tools};
use crate::workspace::{copy_file, ensure_dir, write_text, GenerationReport, Workspace};
use crate::{MetadataError, Result};

/// Transparent border, in pixels, added around the store icon
const ICON_PADDING: u32 = 300;

/// Write the complete fastlane metadata tree
#[instrument(skip_all)]
pub fn generate_fastlane(config: &Config, ws: &Workspace, tools: &Tools) -> Result<GenerationReport> {
    let mut report = GenerationReport::new();
    let locale_dir = ws.fastlane_locale_dir();
    ensure_dir(&locale_dir)?;
    write_text(&ws.fastlane_dir().join(".gdignore"), "", &mut report)?;

    write_descriptions(config, &locale_dir, &mut report)?;
    write_changelogs(config, &locale_dir, &mut report)?;
    copy_screenshots(ws, &locale_dir, &mut report)?;
    generate_icon(ws, &locale_dir, tools, &mut report)?;
    copy_feature_graphic(config, ws, &locale_dir, &mut report)?;
    report.merge(adapt_android_preset(config, ws)?);

    info!(
        files = report.written.len(),
        warnings = report.warnings.len(),
        "fastlane metadata generated"
    );
    Ok(report)
}

fn write_descriptions(config: &Config, locale_dir: &Path, report: &mut GenerationReport) -> Result<()> {
    write_text(
        &locale_dir.join("title.txt"),
        strip_emoji(&config.title).trim(),
        report,
    )?;
    write_text(
        &locale_dir.join("short_description.txt"),
        strip_emoji(&config.short_description).trim(),
        report,
    )?;
    write_text(
        &locale_dir.join("full_description.txt"),
        &config.full_description,
        report,
    )
}

fn write_changelogs(config: &Config, locale_dir: &Path, report: &mut GenerationReport) -> Result<()> {
    let changelog_dir = locale_dir.join("changelogs");
    ensure_dir(&changelog_dir)?;
    for change in &config.changes {
        let code = change.version_code()?;
        write_text(
            &changelog_dir.join(format!("{}.txt", code)),
            &format_fastlane_entry(change),
            report,
        )?;
    }
    Ok(())
}

fn copy_screenshots(ws: &Workspace, locale_dir: &Path, report: &mut GenerationReport) -> Result<()> {
    let target_dir = locale_dir.join("images").join("phoneScreenshots");
    let screenshots = list_files(&ws.screenshots_dir(), "*.png")?;
    if screenshots.is_empty() {
        report.warn(format!(
            "No PNG screenshots found in {}",
            ws.screenshots_dir().display()
        ));
        return Ok(());
    }

    for screenshot in screenshots {
        let Some(name) = screenshot.file_name() else {
            continue;
        };
        copy_file(&screenshot, &target_dir.join(name), report)?;
    }
    Ok(())
}

/// Pad the icon so store launchers can crop it without cutting the artwork
fn generate_icon(
    ws: &Workspace,
    locale_dir: &Path,
    tools: &Tools,
    report: &mut GenerationReport,
) -> Result<()> {
    let icon = ws.icon();
    if !icon.is_file() {
        report.warn(format!("Icon {} not found; store icon not generated", icon.display()));
        return Ok(());
    }

    let images_dir = locale_dir.join("images");
    ensure_dir(&images_dir)?;
    let target = images_dir.join("icon.png");
    let pad = ICON_PADDING;
    let args: Vec<OsString> = vec![
        icon.into_os_string(),
        "-set".into(),
        "option:distort:viewport".into(),
        format!("%[fx:w+{}]x%[fx:h+{}]-{}-{}", 2 * pad, 2 * pad, pad, pad).into(),
        "-virtual-pixel".into(),
        "Edge".into(),
        "-distort".into(),
        "SRT".into(),
        "0".into(),
        "+repage".into(),
        target.clone().into_os_string(),
    ];

    match tools.convert.run(&args)? {
        ToolStatus::Completed => report.wrote(target),
        ToolStatus::Missing => report.warn(format!(
            "{} not found; store icon not generated",
            tools.convert.name()
        )),
    }
    Ok(())
}

fn copy_feature_graphic(
    config: &Config,
    ws: &Workspace,
    locale_dir: &Path,
    report: &mut GenerationReport,
) -> Result<()> {
    let Some(png) = splash_png(config, ws) else {
        debug!("no splash screen; skipping feature graphic");
        return Ok(());
    };
    if !png.is_file() {
        report.warn(format!(
            "Splash {} not found; feature graphic not updated",
            png.display()
        ));
        return Ok(());
    }
    copy_file(
        &png,
        &locale_dir.join("images").join("featureGraphic.png"),
        report,
    )
}

/// Versions that already have a fastlane changelog, lowest first
pub fn published_versions(locale_dir: &Path) -> Result<Vec<String>> {
    let mut versions = Vec::new();
    for path in list_files(&locale_dir.join("changelogs"), "*.txt")? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match code_to_version(stem) {
            Ok(version) => versions.push(version),
            Err(e) => debug!(path = %path.display(), error = %e, "not a version changelog"),
        }
    }

    versions.sort_by_cached_key(|v| VersionTuple::parse(v).ok());
    Ok(versions)
}

fn list_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let paths = glob::glob(&pattern).map_err(|e| MetadataError::InvalidFormat(e.to_string()))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| MetadataError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{load, project};
    use crate::tools::tests::{fake_tools, missing_tools};
    use tempfile::TempDir;

    const TEMPLATE: &str = "[preset.0]\n\nname=\"Android\"\nexport_path=\"\"\n\n[preset.0.options]\n\nversion/code=1\n";

    fn android_project() -> TempDir {
        let temp = project();
        std::fs::create_dir_all(temp.path().join("tools")).unwrap();
        std::fs::write(
            temp.path().join("tools/export_presets_template.cfg"),
            TEMPLATE,
        )
        .unwrap();
        std::fs::create_dir_all(temp.path().join("screenshots")).unwrap();
        std::fs::write(temp.path().join("screenshots/main.png"), b"png").unwrap();
        std::fs::write(temp.path().join("screenshots/notes.txt"), b"skip").unwrap();
        std::fs::write(temp.path().join("icon.png"), b"icon").unwrap();
        temp
    }

    #[test]
    fn test_generate_fastlane_tree() {
        let temp = android_project();
        let mut config = load(&temp);
        config.title = "Dice Roller 🎲".to_string();
        let ws = Workspace::new(temp.path(), Default::default());
        let (tools, convert, _) = fake_tools();

        let report = generate_fastlane(&config, &ws, &tools).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let locale = ws.fastlane_locale_dir();
        assert!(temp.path().join("fastlane/.gdignore").is_file());
        assert_eq!(
            std::fs::read_to_string(locale.join("title.txt")).unwrap(),
            "Dice Roller"
        );
        assert_eq!(
            std::fs::read_to_string(locale.join("full_description.txt")).unwrap(),
            config.full_description
        );
        assert_eq!(
            std::fs::read_to_string(locale.join("changelogs/011000.txt")).unwrap(),
            "## 1.10.0 (2025-03-01)\n\n- Second release\n\n"
        );
        assert!(locale.join("changelogs/010902.txt").is_file());
        assert!(locale.join("images/phoneScreenshots/main.png").is_file());
        assert!(!locale.join("images/phoneScreenshots/notes.txt").exists());
        assert!(locale.join("images/icon.png").is_file());
        assert!(ws.presets().is_file());

        let calls = convert.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][3], OsString::from("%[fx:w+600]x%[fx:h+600]-300-300"));
    }

    #[test]
    fn test_missing_tools_and_assets_are_warnings() {
        let temp = android_project();
        std::fs::remove_dir_all(temp.path().join("screenshots")).unwrap();
        let mut config = load(&temp);
        config.splash = Some(PathBuf::from("splash.svg"));
        let ws = Workspace::new(temp.path(), Default::default());

        let report = generate_fastlane(&config, &ws, &missing_tools()).unwrap();

        assert_eq!(report.warnings.len(), 3, "{:?}", report.warnings);
        assert!(!ws.fastlane_locale_dir().join("images/icon.png").exists());
        assert!(ws.fastlane_locale_dir().join("title.txt").is_file());
    }

    #[test]
    fn test_feature_graphic_from_splash() {
        let temp = android_project();
        std::fs::write(temp.path().join("splash.png"), b"splash").unwrap();
        let mut config = load(&temp);
        config.splash = Some(PathBuf::from("splash.svg"));
        let ws = Workspace::new(temp.path(), Default::default());
        let (tools, _, _) = fake_tools();

        generate_fastlane(&config, &ws, &tools).unwrap();
        assert_eq!(
            std::fs::read(ws.fastlane_locale_dir().join("images/featureGraphic.png")).unwrap(),
            b"splash"
        );
    }

    #[test]
    fn test_published_versions() {
        let temp = TempDir::new().unwrap();
        let changelogs = temp.path().join("changelogs");
        std::fs::create_dir_all(&changelogs).unwrap();
        for name in ["011000.txt", "010902.txt", "0203.txt", "README.txt"] {
            std::fs::write(changelogs.join(name), "").unwrap();
        }

        assert_eq!(
            published_versions(temp.path()).unwrap(),
            vec!["1.9.2", "1.10.0", "2.3"]
        );
    }

    #[test]
    fn test_published_versions_without_changelogs() {
        let temp = TempDir::new().unwrap();
        assert!(published_versions(temp.path()).unwrap().is_empty());
    }
}

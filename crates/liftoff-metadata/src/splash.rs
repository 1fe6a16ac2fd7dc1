//! Version label of the splash screen.
//!
//! The splash SVG carries a `<text id="version"><tspan>…</tspan></text>`
//! element. The document is streamed event by event and only the tspan
//! text is replaced, so the Inkscape specific markup survives untouched.

use std::ffi::OsString;
use std::path::PathBuf;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::tools::{ToolStatus, Tools};
use crate::workspace::{read_required, write_text, GenerationReport, Workspace};
use crate::{MetadataError, Result};

const SVG_NAMESPACE: &[u8] = b"http://www.w3.org/2000/svg";
const VERSION_ID: &str = "version";

/// Result of setting the version label of an SVG document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLabel {
    /// The document has no version label
    Missing,
    /// The label already shows the version
    Current,
    /// The label was changed
    Changed {
        previous: String,
        document: String,
    },
}

/// PNG rendering of the splash screen, if one is configured
pub fn splash_png(config: &Config, ws: &Workspace) -> Option<PathBuf> {
    config
        .splash
        .as_ref()
        .map(|svg| ws.path(svg).with_extension("png"))
}

/// Put the last version on the splash screen and render it to PNG
#[instrument(skip_all)]
pub fn update_splash_version(
    config: &Config,
    ws: &Workspace,
    tools: &Tools,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::new();
    let Some(splash) = &config.splash else {
        info!("no splash screen configured");
        return Ok(report);
    };

    let svg_path = ws.path(splash);
    let version = &config.require_last_version()?.version_name;
    let svg = read_required(&svg_path)?;

    match set_version_label(&svg, version)? {
        VersionLabel::Missing => {
            report.warn(format!(
                "No text element with id '{}' found in {}",
                VERSION_ID,
                svg_path.display()
            ));
            return Ok(report);
        }
        VersionLabel::Current => {
            info!(version = %version, "splash screen version already up to date");
            return Ok(report);
        }
        VersionLabel::Changed { previous, document } => {
            info!(from = %previous, to = %version, "updating splash screen version");
            write_text(&svg_path, &document, &mut report)?;
        }
    }

    let png_path = svg_path.with_extension("png");
    let mut export_filename = OsString::from("--export-filename=");
    export_filename.push(&png_path);
    let args = [
        svg_path.clone().into_os_string(),
        OsString::from("--export-type=png"),
        export_filename,
    ];

    match tools.inkscape.run(&args)? {
        ToolStatus::Completed => report.wrote(png_path),
        ToolStatus::Missing => report.warn(format!(
            "{} not found; splash png not updated",
            tools.inkscape.name()
        )),
    }
    Ok(report)
}

/// Replace the text of the version label of an SVG document
pub fn set_version_label(svg: &str, version: &str) -> Result<VersionLabel> {
    let mut reader = NsReader::from_str(svg);
    let mut writer = Writer::new(Vec::new());

    // depth inside the version <text>, when in one
    let mut label_depth: Option<usize> = None;
    let mut in_tspan = false;
    let mut previous: Option<String> = None;

    loop {
        let (namespace, event) = reader.read_resolved_event().map_err(xml_error)?;
        let is_svg = matches!(namespace, ResolveResult::Bound(Namespace(ns)) if ns == SVG_NAMESPACE);

        match event {
            Event::Eof => break,
            Event::Start(start) => {
                if let Some(depth) = label_depth.as_mut() {
                    *depth += 1;
                    if previous.is_none() && *depth == 1 && is_svg && local_name_is(&start, b"tspan") {
                        in_tspan = true;
                        previous = Some(String::new());
                    }
                } else if previous.is_none() && is_svg && is_version_text(&start)? {
                    label_depth = Some(0);
                }
                write(&mut writer, Event::Start(start))?;
            }
            Event::Empty(empty) => {
                let depth = label_depth.unwrap_or_default();
                if label_depth.is_some()
                    && previous.is_none()
                    && depth == 0
                    && is_svg
                    && local_name_is(&empty, b"tspan")
                {
                    previous = Some(String::new());
                    write(&mut writer, Event::Start(empty.borrow()))?;
                    write(&mut writer, Event::Text(BytesText::new(version)))?;
                    write(&mut writer, Event::End(empty.to_end()))?;
                } else {
                    write(&mut writer, Event::Empty(empty))?;
                }
            }
            Event::Text(text) if in_tspan => {
                let content = text.unescape().map_err(xml_error)?;
                if let Some(previous) = previous.as_mut() {
                    previous.push_str(&content);
                }
            }
            Event::CData(data) if in_tspan => {
                if let Some(previous) = previous.as_mut() {
                    previous.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(end) => {
                if in_tspan && label_depth == Some(1) {
                    in_tspan = false;
                    write(&mut writer, Event::Text(BytesText::new(version)))?;
                }
                label_depth = match label_depth {
                    Some(0) | None => None,
                    Some(depth) => Some(depth - 1),
                };
                write(&mut writer, Event::End(end))?;
            }
            other => write(&mut writer, other)?,
        }
    }

    let Some(previous) = previous else {
        return Ok(VersionLabel::Missing);
    };
    debug!(previous = %previous, "found splash version label");
    if previous.trim() == version {
        return Ok(VersionLabel::Current);
    }

    let document = String::from_utf8(writer.into_inner())
        .map_err(|e| MetadataError::Xml(format!("rewritten SVG is not UTF-8: {}", e)))?;
    Ok(VersionLabel::Changed { previous, document })
}

fn local_name_is(start: &BytesStart<'_>, name: &[u8]) -> bool {
    start.local_name().as_ref() == name
}

fn is_version_text(start: &BytesStart<'_>) -> Result<bool> {
    if !local_name_is(start, b"text") {
        return Ok(false);
    }
    let id = start.try_get_attribute("id").map_err(xml_error)?;
    Ok(id.is_some_and(|attr| attr.value.as_ref() == VERSION_ID.as_bytes()))
}

pub(crate) fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

pub(crate) fn xml_error(err: impl std::fmt::Display) -> MetadataError {
    MetadataError::Xml(err.to_string())
}

//! AppStream metainfo descriptor.
//!
//! The existing document is streamed event by event. Only the direct
//! children of `<component>` that liftoff manages are replaced, so comments,
//! translated elements and the original layout survive.

use liftoff_core::config::DEFAULT_RAW_BRANCH_REF;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;
use tracing::{debug, info, instrument};
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::captions::preview_caption;
use crate::config::Config;
use crate::markup::{insert_markdown, markdown_to_plain, MarkdownRenderer};
use crate::splash::{write, xml_error};
use crate::workspace::{read_optional, write_text, GenerationReport, Workspace};
use crate::{MetadataError, Result};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

const EMPTY_METAINFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<component type="desktop-application"></component>
"#;

const DEFAULT_INDENT: &str = "  ";

/// AppStream `url` kinds written to the descriptor
const URL_TYPES: &[&str] = &["homepage", "vcs-browser", "bugtracker"];

/// Update `{unique_name}.metainfo.xml` in the flatpak directory
#[instrument(skip_all)]
pub fn update_metainfo(
    config: &Config,
    ws: &Workspace,
    renderer: &dyn MarkdownRenderer,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::new();
    let path = ws
        .flatpak_dir()
        .join(format!("{}.metainfo.xml", config.unique_name));

    let original = match read_optional(&path)? {
        Some(content) => content,
        None => {
            info!(path = %path.display(), "creating new metainfo file");
            EMPTY_METAINFO.to_string()
        }
    };

    let document = rewrite_metainfo(&original, config, ws, renderer, &mut report)?;
    write_text(&path, &document, &mut report)?;
    Ok(report)
}

/// A child of `<component>` owned by liftoff
struct Managed {
    /// Element name, or `url:{type}` for urls
    key: String,
    /// Serialized replacement, `None` drops the element
    fragment: Option<String>,
    emitted: bool,
}

enum Claim<'m> {
    Keep,
    Replace(&'m str),
    Remove,
}

/// What the existing document already contains
struct Layout {
    keys: Vec<String>,
    indent: String,
}

/// Rewrite a metainfo document from the configuration
pub fn rewrite_metainfo(
    document: &str,
    config: &Config,
    ws: &Workspace,
    renderer: &dyn MarkdownRenderer,
    report: &mut GenerationReport,
) -> Result<String> {
    let layout = scan_children(document)?;
    let mut managed = managed_elements(config, ws, renderer, &layout.indent, report)?;
    let indent = layout.indent.as_str();

    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Vec::new());
    if !document.trim_start().starts_with("<?xml") {
        writer.get_mut().extend_from_slice(XML_DECLARATION.as_bytes());
    }

    // open elements, the root included
    let mut depth = 0usize;
    // blank text between root children, held until the next sibling is known
    let mut pending: Option<BytesText<'_>> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,
            Event::Text(text) if depth == 1 && is_blank(&text) => {
                flush(&mut writer, pending.replace(text))?;
            }
            Event::Start(start) if depth == 0 => {
                write(&mut writer, Event::Start(start))?;
                depth = 1;
            }
            Event::Empty(empty) if depth == 0 => {
                write(&mut writer, Event::Start(empty.borrow()))?;
                append_missing(&mut writer, &mut managed, indent, |_| true);
                writer.get_mut().push(b'\n');
                write(&mut writer, Event::End(empty.to_end()))?;
            }
            Event::Start(start) if depth == 1 => {
                let key = child_key(&start)?;
                match claim(&mut managed, &key) {
                    Claim::Keep => {
                        flush(&mut writer, pending.take())?;
                        write(&mut writer, Event::Start(start))?;
                        depth += 1;
                    }
                    Claim::Replace(fragment) => {
                        flush(&mut writer, pending.take())?;
                        writer.get_mut().extend_from_slice(fragment.as_bytes());
                        reader.read_to_end(start.name()).map_err(xml_error)?;
                        after_child(&mut writer, &mut managed, &layout, indent, &key);
                    }
                    Claim::Remove => {
                        pending = None;
                        reader.read_to_end(start.name()).map_err(xml_error)?;
                    }
                }
            }
            Event::Empty(empty) if depth == 1 => {
                let key = child_key(&empty)?;
                match claim(&mut managed, &key) {
                    Claim::Keep => {
                        flush(&mut writer, pending.take())?;
                        write(&mut writer, Event::Empty(empty))?;
                    }
                    Claim::Replace(fragment) => {
                        flush(&mut writer, pending.take())?;
                        writer.get_mut().extend_from_slice(fragment.as_bytes());
                    }
                    Claim::Remove => pending = None,
                }
                after_child(&mut writer, &mut managed, &layout, indent, &key);
            }
            Event::End(end) if depth == 1 => {
                append_missing(&mut writer, &mut managed, indent, |_| true);
                match pending.take() {
                    Some(text) => write(&mut writer, Event::Text(text))?,
                    None => writer.get_mut().push(b'\n'),
                }
                write(&mut writer, Event::End(end))?;
                depth = 0;
            }
            Event::End(end) => {
                let key = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                write(&mut writer, Event::End(end))?;
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    after_child(&mut writer, &mut managed, &layout, indent, &key);
                }
            }
            Event::Start(start) => {
                write(&mut writer, Event::Start(start))?;
                depth += 1;
            }
            other => {
                flush(&mut writer, pending.take())?;
                write(&mut writer, other)?;
            }
        }
    }

    let mut document = String::from_utf8(writer.into_inner())
        .map_err(|e| MetadataError::Xml(format!("metainfo is not UTF-8: {}", e)))?;
    if !document.ends_with('\n') {
        document.push('\n');
    }
    Ok(document)
}

/// Collect the keys of the root children and the indentation they use
fn scan_children(document: &str) -> Result<Layout> {
    let mut reader = Reader::from_str(document);
    let mut keys = Vec::new();
    let mut indent = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,
            Event::Start(start) => {
                if depth == 1 {
                    keys.push(child_key(&start)?);
                }
                depth += 1;
            }
            Event::Empty(empty) if depth == 1 => keys.push(child_key(&empty)?),
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) if depth == 1 && indent.is_none() && is_blank(&text) => {
                let text = String::from_utf8_lossy(&text);
                if let Some((_, last)) = text.rsplit_once('\n') {
                    if !last.is_empty() {
                        indent = Some(last.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    let indent = indent.unwrap_or_else(|| DEFAULT_INDENT.to_string());
    debug!(children = keys.len(), indent = ?indent, "scanned metainfo");
    Ok(Layout { keys, indent })
}

/// Every managed element in the order missing ones are appended
fn managed_elements(
    config: &Config,
    ws: &Workspace,
    renderer: &dyn MarkdownRenderer,
    indent: &str,
    report: &mut GenerationReport,
) -> Result<Vec<Managed>> {
    let mut elements = vec![
        text_element("name", &config.title),
        text_element("summary", &config.short_description),
    ];

    let mut description = Element::new("description");
    insert_markdown(&mut description, &config.full_description, renderer)?;
    elements.push(description);

    elements.push(text_element("id", &config.unique_name));
    elements.push(with_type(text_element("icon", &config.unique_name), "stock"));
    elements.push(with_type(
        text_element("launchable", &format!("{}.desktop", config.unique_name)),
        "desktop-id",
    ));
    elements.push(screenshots(config, ws, report));
    elements.push(text_element("project_license", &config.license));

    let mut releases = Element::new("releases");
    for change in &config.changes {
        let mut release = Element::new("release");
        release
            .attributes
            .insert("version".to_string(), change.version_name.clone());
        release
            .attributes
            .insert("date".to_string(), change.date_string());
        let mut notes = Element::new("description");
        insert_markdown(&mut notes, &change.notes_md, renderer)?;
        release.children.push(XMLNode::Element(notes));
        releases.children.push(XMLNode::Element(release));
    }
    elements.push(releases);

    let mut managed = elements
        .iter()
        .map(|element| -> Result<Managed> {
            Ok(Managed {
                key: element.name.clone(),
                fragment: Some(serialize(element, indent)?),
                emitted: false,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for &url_type in URL_TYPES {
        let value = match url_type {
            "bugtracker" => config.issues_url.as_deref(),
            _ => config.repo_url.as_deref(),
        };
        let fragment = match value {
            Some(value) => {
                let url = with_type(text_element("url", value), url_type);
                Some(serialize(&url, indent)?)
            }
            None => {
                report.warn(format!("No {} URL known; omitting it from metainfo", url_type));
                None
            }
        };
        managed.push(Managed {
            key: format!("url:{}", url_type),
            fragment,
            emitted: false,
        });
    }

    for element in [
        list_element("categories", "category", &config.categories),
        list_element("keywords", "keyword", &config.keywords),
    ] {
        managed.push(Managed {
            key: element.name.clone(),
            fragment: Some(serialize(&element, indent)?),
            emitted: false,
        });
    }
    Ok(managed)
}

/// Decide what happens to a root child. Only the first occurrence of a
/// managed element is replaced; urls without a value are always dropped.
fn claim<'m>(managed: &'m mut [Managed], key: &str) -> Claim<'m> {
    let Some(entry) = managed.iter_mut().find(|m| m.key == key) else {
        return Claim::Keep;
    };
    if entry.fragment.is_none() {
        return Claim::Remove;
    }
    if entry.emitted {
        return Claim::Keep;
    }
    entry.emitted = true;
    let entry: &'m Managed = entry;
    match entry.fragment.as_deref() {
        Some(fragment) => Claim::Replace(fragment),
        None => Claim::Remove,
    }
}

/// New url elements go right after `content_rating`
fn after_child(
    writer: &mut Writer<Vec<u8>>,
    managed: &mut [Managed],
    layout: &Layout,
    indent: &str,
    key: &str,
) {
    if key == "content_rating" {
        append_missing(writer, managed, indent, |key| {
            key.starts_with("url:") && !layout.keys.iter().any(|k| k == key)
        });
    }
}

fn append_missing(
    writer: &mut Writer<Vec<u8>>,
    managed: &mut [Managed],
    indent: &str,
    wanted: impl Fn(&str) -> bool,
) {
    for entry in managed.iter_mut().filter(|m| !m.emitted && wanted(&m.key)) {
        entry.emitted = true;
        if let Some(fragment) = &entry.fragment {
            let out = writer.get_mut();
            out.push(b'\n');
            out.extend_from_slice(indent.as_bytes());
            out.extend_from_slice(fragment.as_bytes());
        }
    }
}

fn flush(writer: &mut Writer<Vec<u8>>, pending: Option<BytesText<'_>>) -> Result<()> {
    match pending {
        Some(text) => write(writer, Event::Text(text)),
        None => Ok(()),
    }
}

fn child_key(start: &BytesStart<'_>) -> Result<String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    if name != "url" {
        return Ok(name);
    }
    let kind = start.try_get_attribute("type").map_err(xml_error)?;
    Ok(match kind {
        Some(attr) => format!("url:{}", String::from_utf8_lossy(&attr.value)),
        None => name,
    })
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

/// Serialize an element to sit at `indent` inside the root
fn serialize(element: &Element, indent: &str) -> Result<String> {
    let mut output = Vec::new();
    element
        .write_with_config(
            &mut output,
            EmitterConfig::new()
                .perform_indent(true)
                .indent_string(indent.to_string())
                .write_document_declaration(false),
        )
        .map_err(xml_error)?;
    let fragment = String::from_utf8(output)
        .map_err(|e| MetadataError::Xml(format!("metainfo is not UTF-8: {}", e)))?;
    Ok(fragment.trim().replace('\n', &format!("\n{}", indent)))
}

fn screenshots(config: &Config, ws: &Workspace, report: &mut GenerationReport) -> Element {
    let mut screenshots = Element::new("screenshots");

    let Some(repo_raw) = config.repo_raw.as_deref() else {
        report.warn("No raw repository URL known; metainfo screenshots left empty");
        return screenshots;
    };
    let Some(last) = config.last_version() else {
        report.warn("No release known; metainfo screenshots left empty");
        return screenshots;
    };

    let tag = format!("{}-{}", config.repo_name, last.version_name);
    let prefix = repo_raw.replace(DEFAULT_RAW_BRANCH_REF, &tag);

    for preview in &config.previews {
        let Some(image) = preview.repoimage.as_deref() else {
            continue;
        };

        let mut screenshot = Element::new("screenshot");
        if screenshots.children.is_empty() {
            screenshot
                .attributes
                .insert("type".to_string(), "default".to_string());
        }

        let url = format!("{}/{}", prefix.trim_end_matches('/'), image);
        debug!(url = %url, "adding screenshot");
        screenshot
            .children
            .push(XMLNode::Element(text_element("image", &url)));

        if let Some(caption) = preview_caption(preview, ws.root()) {
            screenshot.children.push(XMLNode::Element(text_element(
                "caption",
                &markdown_to_plain(&caption),
            )));
        }
        screenshots.children.push(XMLNode::Element(screenshot));
    }
    screenshots
}

fn text_element(name: &str, text: &str) -> Element {
    let mut element = Element::new(name);
    element.children.push(XMLNode::Text(text.to_string()));
    element
}

fn with_type(mut element: Element, kind: &str) -> Element {
    element
        .attributes
        .insert("type".to_string(), kind.to_string());
    element
}

fn list_element(name: &str, item: &str, values: &[String]) -> Element {
    let mut list = Element::new(name);
    for value in values {
        list.children
            .push(XMLNode::Element(text_element(item, value)));
    }
    list
}

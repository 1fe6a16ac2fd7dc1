//! Godot export presets.
//!
//! `export_presets.cfg` is an INI-like file of `[section]` headers and
//! `key=value` lines where values are Godot variants. Edits are done line
//! by line so everything the generator does not touch (comments, ordering,
//! multi-line dictionaries) is written back exactly as it was read.

use std::fmt;
use std::path::Path;

use liftoff_core::config::ANDROID_PRESET_NAME;
use liftoff_core::version_code_number;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::workspace::{read_required, write_text, GenerationReport, Workspace};
use crate::{MetadataError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Entry {
        key: String,
        value: String,
        /// Original text, dropped once the value is changed
        raw: Option<String>,
    },
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// `None` for the lines before the first header
    name: Option<String>,
    header: String,
    items: Vec<Item>,
}

impl Section {
    fn entry(&self, key: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            Item::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    fn set(&mut self, key: &str, encoded: String) {
        for item in self.items.iter_mut() {
            if let Item::Entry { key: k, value, raw } = item {
                if k == key {
                    *value = encoded;
                    *raw = None;
                    return;
                }
            }
        }

        let position = self
            .items
            .iter()
            .rposition(|item| matches!(item, Item::Entry { .. }))
            .map(|i| i + 1)
            .unwrap_or(self.items.len());
        self.items.insert(
            position,
            Item::Entry {
                key: key.to_string(),
                value: encoded,
                raw: None,
            },
        );
    }
}

/// An export presets document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFile {
    sections: Vec<Section>,
}

impl PresetFile {
    /// Parse the text of a presets file
    pub fn parse(text: &str) -> Self {
        let mut sections = vec![Section {
            name: None,
            header: String::new(),
            items: Vec::new(),
        }];
        let mut lines = text.split('\n');

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                sections.push(Section {
                    name: Some(trimmed[1..trimmed.len() - 1].trim().to_string()),
                    header: line.to_string(),
                    items: Vec::new(),
                });
                continue;
            }

            let item = match split_entry(line) {
                Some((key, first)) => {
                    let mut value = first.to_string();
                    let mut raw = line.to_string();
                    while !is_complete(&value) {
                        match lines.next() {
                            Some(next) => {
                                value.push('\n');
                                value.push_str(next);
                                raw.push('\n');
                                raw.push_str(next);
                            }
                            None => break,
                        }
                    }
                    Item::Entry {
                        key: key.to_string(),
                        value,
                        raw: Some(raw),
                    }
                }
                None => Item::Raw(line.to_string()),
            };

            if let Some(section) = sections.last_mut() {
                section.items.push(item);
            }
        }

        Self { sections }
    }

    /// Names of all sections, in document order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|s| s.name.as_deref())
    }

    /// Raw value of a key
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.entry(key)
    }

    /// Set a key to a JSON-encoded value, appending it when new
    pub fn set<T: Serialize + ?Sized>(&mut self, section: &str, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        let target = self
            .sections
            .iter_mut()
            .find(|s| s.name.as_deref() == Some(section))
            .ok_or_else(|| MetadataError::Preset(format!("section [{}] not found", section)))?;
        debug!(section, key, value = %raw, "setting preset value");
        target.set(key, raw);
        Ok(())
    }

    /// The options section of the preset with the given name
    pub fn named_preset(&self, name: &str) -> Result<(String, String)> {
        for section in self.section_names() {
            let Some(index) = section.strip_prefix("preset.") else {
                continue;
            };
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }

            let preset_name = self
                .get(section, "name")
                .and_then(|raw| serde_json::from_str::<String>(raw).ok());
            debug!(section, name = ?preset_name, "found preset");
            if preset_name.as_deref() != Some(name) {
                continue;
            }

            let options = format!("{}.options", section);
            if self.section(&options).is_none() {
                return Err(MetadataError::Preset(format!(
                    "preset '{}' has no [{}] section",
                    name, options
                )));
            }
            return Ok((section.to_string(), options));
        }

        Err(MetadataError::Preset(format!(
            "no export preset named '{}'",
            name
        )))
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
    }
}

impl fmt::Display for PresetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::new();
        for section in &self.sections {
            if section.name.is_some() {
                lines.push(section.header.clone());
            }
            for item in &section.items {
                match item {
                    Item::Entry { raw: Some(raw), .. } => lines.push(raw.clone()),
                    Item::Entry { key, value, .. } => lines.push(format!("{}={}", key, value)),
                    Item::Raw(raw) => lines.push(raw.clone()),
                }
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim_start()))
}

/// Whether a value has no open string or bracket left
fn is_complete(value: &str) -> bool {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in value.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            _ => {}
        }
    }
    !in_string && depth <= 0
}

/// Path of an Android build artifact
fn android_export_path(build_dir: &Path, title: &str) -> String {
    let name = title.replace(' ', "-").to_lowercase();
    let dir = build_dir.to_string_lossy();
    format!("{}/{}.apk", dir.trim_end_matches('/'), name)
}

/// Path of the padded store icon generated by the fastlane step
pub fn fastlane_icon_path(ws: &Workspace) -> String {
    let dir = ws.layout().fastlane_locale_dir.to_string_lossy().into_owned();
    format!("{}/images/icon.png", dir.trim_end_matches('/'))
}

/// Write `export_presets.cfg` from the template with the Android preset
/// pointing at the current release
#[instrument(skip_all)]
pub fn adapt_android_preset(config: &Config, ws: &Workspace) -> Result<GenerationReport> {
    let mut report = GenerationReport::new();
    let template_path = ws.presets_template();
    let mut presets = PresetFile::parse(&read_required(&template_path)?);

    let last = config.require_last_version()?;
    let code = version_code_number(&last.version_code()?)?;
    let (preset, options) = presets.named_preset(ANDROID_PRESET_NAME)?;
    info!(preset = %preset, version = %last.version_name, code, "adapting android preset");

    let export_path = android_export_path(&ws.layout().android_build_dir, &config.title);
    presets.set(&preset, "export_path", &export_path)?;
    presets.set(&options, "version/name", &last.version_name)?;
    presets.set(&options, "version/code", &code)?;
    presets.set(&options, "package/name", &config.title)?;
    presets.set(&options, "package/unique_name", &config.unique_name)?;
    presets.set(&options, "launcher_icons/main_192x192", &fastlane_icon_path(ws))?;

    write_text(&ws.presets(), &presets.to_string(), &mut report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{load, project};

    const TEMPLATE: &str = r#"[preset.0]

name="Linux"
platform="Linux"
export_path=""

[preset.0.options]

binary_format/embed_pck=false

[preset.1]

name="Android"
platform="Android"
runnable=true
export_filter="all_resources"
; kept comment
export_path=""

[preset.1.options]

custom_template/debug=""
version/code=1
version/name=""
package/unique_name="com.example.$genname"
package/name=""
permissions/custom_permissions=PackedStringArray()
gradle_build/custom_theme_attributes={
"android:windowSwipeToDismiss": false
}

"#;

    #[test]
    fn test_parse_and_print_is_lossless() {
        let presets = PresetFile::parse(TEMPLATE);
        assert_eq!(presets.to_string(), TEMPLATE);

        let spaced = "[a]\nkey = \"value\"\n";
        assert_eq!(PresetFile::parse(spaced).to_string(), spaced);
    }

    #[test]
    fn test_multiline_values_are_one_entry() {
        let presets = PresetFile::parse(TEMPLATE);
        let value = presets
            .get("preset.1.options", "gradle_build/custom_theme_attributes")
            .unwrap();
        assert!(value.starts_with('{'));
        assert!(value.ends_with('}'));
        assert!(presets
            .get("preset.1.options", "\"android:windowSwipeToDismiss\": false")
            .is_none());
    }

    #[test]
    fn test_named_preset() {
        let presets = PresetFile::parse(TEMPLATE);
        assert_eq!(
            presets.named_preset("Android").unwrap(),
            ("preset.1".to_string(), "preset.1.options".to_string())
        );
        assert!(matches!(
            presets.named_preset("iOS"),
            Err(MetadataError::Preset(_))
        ));
    }

    #[test]
    fn test_set_replaces_and_appends() {
        let mut presets = PresetFile::parse("[a]\n\nx=1\n\n[b]\ny=2\n");
        presets.set("a", "x", &5).unwrap();
        presets.set("a", "z", "new").unwrap();
        assert_eq!(presets.to_string(), "[a]\n\nx=5\nz=\"new\"\n\n[b]\ny=2\n");
        assert!(presets.set("missing", "k", &1).is_err());
    }

    #[test]
    fn test_adapt_android_preset() {
        let temp = project();
        std::fs::create_dir_all(temp.path().join("tools")).unwrap();
        std::fs::write(
            temp.path().join("tools/export_presets_template.cfg"),
            TEMPLATE,
        )
        .unwrap();
        let config = load(&temp);
        let ws = Workspace::new(temp.path(), Default::default());

        let report = adapt_android_preset(&config, &ws).unwrap();
        assert_eq!(report.written, vec![ws.presets()]);

        let written = std::fs::read_to_string(ws.presets()).unwrap();
        let presets = PresetFile::parse(&written);
        assert_eq!(
            presets.get("preset.1", "export_path"),
            Some("\"build/android/dice-roller.apk\"")
        );
        assert_eq!(presets.get("preset.1.options", "version/code"), Some("11000"));
        assert_eq!(
            presets.get("preset.1.options", "version/name"),
            Some("\"1.10.0\"")
        );
        assert_eq!(
            presets.get("preset.1.options", "package/unique_name"),
            Some("\"net.example.dice\"")
        );
        assert_eq!(
            presets.get("preset.1.options", "launcher_icons/main_192x192"),
            Some("\"fastlane/metadata/android/en-US/images/icon.png\"")
        );
        assert_eq!(presets.get("preset.0", "export_path"), Some("\"\""));
        assert!(written.contains("; kept comment\n"));
        assert!(written.contains("permissions/custom_permissions=PackedStringArray()\n"));
    }

    #[test]
    fn test_missing_android_preset_is_fatal() {
        let temp = project();
        std::fs::create_dir_all(temp.path().join("tools")).unwrap();
        std::fs::write(
            temp.path().join("tools/export_presets_template.cfg"),
            "[preset.0]\nname=\"Linux\"\n",
        )
        .unwrap();
        let config = load(&temp);
        let ws = Workspace::new(temp.path(), Default::default());

        assert!(matches!(
            adapt_android_preset(&config, &ws),
            Err(MetadataError::Preset(_))
        ));
    }
}

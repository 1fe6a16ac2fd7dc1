//! License identification.
//!
//! The project license is identified by matching the LICENSE file against
//! the SPDX license corpus. The identifier can then be mapped to the
//! vocabulary used by the Godot Asset Library.

use std::path::Path;
use std::sync::OnceLock;

use spdx::detection::{Store, TextData};
use tracing::{debug, info, warn};

use crate::error::LicenseError;
use crate::workspace::read_optional;
use crate::Result;

/// Minimum similarity score for a license match to be trusted
pub const CONFIDENCE_THRESHOLD: f32 = 0.8;

/// SPDX ids and their Asset Library names
const ASSET_LIBRARY_LICENSES: &[(&str, &str)] = &[
    ("MIT", "MIT"),
    ("MPL-2.0", "MPL-2.0"),
    ("GPL-3.0-only", "GPLv3"),
    ("GPL-2.0-only", "GPLv2"),
    ("LGPL-3.0-only", "LGPLv3"),
    ("LGPL-2.1-only", "LGPLv2.1"),
    ("LGPL-2.0-only", "LGPLv2"),
    ("AGPL-3.0-only", "AGPLv3"),
    ("GPL-3.0-or-later", "GPLv3"),
    ("GPL-2.0-or-later", "GPLv2"),
    ("LGPL-3.0-or-later", "LGPLv3"),
    ("LGPL-2.1-or-later", "LGPLv2.1"),
    ("LGPL-2.0-or-later", "LGPLv2"),
    ("AGPL-3.0-or-later", "AGPLv3"),
    ("EUPL-1.2", "EUPL-1.2"),
    ("Apache-2.0", "Apache-2.0"),
    ("CC0-1.0", "CC0"),
    ("CC-BY-4.0", "CC-BY-4.0"),
    ("CC-BY-3.0", "CC-BY-3.0"),
    ("CC-BY-SA-4.0", "CC-BY-SA-4.0"),
    ("CC-BY-SA-3.0", "CC-BY-SA-3.0"),
    ("BSD-2-Clause", "BSD-2-Clause"),
    ("BSD-3-Clause", "BSD-3-Clause"),
    ("BSL-1.0", "BSL-1.0"),
    ("ISC", "ISC"),
    ("Unlicense", "Unlicense"),
    ("", "Proprietary"),
];

/// A license identified from its text
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseMatch {
    /// SPDX identifier
    pub id: String,
    /// Similarity score between 0 and 1
    pub score: f32,
}

/// Something that can tell which license a text is
pub trait LicenseMatcher {
    /// Identify the license, or `None` when no confident match exists
    fn identify(&self, text: &str) -> Option<LicenseMatch>;
}

/// Matcher backed by the SPDX license corpus bundled with the `spdx` crate
#[derive(Default)]
pub struct SpdxMatcher {
    store: OnceLock<Option<Store>>,
}

impl SpdxMatcher {
    /// Create a matcher; the corpus is loaded on first use
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Option<&Store> {
        self.store
            .get_or_init(|| match Store::load_inline() {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!(error = ?e, "failed to load SPDX license corpus");
                    None
                }
            })
            .as_ref()
    }
}

impl LicenseMatcher for SpdxMatcher {
    fn identify(&self, text: &str) -> Option<LicenseMatch> {
        let store = self.store()?;
        let found = store.analyze(&TextData::new(text));
        debug!(license = found.name, score = found.score, "best license candidate");
        if found.score < CONFIDENCE_THRESHOLD {
            return None;
        }
        Some(LicenseMatch {
            id: found.name.to_string(),
            score: found.score,
        })
    }
}

/// Identify the license of the project from its license file
pub fn infer_license(path: &Path, matcher: &dyn LicenseMatcher) -> Result<String> {
    let text = read_optional(path)?.ok_or_else(|| LicenseError::FileMissing(path.to_path_buf()))?;
    let found = matcher
        .identify(&text)
        .ok_or_else(|| LicenseError::Unidentified(path.to_path_buf()))?;
    info!(license = %found.id, score = found.score, "identified license");
    Ok(found.id)
}

/// Map an SPDX id to its Godot Asset Library name
pub fn asset_library_license(spdx_id: &str) -> Result<&'static str> {
    ASSET_LIBRARY_LICENSES
        .iter()
        .find(|(id, _)| *id == spdx_id)
        .map(|(_, name)| *name)
        .ok_or_else(|| LicenseError::Unmapped(spdx_id.to_string()).into())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::MetadataError;
    use tempfile::TempDir;

    /// Matcher that recognizes a license by a phrase in its text
    pub(crate) struct PhraseMatcher;

    impl LicenseMatcher for PhraseMatcher {
        fn identify(&self, text: &str) -> Option<LicenseMatch> {
            let id = if text.contains("Permission is hereby granted") {
                "MIT"
            } else if text.contains("GNU GENERAL PUBLIC LICENSE") {
                "GPL-3.0-or-later"
            } else {
                return None;
            };
            Some(LicenseMatch {
                id: id.to_string(),
                score: 1.0,
            })
        }
    }

    #[test]
    fn test_infer_license() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("LICENSE");
        std::fs::write(&path, "MIT License\n\nPermission is hereby granted, free of charge").unwrap();

        assert_eq!(infer_license(&path, &PhraseMatcher).unwrap(), "MIT");
    }

    #[test]
    fn test_missing_license_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = infer_license(&temp.path().join("LICENSE"), &PhraseMatcher).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::License(LicenseError::FileMissing(_))
        ));
    }

    #[test]
    fn test_unidentified_license_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("LICENSE");
        std::fs::write(&path, "All rights reserved, do whatever I say").unwrap();

        let err = infer_license(&path, &PhraseMatcher).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::License(LicenseError::Unidentified(_))
        ));
    }

    #[test]
    fn test_spdx_matcher_identifies_mit() {
        let text = "\
MIT License

Copyright (c) 2024 Example Author

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
";
        let found = SpdxMatcher::new().identify(text).unwrap();
        assert_eq!(found.id, "MIT");
        assert!(found.score >= CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_spdx_matcher_rejects_gibberish() {
        assert!(SpdxMatcher::new()
            .identify("zebra quantum pancake lighthouse")
            .is_none());
    }

    #[test]
    fn test_asset_library_license_mapping() {
        assert_eq!(asset_library_license("GPL-3.0-or-later").unwrap(), "GPLv3");
        assert_eq!(asset_library_license("CC0-1.0").unwrap(), "CC0");
        assert_eq!(asset_library_license("").unwrap(), "Proprietary");
        assert!(matches!(
            asset_library_license("WTFPL"),
            Err(MetadataError::License(LicenseError::Unmapped(_)))
        ));
    }
}

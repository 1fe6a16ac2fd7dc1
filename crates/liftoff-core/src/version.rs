//! Dotted numeric versions and their fixed-width store codes
//!
//! Store version codes are built by zero-padding every component of a
//! dotted version to two digits and concatenating them, so `1.5.3` becomes
//! `010503`. Components above 99 would break the fixed width and are
//! rejected.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VersionError};

/// Number of digits each version component occupies in a version code
pub const CODE_DIGITS: usize = 2;

/// Largest component value representable in a version code
pub const MAX_COMPONENT: u64 = 99;

/// A version split into its numeric components.
///
/// Ordering is component-wise, so `1.10.0` sorts after `1.9.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionTuple(Vec<u64>);

impl VersionTuple {
    /// Parse a dotted numeric version such as `1.5.3`
    pub fn parse(version: &str) -> Result<Self> {
        let components = version
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidFormat(version.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| VersionError::InvalidFormat(version.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self(components))
    }

    /// The numeric components
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple has no components
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Convert a dotted version into its zero-padded version code.
///
/// ```rust
/// use liftoff_core::version_to_code;
///
/// assert_eq!(version_to_code("1.5.3").unwrap(), "010503");
/// ```
pub fn version_to_code(version: &str) -> Result<String> {
    let tuple = VersionTuple::parse(version)?;
    let mut code = String::with_capacity(tuple.len() * CODE_DIGITS);
    for &component in tuple.components() {
        if component > MAX_COMPONENT {
            return Err(VersionError::ComponentOutOfRange {
                version: version.to_string(),
                component,
            }
            .into());
        }
        code.push_str(&format!("{:02}", component));
    }
    Ok(code)
}

/// Convert a version code back into its dotted version.
///
/// ```rust
/// use liftoff_core::code_to_version;
///
/// assert_eq!(code_to_version("011000").unwrap(), "1.10.0");
/// ```
pub fn code_to_version(code: &str) -> Result<String> {
    if code.is_empty()
        || code.len() % CODE_DIGITS != 0
        || !code.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(VersionError::InvalidCode(code.to_string()).into());
    }

    let parts: Vec<String> = code
        .as_bytes()
        .chunks(CODE_DIGITS)
        .map(|chunk| {
            let group = std::str::from_utf8(chunk).unwrap_or("0");
            group.parse::<u64>().unwrap_or(0).to_string()
        })
        .collect();

    Ok(parts.join("."))
}

/// Numeric value of a version code, as used by integer `version/code` fields
pub fn version_code_number(code: &str) -> Result<u32> {
    code.parse::<u32>()
        .map_err(|_| VersionError::InvalidCode(code.to_string()).into())
}

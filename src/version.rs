use crate::utils::{Result, UtilError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reads a version file, trimming surrounding whitespace.
pub fn load_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "load_version: read failed");
        e
    })?;
    Ok(content.trim().to_string())
}

/// A `v<major>.<minor>.<patch>` release tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parses `v1.20.03` into `1.20.3`. Leading zeros are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || {
            tracing::error!(version = %s, "Version::parse: invalid version");
            UtilError::InvalidVersion(s.to_string())
        };

        let body = s.strip_prefix('v').ok_or_else(invalid)?;
        let parts = body
            .split('.')
            .map(|p| {
                if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                p.parse::<u32>().ok()
            })
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(invalid()),
        }
    }

    pub fn inc_patch(&mut self) {
        self.patch = self.patch.saturating_add(1);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = UtilError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

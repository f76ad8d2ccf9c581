//! Version Gate
//!
//! Parses `major.minor.hotfix` version strings and enforces that every node of
//! the cluster runs a version inside the supported source window
//! `[minimum, next)`.

use crate::error::{MigrationError, VersionBound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed `major.minor.hotfix` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub hotfix: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, hotfix: u32) -> Self {
        Self {
            major,
            minor,
            hotfix,
        }
    }
}

impl FromStr for Version {
    type Err = MigrationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || MigrationError::MalformedVersion {
            raw: raw.to_string(),
        };
        let parts: Vec<&str> = raw.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(malformed());
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            *slot = part.parse().map_err(|_| malformed())?;
        }
        Ok(Version::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.hotfix)
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open window `[minimum, next)` of versions the migration supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionWindow {
    /// Oldest supported source version.
    #[serde(default = "default_minimum")]
    pub minimum: Version,
    /// First version that is no longer a valid source.
    #[serde(default = "default_next")]
    pub next: Version,
}

fn default_minimum() -> Version {
    Version::new(0, 57, 3)
}

fn default_next() -> Version {
    Version::new(0, 58, 0)
}

impl Default for VersionWindow {
    fn default() -> Self {
        Self {
            minimum: default_minimum(),
            next: default_next(),
        }
    }
}

impl fmt::Display for VersionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.minimum, self.next)
    }
}

impl VersionWindow {
    pub fn contains(&self, version: &Version) -> bool {
        *version >= self.minimum && *version < self.next
    }

    /// Check every node's raw version string against the window.
    ///
    /// All strings are parsed before any bound is checked, so a malformed
    /// version always wins. The lower bound is checked across the whole
    /// cluster before the upper bound.
    pub fn check<S: AsRef<str>>(&self, raw_versions: &[S]) -> Result<(), MigrationError> {
        let versions = raw_versions
            .iter()
            .map(|raw| raw.as_ref().parse::<Version>())
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(too_old) = versions.iter().find(|v| **v < self.minimum) {
            return Err(self.out_of_window(VersionBound::BelowMinimum, too_old));
        }
        if let Some(too_new) = versions.iter().find(|v| **v >= self.next) {
            return Err(self.out_of_window(VersionBound::AtOrAboveNext, too_new));
        }
        Ok(())
    }

    fn out_of_window(&self, bound: VersionBound, version: &Version) -> MigrationError {
        MigrationError::VersionOutOfWindow {
            bound,
            version: version.to_string(),
            window: self.to_string(),
        }
    }
}

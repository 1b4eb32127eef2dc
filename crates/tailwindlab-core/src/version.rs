//! Release version selectors
//!
//! A selector is either `latest` or a pinned semantic version. Pinned selectors are
//! normalized to their release tag form (`v1.2.3`), which is also the name of the
//! cache entry directory.

use crate::error::{Result, TailwindlabError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const LATEST: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionSelector {
    #[default]
    Latest,
    Pinned(semver::Version),
}

impl VersionSelector {
    /// Parses `latest`, `1.2.3` or `v1.2.3`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(LATEST) {
            return Ok(VersionSelector::Latest);
        }

        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        semver::Version::parse(bare)
            .map(VersionSelector::Pinned)
            .map_err(|e| TailwindlabError::ConfigInvalidValue {
                field: "version".to_string(),
                reason: format!("'{}' is neither \"latest\" nor a semantic version: {}", input, e),
            })
    }

    /// Release tag for a pinned selector (`None` for latest)
    pub fn tag(&self) -> Option<String> {
        match self {
            VersionSelector::Latest => None,
            VersionSelector::Pinned(version) => Some(format!("v{}", version)),
        }
    }

    /// Selector string used as the cache entry name (`latest` or `v1.2.3`)
    pub fn as_dir_name(&self) -> String {
        self.tag().unwrap_or_else(|| LATEST.to_string())
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_dir_name())
    }
}

impl FromStr for VersionSelector {
    type Err = TailwindlabError;

    fn from_str(s: &str) -> Result<Self> {
        VersionSelector::parse(s)
    }
}

impl Serialize for VersionSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_dir_name())
    }
}

impl<'de> Deserialize<'de> for VersionSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        VersionSelector::parse(&raw).map_err(serde::de::Error::custom)
    }
}

use crate::config::consts;
use crate::error::{Result, TailwindlabError};
use crate::version::VersionSelector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// tailwindlab.toml schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tailwind: TailwindConfig,
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailwindConfig {
    #[serde(default)]
    pub version: VersionSelector,
    /// Checksum enforcement for downloaded assets
    #[serde(default = "default_strict")]
    pub strict: bool,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for TailwindConfig {
    fn default() -> Self {
        Self {
            version: VersionSelector::Latest,
            strict: true,
            cache_dir: None,
        }
    }
}

fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,
    /// Timeout for the metadata request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for each asset download, covering the whole body
    ///
    /// Defaults to 300s rather than the 30s of `timeout_secs`: the primary executable
    /// runs to tens of megabytes and a 30s cap fails it on slow links. Set it to 30 to
    /// bound downloads like the metadata request.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            api_base_url: default_api_base_url(),
            download_base_url: default_download_base_url(),
            timeout_secs: default_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl ReleaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn default_owner() -> String {
    consts::release::OWNER.to_string()
}

fn default_repo() -> String {
    consts::release::REPO.to_string()
}

fn default_api_base_url() -> String {
    consts::release::API_BASE_URL.to_string()
}

fn default_download_base_url() -> String {
    consts::release::DOWNLOAD_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    consts::release::TIMEOUT_SECS
}

fn default_download_timeout_secs() -> u64 {
    consts::release::DOWNLOAD_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub minify: bool,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default)]
    pub map: bool,
    /// Extra flags passed verbatim (split on whitespace)
    #[serde(default)]
    pub extra_args: String,
}

impl Config {
    /// Reads tailwindlab.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TailwindlabError::ConfigParseError(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| TailwindlabError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads tailwindlab.toml, or returns defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Config::from_file(path)
    }

    fn validate(&self) -> Result<()> {
        if self.release.timeout_secs == 0 || self.release.download_timeout_secs == 0 {
            return Err(TailwindlabError::ConfigInvalidValue {
                field: "release.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.release.owner.is_empty() || self.release.repo.is_empty() {
            return Err(TailwindlabError::ConfigInvalidValue {
                field: "release".to_string(),
                reason: "owner and repo must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Base directory of the managed cache
    ///
    /// Uses `tailwind.cache_dir` when set, otherwise the OS cache directory:
    /// - macOS: ~/Library/Caches/tailwindlab/tailwind
    /// - Linux: ~/.cache/tailwindlab/tailwind
    /// - Windows: %LOCALAPPDATA%\tailwindlab\tailwind
    pub fn cache_base(&self) -> Result<PathBuf> {
        match &self.tailwind.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => managed_cache_dir(),
        }
    }
}

pub fn managed_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| {
        TailwindlabError::Generic("Could not determine cache directory".to_string())
    })?;

    Ok(base
        .join(consts::cache::APP_DIR)
        .join(consts::cache::TOOL_DIR))
}

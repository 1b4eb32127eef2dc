//! Release installation into the managed cache
//!
//! [`Installer::ensure`] is the fetch path of the crate:
//!
//! 1. cache fast path: the primary executable already exists, no network
//! 2. exclusive lock on `{base}/{selector}.lock`, cache re-check
//! 3. [`ReleaseSource::resolve`]: metadata, text scan or static fallback
//! 4. [`fetch::fetch_all`] into a `.staging-*` directory beside the entry
//! 5. rename the verified staging directory to `{base}/{selector}`
//!
//! A failed fetch leaves nothing at the entry path, so the next call cannot mistake
//! a partial download for a cache hit.

pub mod cache;
pub mod checksum;
pub mod fetch;
pub mod release;
pub mod resolve;
pub mod scan;

pub use cache::{CacheEntry, CacheLayout, CachedAssetSet, check_cache};
pub use fetch::{DownloadResult, FetchOptions, fetch_all};
pub use release::{Asset, AssetKind, ResolvedAssetSet, classify};
pub use resolve::ReleaseSource;

use crate::Result;
use crate::github::build_client;
use crate::platform::Platform;
use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tailwindlab_core::config::Config;
use tailwindlab_core::lock::{DEFAULT_LOCK_TIMEOUT, acquire_lock};
use tailwindlab_core::{TailwindlabError, VersionSelector};

/// How [`Installer::ensure`] satisfied a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Already on disk; no network access happened
    Cached(CachedAssetSet),
    /// Downloaded and verified during this call
    Fetched { tag: String, assets: CachedAssetSet },
}

impl InstallOutcome {
    pub fn assets(&self) -> &CachedAssetSet {
        match self {
            InstallOutcome::Cached(assets) => assets,
            InstallOutcome::Fetched { assets, .. } => assets,
        }
    }

    pub fn into_assets(self) -> CachedAssetSet {
        match self {
            InstallOutcome::Cached(assets) => assets,
            InstallOutcome::Fetched { assets, .. } => assets,
        }
    }

    pub fn was_cached(&self) -> bool {
        matches!(self, InstallOutcome::Cached(_))
    }
}

/// Installs release asset sets for one platform into one cache
#[derive(Debug, Clone)]
pub struct Installer {
    client: Client,
    source: ReleaseSource,
    layout: CacheLayout,
    platform: Platform,
    strict: bool,
    download_timeout: Duration,
    lock_timeout: Duration,
}

impl Installer {
    pub fn new(client: Client, source: ReleaseSource, layout: CacheLayout, platform: Platform) -> Self {
        Self {
            client,
            source,
            layout,
            platform,
            strict: true,
            download_timeout: Duration::from_secs(
                tailwindlab_core::config::consts::release::DOWNLOAD_TIMEOUT_SECS,
            ),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Builds an installer from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the cache base cannot be determined, a release URL is invalid,
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &Config, platform: Platform) -> Result<Self> {
        let client = build_client(config.release.timeout()).map_err(|e| {
            TailwindlabError::Generic(format!("failed to build HTTP client: {}", e))
        })?;
        let source = ReleaseSource::new(client.clone(), &config.release)?;
        let layout = CacheLayout::new(config.cache_base()?);

        Ok(Self::new(client, source, layout, platform)
            .with_strict(config.tailwind.strict)
            .with_download_timeout(config.release.download_timeout()))
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn binary_name(&self) -> Result<String> {
        self.platform.binary_name()
    }

    /// Expected path of the primary executable for `selector`
    pub fn binary_path(&self, selector: &VersionSelector) -> Result<PathBuf> {
        Ok(self.layout.binary_path(selector, &self.binary_name()?))
    }

    /// Cache lookup without any network access
    pub fn cached(&self, selector: &VersionSelector) -> Result<Option<CachedAssetSet>> {
        check_cache(&self.binary_path(selector)?)
    }

    /// Returns the installed asset set for `selector`, fetching it on a cache miss
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the platform has no release binary (`UnsupportedPlatform`)
    /// - the entry lock cannot be acquired in time
    /// - any asset download or checksum verification fails
    pub fn ensure(&self, selector: &VersionSelector) -> Result<InstallOutcome> {
        if let Some(cached) = self.cached(selector)? {
            tracing::debug!("cache hit for {} at {}", selector, cached.dir.display());
            return Ok(InstallOutcome::Cached(cached));
        }

        let _lock = self.lock(selector)?;

        // Another process may have finished the install while we waited
        if let Some(cached) = self.cached(selector)? {
            tracing::debug!("cache filled by another process for {}", selector);
            return Ok(InstallOutcome::Cached(cached));
        }

        self.install_locked(selector)
    }

    /// Discards the entry for `selector` and fetches it again
    pub fn reinstall(&self, selector: &VersionSelector) -> Result<InstallOutcome> {
        let _lock = self.lock(selector)?;
        self.layout.remove_entry(selector)?;
        self.install_locked(selector)
    }

    /// Removes the entry for `selector`; returns whether it existed
    pub fn remove(&self, selector: &VersionSelector) -> Result<bool> {
        let _lock = self.lock(selector)?;
        self.layout.remove_entry(selector)
    }

    fn lock(&self, selector: &VersionSelector) -> Result<tailwindlab_core::lock::LockGuard> {
        fs::create_dir_all(self.layout.base())?;
        let description = format!("tailwind {} install", selector);
        Ok(acquire_lock(
            &self.layout.lock_path(selector),
            self.lock_timeout,
            &description,
        )?)
    }

    /// Resolves, downloads into staging and renames into place; caller holds the lock
    fn install_locked(&self, selector: &VersionSelector) -> Result<InstallOutcome> {
        let binary_name = self.binary_name()?;
        let set = self.source.resolve(selector, &binary_name)?;

        let swept = self.layout.sweep_staging(selector)?;
        if swept > 0 {
            tracing::info!("removed {} interrupted download(s) of {}", swept, selector);
        }
        let staging = tempfile::Builder::new()
            .prefix(&CacheLayout::staging_prefix(selector))
            .tempdir_in(self.layout.base())?;

        let options = FetchOptions {
            strict: self.strict,
            timeout: self.download_timeout,
        };
        let downloaded = fetch_all(&self.client, &set, staging.path(), &options)?;

        let entry = self.layout.entry_dir(selector);
        if entry.exists() {
            fs::remove_dir_all(&entry)?;
        }

        let staged = staging.keep();
        if let Err(e) = fs::rename(&staged, &entry) {
            let _ = fs::remove_dir_all(&staged);
            return Err(e.into());
        }

        let assets = check_cache(&entry.join(&binary_name))?.ok_or_else(|| {
            TailwindlabError::Generic(format!(
                "installed entry {} has no {}",
                entry.display(),
                binary_name
            ))
        })?;

        tracing::info!(
            "installed tailwind {} ({} files, {} bytes) into {}",
            downloaded.tag,
            downloaded.files,
            downloaded.bytes,
            entry.display()
        );

        Ok(InstallOutcome::Fetched {
            tag: downloaded.tag,
            assets,
        })
    }
}

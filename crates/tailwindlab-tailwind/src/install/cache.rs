//! On-disk cache of installed release asset sets
//!
//! Layout:
//!
//! ```text
//! {base}/
//! ├── latest/
//! │   ├── tailwindcss-extra-linux-x86_64
//! │   ├── default.css
//! │   └── flowbite.min.js
//! ├── latest.lock
//! ├── v2.1.4/
//! └── .staging-latest-XXXXXX/   (in-flight fetch, renamed into place when verified)
//! ```
//!
//! Staging directories carry their selector so the holder of `<selector>.lock` can
//! sweep ones left behind by a killed process without touching other selectors.
//!
//! An entry is a hit as soon as its primary executable exists. Side assets are
//! discovered by listing the entry directory.

use crate::Result;
use crate::install::release::{is_script_name, is_stylesheet_name};
use std::fs;
use std::path::{Path, PathBuf};
use tailwindlab_core::VersionSelector;
use tailwindlab_core::lock::entry_lock_path;

/// Name prefix of staging directories created during a fetch
pub const STAGING_PREFIX: &str = ".staging-";

/// An installed asset set found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAssetSet {
    pub dir: PathBuf,
    pub binary: PathBuf,
    pub stylesheets: Vec<PathBuf>,
    pub scripts: Vec<PathBuf>,
}

/// One entry of the cache listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Selector directory name (`latest`, `v2.1.4`)
    pub selector: String,
    pub path: PathBuf,
    /// Whether the entry holds the primary executable for this platform
    pub has_binary: bool,
}

/// Path arithmetic over the cache base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    base: PathBuf,
}

impl CacheLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `{base}/{selector}`
    pub fn entry_dir(&self, selector: &VersionSelector) -> PathBuf {
        self.base.join(selector.as_dir_name())
    }

    /// `{base}/{selector}/{binary}`
    pub fn binary_path(&self, selector: &VersionSelector, binary_name: &str) -> PathBuf {
        self.entry_dir(selector).join(binary_name)
    }

    /// `{base}/{selector}.lock`
    pub fn lock_path(&self, selector: &VersionSelector) -> PathBuf {
        entry_lock_path(&self.entry_dir(selector))
    }

    /// Name prefix of staging directories for `selector`: `.staging-{selector}-`
    pub fn staging_prefix(selector: &VersionSelector) -> String {
        format!("{}{}-", STAGING_PREFIX, selector.as_dir_name())
    }

    /// Removes staging directories of `selector` left by an interrupted fetch
    ///
    /// Only call while holding the entry lock; returns how many were removed.
    pub fn sweep_staging(&self, selector: &VersionSelector) -> Result<usize> {
        if !self.base.is_dir() {
            return Ok(0);
        }

        let prefix = Self::staging_prefix(selector);
        let mut removed = 0;
        for entry in fs::read_dir(&self.base)? {
            let entry = entry?;
            let is_stale = entry.file_type()?.is_dir()
                && entry.file_name().to_string_lossy().starts_with(&prefix);
            if !is_stale {
                continue;
            }
            fs::remove_dir_all(entry.path())?;
            tracing::debug!("removed stale staging directory {}", entry.path().display());
            removed += 1;
        }
        Ok(removed)
    }

    /// Lists cache entries, sorted by selector
    ///
    /// Lock files and staging directories are skipped. A missing base directory is an
    /// empty cache.
    pub fn list_entries(&self, binary_name: &str) -> Result<Vec<CacheEntry>> {
        if !self.base.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.base)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let selector = entry.file_name().to_string_lossy().into_owned();
            if selector.starts_with(STAGING_PREFIX) {
                continue;
            }
            let path = entry.path();
            entries.push(CacheEntry {
                has_binary: path.join(binary_name).is_file(),
                selector,
                path,
            });
        }

        entries.sort_by(|a, b| a.selector.cmp(&b.selector));
        Ok(entries)
    }

    /// Removes one entry; returns whether anything was removed
    pub fn remove_entry(&self, selector: &VersionSelector) -> Result<bool> {
        let dir = self.entry_dir(selector);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)?;
        tracing::debug!("removed cache entry {}", dir.display());
        Ok(true)
    }

    /// Removes the whole cache base directory
    pub fn clear(&self) -> Result<bool> {
        if !self.base.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.base)?;
        tracing::debug!("cleared cache {}", self.base.display());
        Ok(true)
    }
}

/// Looks up an installed asset set by its primary executable path
///
/// Performs one existence check and, on a hit, one listing of the parent directory.
/// Cached files are trusted; nothing is re-verified.
pub fn check_cache(expected_path: &Path) -> Result<Option<CachedAssetSet>> {
    if !expected_path.is_file() {
        return Ok(None);
    }

    let Some(dir) = expected_path.parent() else {
        return Ok(None);
    };

    let mut stylesheets = Vec::new();
    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path == expected_path || !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_stylesheet_name(&name) {
            stylesheets.push(path);
        } else if is_script_name(&name) {
            scripts.push(path);
        }
    }
    stylesheets.sort();
    scripts.sort();

    Ok(Some(CachedAssetSet {
        dir: dir.to_path_buf(),
        binary: expected_path.to_path_buf(),
        stylesheets,
        scripts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailwindlab_testkit::temp_dir_in_workspace;

    const BINARY: &str = "tailwindcss-extra-linux-x86_64";

    #[test]
    fn test_layout_is_pure_function_of_inputs() {
        let a = CacheLayout::new("/cache");
        let b = CacheLayout::new("/cache");
        let selector = VersionSelector::parse("2.1.4").unwrap();

        assert_eq!(a.binary_path(&selector, BINARY), b.binary_path(&selector, BINARY));
        assert_eq!(
            a.binary_path(&selector, BINARY),
            PathBuf::from("/cache/v2.1.4").join(BINARY)
        );
        assert_eq!(
            a.lock_path(&VersionSelector::Latest),
            PathBuf::from("/cache/latest.lock")
        );
    }

    #[test]
    fn test_check_cache_miss() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("latest").join(BINARY);
        assert!(check_cache(&path).unwrap().is_none());
    }

    #[test]
    fn test_check_cache_hit_discovers_side_assets() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path().join("latest");
        fs::create_dir_all(&dir).unwrap();
        for name in [BINARY, "minimal.css", "default.css", "flowbite.min.js", "notes.txt"] {
            fs::write(dir.join(name), name).unwrap();
        }

        let cached = check_cache(&dir.join(BINARY)).unwrap().unwrap();
        assert_eq!(cached.binary, dir.join(BINARY));
        assert_eq!(
            cached.stylesheets,
            vec![dir.join("default.css"), dir.join("minimal.css")]
        );
        assert_eq!(cached.scripts, vec![dir.join("flowbite.min.js")]);
    }

    #[test]
    fn test_side_assets_without_binary_are_a_miss() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path().join("latest");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("default.css"), "css").unwrap();

        assert!(check_cache(&dir.join(BINARY)).unwrap().is_none());
    }

    #[test]
    fn test_list_entries_skips_locks_and_staging() {
        let temp = temp_dir_in_workspace();
        let layout = CacheLayout::new(temp.path());
        fs::create_dir_all(temp.path().join("v2.1.4")).unwrap();
        fs::write(temp.path().join("v2.1.4").join(BINARY), "bin").unwrap();
        fs::create_dir_all(temp.path().join("latest")).unwrap();
        fs::create_dir_all(temp.path().join(".staging-abc")).unwrap();
        fs::write(temp.path().join("latest.lock"), "").unwrap();

        let entries = layout.list_entries(BINARY).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.selector.as_str()).collect();
        assert_eq!(names, vec!["latest", "v2.1.4"]);
        assert!(!entries[0].has_binary);
        assert!(entries[1].has_binary);
    }

    #[test]
    fn test_sweep_staging_only_touches_own_selector() {
        let temp = temp_dir_in_workspace();
        let layout = CacheLayout::new(temp.path());
        let pinned = VersionSelector::parse("2.1.4").unwrap();
        for dir in [
            ".staging-latest-a1b2",
            ".staging-latest-c3d4",
            ".staging-v2.1.4-e5f6",
            "latest",
        ] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join(".staging-latest-file"), "").unwrap();

        assert_eq!(layout.sweep_staging(&VersionSelector::Latest).unwrap(), 2);

        assert!(!temp.path().join(".staging-latest-a1b2").exists());
        assert!(!temp.path().join(".staging-latest-c3d4").exists());
        assert!(temp.path().join(".staging-v2.1.4-e5f6").exists());
        assert!(temp.path().join(".staging-latest-file").exists());
        assert!(temp.path().join("latest").exists());
        assert_eq!(layout.sweep_staging(&pinned).unwrap(), 1);
    }

    #[test]
    fn test_sweep_staging_missing_base() {
        let temp = temp_dir_in_workspace();
        let layout = CacheLayout::new(temp.path().join("nope"));
        assert_eq!(layout.sweep_staging(&VersionSelector::Latest).unwrap(), 0);
    }

    #[test]
    fn test_list_entries_missing_base_is_empty() {
        let temp = temp_dir_in_workspace();
        let layout = CacheLayout::new(temp.path().join("nope"));
        assert!(layout.list_entries(BINARY).unwrap().is_empty());
    }

    #[test]
    fn test_remove_entry_and_clear() {
        let temp = temp_dir_in_workspace();
        let base = temp.path().join("cache");
        let layout = CacheLayout::new(&base);
        let selector = VersionSelector::Latest;
        fs::create_dir_all(layout.entry_dir(&selector)).unwrap();

        assert!(layout.remove_entry(&selector).unwrap());
        assert!(!layout.remove_entry(&selector).unwrap());
        assert!(base.exists());

        assert!(layout.clear().unwrap());
        assert!(!base.exists());
        assert!(!layout.clear().unwrap());
    }
}

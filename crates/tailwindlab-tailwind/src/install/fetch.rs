//! Concurrent download of a resolved asset set
//!
//! Every asset gets its own scoped thread. Tasks share a cancellation flag: the first
//! task to fail records its error and raises the flag, the others stop at their next
//! chunk boundary, and the recorded error is returned once every thread has joined.

use crate::Result;
use crate::github::stream_to_file;
use crate::install::checksum;
use crate::install::release::{Asset, AssetKind, ResolvedAssetSet};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tailwindlab_core::TailwindlabError;

/// Permission bits of the primary executable
pub const BINARY_MODE: u32 = 0o755;

/// Permission bits of stylesheets and scripts
pub const SIDE_ASSET_MODE: u32 = 0o644;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Verify SHA-256 digests where the release publishes them
    pub strict: bool,
    /// Per-asset request timeout
    pub timeout: Duration,
}

/// Summary of a completed [`fetch_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub tag: String,
    /// Number of files written
    pub files: usize,
    pub bytes: u64,
}

/// Downloads every asset of `set` into `target_dir` concurrently
///
/// Returns after the slowest download has finished. Any single failure fails the
/// whole operation; files already written are left for the caller to discard.
///
/// # Errors
///
/// Returns the first error observed:
/// - `DownloadFailed` for transport errors, timeouts and non-success statuses
/// - `ChecksumMismatch` when strict verification fails
/// - `IoError` when the target directory or a file cannot be written
pub fn fetch_all(
    client: &Client,
    set: &ResolvedAssetSet,
    target_dir: &Path,
    options: &FetchOptions,
) -> Result<DownloadResult> {
    fs::create_dir_all(target_dir)?;

    let cancel = AtomicBool::new(false);
    let first_error: Mutex<Option<TailwindlabError>> = Mutex::new(None);

    let written: Vec<Option<u64>> = thread::scope(|scope| {
        let handles: Vec<_> = set
            .iter()
            .map(|(kind, asset)| {
                let cancel = &cancel;
                let first_error = &first_error;
                scope.spawn(move || {
                    match fetch_one(client, asset, kind, target_dir, options, cancel) {
                        Ok(bytes) => Some(bytes),
                        Err(e) => {
                            record_failure(first_error, cancel, e);
                            None
                        }
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    record_failure(
                        &first_error,
                        &cancel,
                        TailwindlabError::Generic("download task panicked".to_string()),
                    );
                    None
                })
            })
            .collect()
    });

    if let Some(err) = first_error
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
    {
        return Err(err);
    }

    let written: Vec<u64> = written.into_iter().flatten().collect();
    let result = DownloadResult {
        tag: set.tag.clone(),
        files: written.len(),
        bytes: written.iter().sum(),
    };

    tracing::debug!(
        "fetched {} assets ({} bytes) for {}",
        result.files,
        result.bytes,
        set.tag
    );
    Ok(result)
}

/// Stores `err` if no error was recorded yet, then raises the cancel flag
fn record_failure(slot: &Mutex<Option<TailwindlabError>>, cancel: &AtomicBool, err: TailwindlabError) {
    let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.is_none() {
        *slot = Some(err);
    }
    drop(slot);
    cancel.store(true, Ordering::SeqCst);
}

fn fetch_one(
    client: &Client,
    asset: &Asset,
    kind: AssetKind,
    target_dir: &Path,
    options: &FetchOptions,
    cancel: &AtomicBool,
) -> Result<u64> {
    let file_name = safe_file_name(&asset.name)?;
    let dest = target_dir.join(file_name);

    tracing::debug!("downloading {} from {}", asset.name, asset.url);
    let bytes = stream_to_file(client, &asset.url, &dest, options.timeout, cancel)?;

    let mode = match kind {
        AssetKind::Primary => BINARY_MODE,
        AssetKind::Stylesheet | AssetKind::Script => SIDE_ASSET_MODE,
    };
    set_mode(&dest, mode)?;

    checksum::verify(asset, &dest, options.strict)?;
    Ok(bytes)
}

/// Rejects asset names that would escape the target directory
fn safe_file_name(name: &str) -> Result<&Path> {
    let path = Path::new(name);
    match path.file_name() {
        Some(file_name) if file_name == path.as_os_str() && !name.contains('\\') => Ok(path),
        _ => Err(TailwindlabError::Generic(format!(
            "refusing to write asset with unsafe name '{}'",
            name
        ))),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

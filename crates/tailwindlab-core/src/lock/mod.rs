//! Advisory file locks guarding cache entry population
//!
//! Two processes fetching the same release into the same cache must not interleave
//! their writes. The fetch path holds an exclusive `fs2` lock on a sibling lock file
//! (`<base>/<selector>.lock`) for the whole download-verify-rename sequence.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod acquire;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;


/// Default time to wait for another process to finish populating an entry
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// Blocks until `lock_path` is exclusively ours or `timeout` elapses
///
/// The holder's pid is written into the file so waiters can report who they are
/// waiting for. Dropping the guard unlocks.
pub fn acquire_lock(
    lock_path: &Path,
    timeout: Duration,
    description: &str,
) -> Result<LockGuard, LockError> {
    acquire::acquire(lock_path, timeout, description)
}

/// Lock file path for a cache entry directory: `<entry>.lock` beside it
pub fn entry_lock_path(entry_dir: &Path) -> PathBuf {
    let mut name = entry_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("entry"));
    name.push(".lock");
    entry_dir.with_file_name(name)
}

use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Exclusive hold on a cache entry; unlocked on drop
#[derive(Debug)]
pub struct LockGuard {
    pub(crate) file: File,
    pub(crate) path: PathBuf,
    pub(crate) since: Instant,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Clear the pid first so a waiter never reports a finished holder
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
        tracing::debug!(
            "released lock {} after {:?}",
            self.path.display(),
            self.since.elapsed()
        );
    }
}

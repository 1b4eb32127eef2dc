use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    /// Another process kept the entry locked for longer than we were willing to wait
    #[error("gave up on {description} after {waited:?}: {} is still held", path.display())]
    Timeout {
        path: PathBuf,
        description: String,
        waited: Duration,
    },

    #[error("cannot {operation} {}: {source}", path.display())]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
        operation: &'static str,
    },
}

impl LockError {
    pub(crate) fn io(operation: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| LockError::Io {
            source,
            path,
            operation,
        }
    }
}

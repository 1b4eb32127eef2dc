use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailwindlabError {
    // Configuration errors
    #[error("UNSUPPORTED_PLATFORM: cannot determine artifact name for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Release metadata errors
    #[error("METADATA_UNAVAILABLE: {0}")]
    MetadataUnavailable(String),

    // Fetch errors
    #[error("DOWNLOAD_FAILED: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("CHECKSUM_MISMATCH: {asset}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    #[error("FETCH_CANCELLED: {0}")]
    FetchCancelled(String),

    // Invocation errors
    #[error("EXEC_FAILED: tailwind exited with {status}: {stderr}")]
    ExecFailed { status: String, stderr: String },

    #[error("EXEC_SPAWN_FAILED: {path}: {reason}")]
    ExecSpawnFailed { path: PathBuf, reason: String },

    #[error("ASSET_COPY_FAILED: {from} -> {to}: {reason}")]
    AssetCopyFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    // Cache errors
    #[error("LOCK_FAILED: {0}")]
    LockFailed(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<crate::lock::LockError> for TailwindlabError {
    fn from(err: crate::lock::LockError) -> Self {
        TailwindlabError::LockFailed(err.to_string())
    }
}

impl TailwindlabError {
    /// Machine-readable code (the prefix of the display string)
    pub fn code(&self) -> &'static str {
        match self {
            TailwindlabError::UnsupportedPlatform { .. } => "UNSUPPORTED_PLATFORM",
            TailwindlabError::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            TailwindlabError::ConfigInvalidValue { .. } => "CONFIG_INVALID_VALUE",
            TailwindlabError::MetadataUnavailable(_) => "METADATA_UNAVAILABLE",
            TailwindlabError::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            TailwindlabError::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            TailwindlabError::FetchCancelled(_) => "FETCH_CANCELLED",
            TailwindlabError::ExecFailed { .. } => "EXEC_FAILED",
            TailwindlabError::ExecSpawnFailed { .. } => "EXEC_SPAWN_FAILED",
            TailwindlabError::AssetCopyFailed { .. } => "ASSET_COPY_FAILED",
            TailwindlabError::LockFailed(_) => "LOCK_FAILED",
            TailwindlabError::IoError(_) => "IO_ERROR",
            TailwindlabError::Generic(_) => "GENERIC",
        }
    }
}

pub type Result<T> = std::result::Result<T, TailwindlabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_starts_with_code() {
        let errors = vec![
            TailwindlabError::UnsupportedPlatform {
                os: "linux".to_string(),
                arch: "unknown".to_string(),
            },
            TailwindlabError::DownloadFailed {
                url: "https://example.com/a".to_string(),
                reason: "HTTP 404".to_string(),
            },
            TailwindlabError::ChecksumMismatch {
                asset: "tailwindcss-extra-linux-x86_64".to_string(),
                expected: "deadbeef".to_string(),
                actual: "cafebabe".to_string(),
            },
            TailwindlabError::ExecFailed {
                status: "exit status: 1".to_string(),
                stderr: "boom".to_string(),
            },
        ];

        for err in errors {
            assert!(
                err.to_string().starts_with(err.code()),
                "{} should start with {}",
                err,
                err.code()
            );
        }
    }

    #[test]
    fn test_checksum_mismatch_carries_both_values() {
        let err = TailwindlabError::ChecksumMismatch {
            asset: "default.css".to_string(),
            expected: "deadbeef".to_string(),
            actual: "0123abcd".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deadbeef"));
        assert!(msg.contains("0123abcd"));
    }
}

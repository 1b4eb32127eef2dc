//! Streaming download helpers
//!
//! Metadata bodies are read into memory up to a hard cap. Asset bodies are streamed
//! chunk by chunk into a freshly created file; between chunks the shared cancellation
//! flag is checked so that a failing sibling download stops the rest of a fan-out.

use reqwest::blocking::Client;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tailwindlab_core::TailwindlabError;
use thiserror::Error;
use url::Url;

const CHUNK_SIZE: usize = 8192;

/// Reads at most `cap` bytes from `reader`
///
/// Anything beyond the cap is left unread; callers treat the truncated body as
/// possibly malformed.
pub fn read_capped(reader: impl Read, cap: u64) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader.take(cap).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Streams `url` into a new file at `dest`, returning the number of bytes written
///
/// # Errors
///
/// Returns error if:
/// - the request fails or times out
/// - the response status is not success
/// - `cancel` is raised while the body is still streaming
/// - writing the file fails
pub fn stream_to_file(
    client: &Client,
    url: &Url,
    dest: &Path,
    timeout: Duration,
    cancel: &AtomicBool,
) -> Result<u64, DownloadError> {
    if cancel.load(Ordering::SeqCst) {
        return Err(DownloadError::Cancelled { url: url.clone() });
    }

    let mut response = client
        .get(url.as_str())
        .timeout(timeout)
        .send()
        .map_err(|source| DownloadError::Network {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.clone(),
            status: status.as_u16(),
        });
    }

    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            return Err(DownloadError::Cancelled { url: url.clone() });
        }

        let bytes_read = response.read(&mut chunk).map_err(|e| DownloadError::Body {
            url: url.clone(),
            source: e,
        })?;
        if bytes_read == 0 {
            break;
        }

        writer.write_all(&chunk[..bytes_read])?;
        written += bytes_read as u64;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    Ok(written)
}

/// Download error types
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Non-success HTTP status
    #[error("HTTP {status} downloading {url}")]
    HttpStatus { url: Url, status: u16 },

    /// Transport error or timeout before a response arrived
    #[error("request to {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// Transport error while reading the body
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: Url,
        #[source]
        source: io::Error,
    },

    /// A sibling download failed first
    #[error("download of {url} cancelled")]
    Cancelled { url: Url },

    /// Local file error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<DownloadError> for TailwindlabError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::HttpStatus { url, status } => TailwindlabError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            },
            DownloadError::Network { url, source } => TailwindlabError::DownloadFailed {
                url: url.to_string(),
                reason: source.to_string(),
            },
            DownloadError::Body { url, source } => TailwindlabError::DownloadFailed {
                url: url.to_string(),
                reason: source.to_string(),
            },
            DownloadError::Cancelled { url } => TailwindlabError::FetchCancelled(url.to_string()),
            DownloadError::Io(e) => TailwindlabError::IoError(e),
        }
    }
}

//! Shared GitHub interaction utilities
//!
//! - HTTP client construction with the tailwindlab user agent and timeouts
//! - Capped reads and streaming downloads with cooperative cancellation
//! - Safe URL construction for release metadata and asset downloads

pub mod client;
pub mod download;
pub mod url;

pub use client::{DEFAULT_TIMEOUT, USER_AGENT, auth_token, build_client, build_default_client};
pub use download::{DownloadError, read_capped, stream_to_file};
pub use url::{UrlError, add_path_segments, fallback_download_url, parse_base, release_metadata_url};

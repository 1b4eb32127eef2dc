//! URL construction helpers for release metadata and downloads

use tailwindlab_core::VersionSelector;
use thiserror::Error;
use url::Url;

/// Parses a configured base URL (API or download host)
pub fn parse_base(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase { url });
    }
    Ok(url)
}

/// Helper to safely set path segments on a URL (segments are percent-encoded)
///
/// # Errors
///
/// Returns error if URL cannot be a base
pub fn add_path_segments(url: &mut Url, segments: &[&str]) -> Result<(), UrlError> {
    let url_for_error = url.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: url_for_error })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// Metadata endpoint for a selector
///
/// - latest: `{api}/repos/{owner}/{repo}/releases/latest`
/// - pinned: `{api}/repos/{owner}/{repo}/releases/tags/v{version}`
pub fn release_metadata_url(
    api_base: &Url,
    owner: &str,
    repo: &str,
    selector: &VersionSelector,
) -> Result<Url, UrlError> {
    let mut url = api_base.clone();
    match selector.tag() {
        None => add_path_segments(&mut url, &["repos", owner, repo, "releases", "latest"])?,
        Some(tag) => add_path_segments(&mut url, &["repos", owner, repo, "releases", "tags", &tag])?,
    }
    Ok(url)
}

/// Predictable download URL used when metadata is unusable
///
/// - latest: `{host}/{owner}/{repo}/releases/latest/download/{asset}`
/// - pinned: `{host}/{owner}/{repo}/releases/download/v{version}/{asset}`
pub fn fallback_download_url(
    download_base: &Url,
    owner: &str,
    repo: &str,
    selector: &VersionSelector,
    asset_name: &str,
) -> Result<Url, UrlError> {
    let mut url = download_base.clone();
    match selector.tag() {
        None => add_path_segments(
            &mut url,
            &[owner, repo, "releases", "latest", "download", asset_name],
        )?,
        Some(tag) => add_path_segments(
            &mut url,
            &[owner, repo, "releases", "download", &tag, asset_name],
        )?,
    }
    Ok(url)
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL cannot be used as a base
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The problematic URL
        url: Url,
    },

    /// Invalid URL parse error
    #[error("Invalid URL: {0}")]
    ParseError(#[from] url::ParseError),
}

impl From<UrlError> for tailwindlab_core::TailwindlabError {
    fn from(err: UrlError) -> Self {
        tailwindlab_core::TailwindlabError::ConfigInvalidValue {
            field: "release url".to_string(),
            reason: err.to_string(),
        }
    }
}

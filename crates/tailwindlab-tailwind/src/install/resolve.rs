//! Release asset resolution
//!
//! Resolution never fails because of the metadata endpoint: an unreachable endpoint,
//! an error status or an unusable body all degrade to a statically constructed asset
//! set whose URLs follow GitHub's predictable download paths.

use crate::Result;
use crate::github::{auth_token, fallback_download_url, parse_base, read_capped, release_metadata_url};
use crate::install::release::{Asset, Release, ResolvedAssetSet};
use crate::install::scan::scan_release;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tailwindlab_core::config::ReleaseConfig;
use tailwindlab_core::config::consts::release::MAX_METADATA_BYTES;
use tailwindlab_core::{TailwindlabError, VersionSelector};
use url::Url;

/// Side assets every release is expected to publish
pub const FALLBACK_STYLESHEETS: &[&str] = &[
    "default.css",
    "minimal.css",
    "enterprise.css",
    "playful.css",
    "mono.css",
];
pub const FALLBACK_SCRIPTS: &[&str] = &["flowbite.min.js"];

/// Release host queried for metadata
#[derive(Debug, Clone)]
pub struct ReleaseSource {
    client: Client,
    api_base: Url,
    download_base: Url,
    owner: String,
    repo: String,
    timeout: Duration,
    token: Option<String>,
}

impl ReleaseSource {
    pub fn new(client: Client, config: &ReleaseConfig) -> Result<Self> {
        Ok(Self {
            client,
            api_base: parse_base(&config.api_base_url)?,
            download_base: parse_base(&config.download_base_url)?,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            timeout: config.timeout(),
            token: auth_token(),
        })
    }

    /// Replaces the token picked up from the environment
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Resolves the asset set for `selector`
    ///
    /// Tries a structured parse of the metadata, then the text scan, then the static
    /// fallback set. The returned primary asset is always named `expected_binary`.
    ///
    /// # Errors
    ///
    /// Returns error only if the configured download host cannot produce fallback URLs.
    pub fn resolve(
        &self,
        selector: &VersionSelector,
        expected_binary: &str,
    ) -> Result<ResolvedAssetSet> {
        let body = match self.fetch_metadata(selector) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}; using fallback asset set", e);
                return self.fallback_set(selector, expected_binary);
            }
        };

        match parse_release(&body, expected_binary) {
            Some(set) => {
                tracing::info!(
                    "resolved {} with {} side assets",
                    set.tag,
                    set.stylesheets.len() + set.scripts.len()
                );
                Ok(set)
            }
            None => {
                tracing::warn!(
                    "release metadata for {} lists no {}; using fallback asset set",
                    selector,
                    expected_binary
                );
                self.fallback_set(selector, expected_binary)
            }
        }
    }

    /// Fetches the raw metadata body, capped at [`MAX_METADATA_BYTES`]
    ///
    /// # Errors
    ///
    /// Returns `MetadataUnavailable` on transport errors, timeouts and non-success
    /// statuses.
    pub fn fetch_metadata(&self, selector: &VersionSelector) -> Result<String> {
        let url = release_metadata_url(&self.api_base, &self.owner, &self.repo, selector)?;
        tracing::debug!("fetching release metadata from {}", url);

        let mut request = self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().map_err(|e| {
            TailwindlabError::MetadataUnavailable(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TailwindlabError::MetadataUnavailable(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let bytes = read_capped(response, MAX_METADATA_BYTES).map_err(|e| {
            TailwindlabError::MetadataUnavailable(format!("reading {} failed: {}", url, e))
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Static asset set for `selector`: the primary plus the known side assets
    pub fn fallback_set(
        &self,
        selector: &VersionSelector,
        expected_binary: &str,
    ) -> Result<ResolvedAssetSet> {
        let asset = |name: &str| -> Result<Asset> {
            Ok(Asset {
                name: name.to_string(),
                url: fallback_download_url(
                    &self.download_base,
                    &self.owner,
                    &self.repo,
                    selector,
                    name,
                )?,
                digest: None,
            })
        };

        Ok(ResolvedAssetSet {
            tag: selector.as_dir_name(),
            primary: asset(expected_binary)?,
            stylesheets: FALLBACK_STYLESHEETS
                .iter()
                .map(|name| asset(*name))
                .collect::<Result<_>>()?,
            scripts: FALLBACK_SCRIPTS
                .iter()
                .map(|name| asset(*name))
                .collect::<Result<_>>()?,
        })
    }
}

/// Extracts an asset set from a metadata body
///
/// `None` means the body is unusable: no tag, or no asset named `expected_binary`.
pub fn parse_release(body: &str, expected_binary: &str) -> Option<ResolvedAssetSet> {
    let (tag, assets) = match serde_json::from_str::<Release>(body) {
        Ok(release) => {
            let assets = release
                .assets
                .into_iter()
                .filter_map(|asset| match Url::parse(&asset.browser_download_url) {
                    Ok(url) => Some(Asset {
                        name: asset.name,
                        url,
                        digest: asset.digest.filter(|d| !d.trim().is_empty()),
                    }),
                    Err(e) => {
                        tracing::debug!("skipping asset {} with malformed url: {}", asset.name, e);
                        None
                    }
                })
                .collect();
            (release.tag_name, assets)
        }
        Err(e) => {
            tracing::warn!("release metadata is not valid JSON ({}), scanning text", e);
            let scanned = scan_release(body)?;
            (scanned.tag, scanned.assets)
        }
    };

    let set = ResolvedAssetSet::from_assets(&tag, expected_binary, assets)?;
    for (_, asset) in set.iter() {
        if asset.digest.is_none() {
            tracing::warn!("{} has no published digest and will not be verified", asset.name);
        }
    }
    Some(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::build_default_client;
    use tailwindlab_testkit::{FakeAsset, MockRelease, release_json};

    const BINARY: &str = "tailwindcss-extra-linux-x86_64";

    fn source_for(mock: &MockRelease) -> ReleaseSource {
        let config = ReleaseConfig {
            api_base_url: mock.url(),
            download_base_url: mock.url(),
            ..ReleaseConfig::default()
        };
        ReleaseSource::new(build_default_client().unwrap(), &config)
            .unwrap()
            .with_token(None)
    }

    #[test]
    fn test_parse_release_structured() {
        let json = release_json(
            "v2.1.4",
            &[
                FakeAsset::new(BINARY, "https://example.com/bin", Some("sha256:aa")),
                FakeAsset::new("default.css", "https://example.com/default.css", None),
                FakeAsset::new("flowbite.min.js", "https://example.com/f.js", Some("sha256:bb")),
                FakeAsset::new("tailwindcss-extra-macos-arm64", "https://example.com/m", None),
            ],
        );

        let set = parse_release(&json, BINARY).unwrap();
        assert_eq!(set.tag, "v2.1.4");
        assert_eq!(set.primary.digest.as_deref(), Some("sha256:aa"));
        assert_eq!(set.stylesheets.len(), 1);
        assert_eq!(set.scripts.len(), 1);
    }

    #[test]
    fn test_parse_release_empty_digest_is_absent() {
        let json = release_json(
            "v2.1.4",
            &[FakeAsset::new(BINARY, "https://example.com/bin", Some(""))],
        );
        let set = parse_release(&json, BINARY).unwrap();
        assert!(set.primary.digest.is_none());
    }

    #[test]
    fn test_parse_release_without_primary_is_none() {
        let json = release_json(
            "v2.1.4",
            &[FakeAsset::new("default.css", "https://example.com/default.css", None)],
        );
        assert!(parse_release(&json, BINARY).is_none());
    }

    #[test]
    fn test_parse_release_falls_back_to_scan() {
        let json = release_json(
            "v2.1.4",
            &[FakeAsset::new(BINARY, "https://example.com/bin", Some("sha256:aa"))],
        );
        let truncated = &json[..json.len() - 2];

        let set = parse_release(truncated, BINARY).unwrap();
        assert_eq!(set.tag, "v2.1.4");
        assert_eq!(set.primary.url.as_str(), "https://example.com/bin");
    }

    #[test]
    fn test_fallback_set_latest() {
        let mock = MockRelease::new();
        let source = source_for(&mock);

        let set = source.fallback_set(&VersionSelector::Latest, BINARY).unwrap();
        assert_eq!(set.tag, "latest");
        assert_eq!(set.primary.name, BINARY);
        assert!(set.primary.digest.is_none());
        assert_eq!(
            set.primary.url.as_str(),
            format!(
                "{}/dobicinaitis/tailwind-cli-extra/releases/latest/download/{}",
                mock.url(),
                BINARY
            )
        );
        assert_eq!(set.stylesheets.len(), FALLBACK_STYLESHEETS.len());
        assert_eq!(set.scripts[0].name, "flowbite.min.js");
    }

    #[test]
    fn test_resolve_uses_metadata() {
        let mut mock = MockRelease::new();
        mock.serve_release(
            None,
            "v2.1.4",
            &[(BINARY, &b"bin"[..]), ("default.css", &b"css"[..])],
            1,
        );

        let set = source_for(&mock)
            .resolve(&VersionSelector::Latest, BINARY)
            .unwrap();

        mock.assert();
        assert_eq!(set.tag, "v2.1.4");
        assert_eq!(set.primary.url.as_str(), mock.asset_url(BINARY));
        assert!(set.primary.digest.as_deref().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn test_resolve_pinned_uses_tag_endpoint() {
        let mut mock = MockRelease::new();
        mock.serve_release(Some("v2.0.1"), "v2.0.1", &[(BINARY, &b"bin"[..])], 1);

        let selector = VersionSelector::parse("2.0.1").unwrap();
        let set = source_for(&mock).resolve(&selector, BINARY).unwrap();

        mock.assert();
        assert_eq!(set.tag, "v2.0.1");
    }

    #[test]
    fn test_resolve_malformed_metadata_falls_back() {
        let mut mock = MockRelease::new();
        mock.serve_metadata_raw(None, "", 1);

        let set = source_for(&mock)
            .resolve(&VersionSelector::Latest, BINARY)
            .unwrap();

        mock.assert();
        assert_eq!(set.tag, "latest");
        assert_eq!(set.primary.name, BINARY);
        assert!(set.primary.url.as_str().ends_with("/releases/latest/download/tailwindcss-extra-linux-x86_64"));
    }

    #[test]
    fn test_resolve_error_status_falls_back() {
        let mut mock = MockRelease::new();
        let _m = mock
            .server
            .mock("GET", "/repos/dobicinaitis/tailwind-cli-extra/releases/tags/v9.9.9")
            .with_status(404)
            .create();

        let selector = VersionSelector::parse("v9.9.9").unwrap();
        let set = source_for(&mock).resolve(&selector, BINARY).unwrap();

        assert_eq!(set.tag, "v9.9.9");
        assert!(set.primary.url.as_str().contains("/releases/download/v9.9.9/"));
    }

    #[test]
    fn test_fetch_metadata_error_status_is_unavailable() {
        let mut mock = MockRelease::new();
        let _m = mock
            .server
            .mock("GET", "/repos/dobicinaitis/tailwind-cli-extra/releases/latest")
            .with_status(500)
            .create();

        let err = source_for(&mock)
            .fetch_metadata(&VersionSelector::Latest)
            .unwrap_err();
        assert_eq!(err.code(), "METADATA_UNAVAILABLE");
    }

    #[test]
    fn test_fetch_metadata_sends_bearer_token() {
        let mut mock = MockRelease::new();
        let m = mock
            .server
            .mock("GET", "/repos/dobicinaitis/tailwind-cli-extra/releases/latest")
            .match_header("authorization", "Bearer secret")
            .match_header("user-agent", "tailwindlab")
            .with_status(200)
            .with_body("{}")
            .create();

        source_for(&mock)
            .with_token(Some("secret".to_string()))
            .fetch_metadata(&VersionSelector::Latest)
            .unwrap();
        m.assert();
    }
}

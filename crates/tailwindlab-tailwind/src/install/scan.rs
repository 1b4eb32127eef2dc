//! Tolerant text scan of release metadata
//!
//! Used only when the metadata body does not deserialize as a release (truncated by
//! the size cap, proxies injecting garbage, schema drift). Each asset name is paired
//! with the digest and download URL found in a bounded window after it, which matches
//! how the API lays out the fields of one asset object.

use crate::install::release::Asset;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// How far past an asset name to look for its digest and download URL
pub const SCAN_WINDOW: usize = 2000;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""tag_name"\s*:\s*"([^"]+)""#).unwrap());
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""name"\s*:\s*"([^"]+)""#).unwrap());
static DIGEST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""digest"\s*:\s*"([^"]+)""#).unwrap());
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""browser_download_url"\s*:\s*"([^"]+)""#).unwrap());

/// Fields recovered from a malformed metadata body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRelease {
    pub tag: String,
    pub assets: Vec<Asset>,
}

/// Scans `body` for a release tag and asset entries
///
/// Returns `None` when no tag can be found. Names without a parseable download URL in
/// their window are dropped.
pub fn scan_release(body: &str) -> Option<ScannedRelease> {
    let tag = TAG_REGEX.captures(body)?.get(1)?.as_str().to_string();

    let names: Vec<_> = NAME_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(0).zip(caps.get(1)))
        .collect();

    let mut assets = Vec::new();
    for (idx, (whole, name)) in names.iter().enumerate() {
        let start = whole.end();
        let next_name = names.get(idx + 1).map(|(next, _)| next.start());
        let window = window_after(body, start, next_name);

        let Some(url) = capture(&URL_REGEX, window) else {
            continue;
        };
        let Ok(url) = Url::parse(&unescape(url)) else {
            tracing::debug!("skipping scanned asset {} with malformed url", name.as_str());
            continue;
        };

        assets.push(Asset {
            name: unescape(name.as_str()),
            url,
            digest: capture(&DIGEST_REGEX, window).map(str::to_string),
        });
    }

    Some(ScannedRelease { tag, assets })
}

/// Slice of at most [`SCAN_WINDOW`] bytes starting at `start`, cut at the next asset
/// name and at a char boundary
fn window_after(body: &str, start: usize, next_name: Option<usize>) -> &str {
    let mut end = (start + SCAN_WINDOW).min(body.len());
    if let Some(next) = next_name {
        end = end.min(next);
    }
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[start..end]
}

fn capture<'a>(regex: &Regex, haystack: &'a str) -> Option<&'a str> {
    regex
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn unescape(raw: &str) -> String {
    raw.replace("\\/", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_truncated_body() {
        let body = r#"{"tag_name":"v2.1.4","name":"v2.1.4","assets":[
            {"name":"tailwindcss-extra-linux-x86_64","size":10,
             "digest":"sha256:aaaa",
             "browser_download_url":"https:\/\/github.com\/d\/t\/releases\/download\/v2.1.4\/tailwindcss-extra-linux-x86_64"},
            {"name":"default.css","browser_download_url":"https://github.com/d/t/releases/download/v2.1.4/default.css"},
            {"name":"flowbite.min.js","digest":"sha256:cc"#;

        let scanned = scan_release(body).unwrap();
        assert_eq!(scanned.tag, "v2.1.4");

        let names: Vec<_> = scanned.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["tailwindcss-extra-linux-x86_64", "default.css"]);

        let primary = &scanned.assets[0];
        assert_eq!(primary.digest.as_deref(), Some("sha256:aaaa"));
        assert_eq!(
            primary.url.as_str(),
            "https://github.com/d/t/releases/download/v2.1.4/tailwindcss-extra-linux-x86_64"
        );
        assert!(scanned.assets[1].digest.is_none());
    }

    #[test]
    fn test_scan_does_not_borrow_fields_of_next_asset() {
        let body = r#""tag_name": "v1.0.0"
            "name": "mono.css"
            "name": "playful.css", "digest": "sha256:bb",
            "browser_download_url": "https://example.com/playful.css""#;

        let scanned = scan_release(body).unwrap();
        assert_eq!(scanned.assets.len(), 1);
        assert_eq!(scanned.assets[0].name, "playful.css");
    }

    #[test]
    fn test_scan_window_is_bounded() {
        let padding = " ".repeat(SCAN_WINDOW + 10);
        let body = format!(
            r#""tag_name":"v1.0.0","name":"far.css",{}"browser_download_url":"https://example.com/far.css""#,
            padding
        );

        let scanned = scan_release(&body).unwrap();
        assert!(scanned.assets.is_empty());
    }

    #[test]
    fn test_scan_without_tag_is_none() {
        assert!(scan_release("").is_none());
        assert!(scan_release("<html>rate limited</html>").is_none());
        assert!(scan_release(r#"{"name":"default.css"}"#).is_none());
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let body = format!("{}é", "a".repeat(SCAN_WINDOW - 1));
        let window = window_after(&body, 0, None);
        assert_eq!(window.len(), SCAN_WINDOW - 1);
    }
}

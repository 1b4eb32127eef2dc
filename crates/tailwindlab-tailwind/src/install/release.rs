//! Release metadata and the resolved asset set
//!
//! [`Release`]/[`ReleaseAsset`] mirror the GitHub API payload. [`Asset`] and
//! [`ResolvedAssetSet`] are the validated, classified form the fetch path works with.

use serde::{Deserialize, Serialize};
use url::Url;

/// GitHub Release metadata from API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "v2.1.4")
    pub tag_name: String,
    /// List of downloadable assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// GitHub Release asset as returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    /// `sha256:<hex>`; absent or null on older releases
    #[serde(default)]
    pub digest: Option<String>,
}

/// One remote file needed for an installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub url: Url,
    /// Remote integrity digest; `None` means the asset cannot be verified
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Primary,
    Stylesheet,
    Script,
}

/// Classifies an asset file name
///
/// An exact match of the platform binary name wins; otherwise `.css` names are
/// stylesheets and names with a `.js` extension boundary are scripts. Anything else is
/// not part of the set.
pub fn classify(name: &str, expected_binary: &str) -> Option<AssetKind> {
    if name == expected_binary {
        Some(AssetKind::Primary)
    } else if is_stylesheet_name(name) {
        Some(AssetKind::Stylesheet)
    } else if is_script_name(name) {
        Some(AssetKind::Script)
    } else {
        None
    }
}

pub fn is_stylesheet_name(name: &str) -> bool {
    name.ends_with(".css")
}

/// `.js` followed by end of name or a non-word character (`app.js`, `app.js.map`),
/// but not `.json` or `.jsx`
pub fn is_script_name(name: &str) -> bool {
    name.match_indices(".js").any(|(idx, _)| {
        name[idx + 3..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

/// Executable plus side assets of one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAssetSet {
    /// Release tag the assets belong to (`latest` when it could not be determined)
    pub tag: String,
    pub primary: Asset,
    pub stylesheets: Vec<Asset>,
    pub scripts: Vec<Asset>,
}

impl ResolvedAssetSet {
    /// Classifies `assets` into a set; `None` when no asset matches the binary name
    pub fn from_assets(tag: &str, expected_binary: &str, assets: Vec<Asset>) -> Option<Self> {
        let mut primary = None;
        let mut stylesheets = Vec::new();
        let mut scripts = Vec::new();

        for asset in assets {
            match classify(&asset.name, expected_binary) {
                Some(AssetKind::Primary) => {
                    if primary.is_none() {
                        primary = Some(asset);
                    }
                }
                Some(AssetKind::Stylesheet) => push_unique(&mut stylesheets, asset),
                Some(AssetKind::Script) => push_unique(&mut scripts, asset),
                None => {}
            }
        }

        primary.map(|primary| Self {
            tag: tag.to_string(),
            primary,
            stylesheets,
            scripts,
        })
    }

    /// Every asset, primary first
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &Asset)> {
        std::iter::once((AssetKind::Primary, &self.primary))
            .chain(self.stylesheets.iter().map(|a| (AssetKind::Stylesheet, a)))
            .chain(self.scripts.iter().map(|a| (AssetKind::Script, a)))
    }

    pub fn len(&self) -> usize {
        1 + self.stylesheets.len() + self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn push_unique(list: &mut Vec<Asset>, asset: Asset) {
    if !list.iter().any(|existing| existing.name == asset.name) {
        list.push(asset);
    }
}

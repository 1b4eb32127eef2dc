//! Release metadata and executable fixtures

use serde_json::Value;

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// One asset entry of a fake GitHub release
#[derive(Debug, Clone)]
pub struct FakeAsset {
    pub name: String,
    pub url: String,
    pub digest: Option<String>,
}

impl FakeAsset {
    pub fn new(name: &str, url: &str, digest: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            digest: digest.map(str::to_string),
        }
    }
}

/// Builds a GitHub release metadata document
///
/// Mirrors the shape and field order of `GET /repos/{owner}/{repo}/releases/...`,
/// including the per-asset `digest` field (`sha256:<hex>`) and noise fields between
/// an asset's name and its download URL.
pub fn release_json(tag: &str, assets: &[FakeAsset]) -> String {
    let assets: Vec<String> = assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            format!(
                concat!(
                    r#"{{"url":"https://api.github.com/assets/{id}","id":{id},"name":{name},"#,
                    r#""label":"","uploader":{{"login":"dobicinaitis","id":1,"type":"User"}},"#,
                    r#""content_type":"application/octet-stream","state":"uploaded","size":1024,"#,
                    r#""digest":{digest},"download_count":0,"browser_download_url":{url}}}"#
                ),
                id = i,
                name = Value::from(asset.name.as_str()),
                digest = Value::from(asset.digest.clone()),
                url = Value::from(asset.url.as_str()),
            )
        })
        .collect();

    format!(
        concat!(
            r#"{{"url":"https://api.github.com/repos/dobicinaitis/tailwind-cli-extra/releases/1","#,
            r#""tag_name":{tag},"name":{tag},"draft":false,"prerelease":false,"assets":[{assets}]}}"#
        ),
        tag = Value::from(tag),
        assets = assets.join(","),
    )
}

/// Writes a shell script standing in for the tailwind CLI
///
/// The script understands `--input`/`--output`, copies the input to the output with a
/// `--font-weight-bold: 700` line appended, and records every argument it received in
/// `<output>.args`. A missing input makes it print to stderr and exit 1.
#[cfg(unix)]
pub fn write_fake_tailwind(dir: &Path, name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
input=""
output=""
all="$*"
while [ $# -gt 0 ]; do
  case "$1" in
    --input) input="$2"; shift 2 ;;
    --output) output="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if [ ! -f "$input" ]; then
  echo "Specified input file $input does not exist." >&2
  exit 1
fi
echo "noise on stdout"
cat "$input" > "$output"
echo "--font-weight-bold: 700;" >> "$output"
echo "$all" > "$output.args"
"#;

    std::fs::create_dir_all(dir).expect("Failed to create fake binary directory");
    let path = dir.join(name);
    std::fs::write(&path, script).expect("Failed to write fake binary");
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

//! SHA-256 verification of downloaded assets

use crate::install::release::Asset;
use crate::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tailwindlab_core::TailwindlabError;

const DIGEST_PREFIX: &str = "sha256:";

/// Strips the `sha256:` prefix GitHub puts in front of asset digests
pub fn normalize_digest(remote: &str) -> &str {
    let trimmed = remote.trim();
    trimmed.strip_prefix(DIGEST_PREFIX).unwrap_or(trimmed)
}

/// Lowercase hex SHA-256 of a file's contents
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verifies a written asset file against its remote digest
///
/// Verification only happens in strict mode and when the asset carries a digest.
/// The comparison is case-sensitive.
///
/// # Errors
///
/// Returns `ChecksumMismatch` with both values when the digests differ.
pub fn verify(asset: &Asset, path: &Path, strict: bool) -> Result<()> {
    let Some(remote) = asset.digest.as_deref() else {
        tracing::debug!("{}: no digest published, skipping verification", asset.name);
        return Ok(());
    };

    if !strict {
        tracing::debug!("{}: strict mode off, skipping verification", asset.name);
        return Ok(());
    }

    let expected = normalize_digest(remote);
    let actual = sha256_file(path)?;

    if actual != expected {
        return Err(TailwindlabError::ChecksumMismatch {
            asset: asset.name.clone(),
            expected: expected.to_string(),
            actual,
        });
    }

    tracing::debug!("{}: sha256 verified", asset.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use url::Url;

    // sha256("hello")
    const HELLO_SHA: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn asset_with(digest: Option<&str>) -> Asset {
        Asset {
            name: "default.css".to_string(),
            url: Url::parse("https://example.com/default.css").unwrap(),
            digest: digest.map(str::to_string),
        }
    }

    fn write_hello() -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tailwindlab_testkit::temp_dir_in_workspace();
        let path = temp.path().join("default.css");
        fs::write(&path, b"hello").unwrap();
        (temp, path)
    }

    #[test]
    fn test_normalize_digest() {
        assert_eq!(normalize_digest("sha256:abc"), "abc");
        assert_eq!(normalize_digest("abc"), "abc");
        assert_eq!(normalize_digest(" sha256:abc \n"), "abc");
    }

    #[test]
    fn test_sha256_file() {
        let (_temp, path) = write_hello();
        assert_eq!(sha256_file(&path).unwrap(), HELLO_SHA);
    }

    #[test]
    fn test_verify_accepts_matching_digest() {
        let (_temp, path) = write_hello();
        let digest = format!("sha256:{}", HELLO_SHA);
        verify(&asset_with(Some(&digest)), &path, true).unwrap();
    }

    #[test]
    fn test_verify_strict_mismatch_carries_both_values() {
        let (_temp, path) = write_hello();
        let err = verify(&asset_with(Some("sha256:deadbeef")), &path, true).unwrap_err();

        match err {
            TailwindlabError::ChecksumMismatch {
                asset,
                expected,
                actual,
            } => {
                assert_eq!(asset, "default.css");
                assert_eq!(expected, "deadbeef");
                assert_eq!(actual, HELLO_SHA);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let (_temp, path) = write_hello();
        let upper = format!("sha256:{}", HELLO_SHA.to_uppercase());
        assert!(verify(&asset_with(Some(&upper)), &path, true).is_err());
    }

    #[test]
    fn test_verify_skipped_when_not_strict() {
        let (_temp, path) = write_hello();
        verify(&asset_with(Some("sha256:deadbeef")), &path, false).unwrap();
    }

    #[test]
    fn test_verify_skipped_without_digest() {
        let (_temp, path) = write_hello();
        verify(&asset_with(None), &path, true).unwrap();
    }
}

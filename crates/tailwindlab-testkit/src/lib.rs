//! Test utilities for tailwindlab
//!
//! Shared helpers used by the integration tests of every workspace crate.

pub mod fixtures;
pub mod mock;

pub use fixtures::{FakeAsset, release_json};
#[cfg(unix)]
pub use fixtures::write_fake_tailwind;
pub use mock::{MockRelease, TRICKLE_CHUNK};

use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the current working directory
///
/// All test temporary files end up in one gitignored location that is easy to clean up
/// by hand if a test aborts before the `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be created.
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Variant of [`temp_dir_in_workspace`] returning an error instead of panicking
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_is_under_tmp() {
        let temp = temp_dir_in_workspace();
        assert!(temp.path().exists());
        assert!(temp.path().parent().unwrap().ends_with(".tmp"));
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

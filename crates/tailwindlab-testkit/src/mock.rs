//! Mock release hosting for HTTP-level tests
//!
//! Wraps a dedicated mockito server per test. Each test gets its own server, so tests
//! never compete for mock paths.

use crate::fixtures::{FakeAsset, release_json};
use crate::sha256_hex;
use mockito::{Mock, Server, ServerGuard};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Size of each piece written by [`MockRelease::serve_trickled_asset`]
pub const TRICKLE_CHUNK: usize = 64;

/// A fake GitHub release: metadata endpoint plus downloadable asset bodies
pub struct MockRelease {
    pub server: ServerGuard,
    pub owner: String,
    pub repo: String,
    mocks: Vec<Mock>,
}

impl MockRelease {
    pub fn new() -> Self {
        Self {
            server: Server::new(),
            owner: "dobicinaitis".to_string(),
            repo: "tailwind-cli-extra".to_string(),
            mocks: Vec::new(),
        }
    }

    /// Base URL of the server (used for both API and downloads)
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Download URL the server serves `name` under
    pub fn asset_url(&self, name: &str) -> String {
        format!("{}/download/{}", self.server.url(), name)
    }

    /// Path of the metadata endpoint for `latest` (`None`) or a tag
    pub fn metadata_path(&self, tag: Option<&str>) -> String {
        match tag {
            None => format!("/repos/{}/{}/releases/latest", self.owner, self.repo),
            Some(tag) => format!("/repos/{}/{}/releases/tags/{}", self.owner, self.repo, tag),
        }
    }

    /// Serves an asset body, expecting exactly `hits` downloads
    pub fn serve_asset(&mut self, name: &str, body: &[u8], hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("/download/{}", name).as_str())
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(body)
            .expect(hits)
            .create();
        self.mocks.push(mock);
        self
    }

    /// Serves an asset as `chunks` pieces of [`TRICKLE_CHUNK`] bytes, sleeping `interval`
    /// before each; expects at most one download
    pub fn serve_trickled_asset(
        &mut self,
        name: &str,
        chunks: usize,
        interval: Duration,
    ) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("/download/{}", name).as_str())
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_chunked_body(move |w| {
                for _ in 0..chunks {
                    thread::sleep(interval);
                    w.write_all(&[b'x'; TRICKLE_CHUNK])?;
                    w.flush()?;
                }
                Ok(())
            })
            .expect_at_most(1)
            .create();
        self.mocks.push(mock);
        self
    }

    /// Serves an asset path with a non-success status
    pub fn fail_asset(&mut self, name: &str, status: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("/download/{}", name).as_str())
            .with_status(status)
            .create();
        self.mocks.push(mock);
        self
    }

    /// Serves a metadata document listing `assets` (name, body) with real digests
    pub fn serve_release(
        &mut self,
        tag: Option<&str>,
        release_tag: &str,
        assets: &[(&str, &[u8])],
        hits: usize,
    ) -> &mut Self {
        let fake: Vec<FakeAsset> = assets
            .iter()
            .map(|(name, body)| FakeAsset {
                name: name.to_string(),
                url: self.asset_url(name),
                digest: Some(format!("sha256:{}", sha256_hex(body))),
            })
            .collect();
        let json = release_json(release_tag, &fake);
        self.serve_metadata_raw(tag, &json, hits)
    }

    /// Serves an arbitrary metadata body
    pub fn serve_metadata_raw(&mut self, tag: Option<&str>, body: &str, hits: usize) -> &mut Self {
        let path = self.metadata_path(tag);
        let mock = self
            .server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create();
        self.mocks.push(mock);
        self
    }

    /// Asserts every registered mock was hit the expected number of times
    pub fn assert(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

impl Default for MockRelease {
    fn default() -> Self {
        Self::new()
    }
}

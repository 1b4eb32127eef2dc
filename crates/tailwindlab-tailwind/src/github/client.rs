//! HTTP client construction for GitHub interactions

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for GitHub requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Product identifier sent as `User-Agent`
pub const USER_AGENT: &str = "tailwindlab";

/// Builds the HTTP client shared by the resolver and the fetch orchestrator
///
/// `timeout` bounds connection establishment; each request sets its own overall
/// timeout on top.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(timeout)
        .build()
}

/// Builds HTTP client with [`DEFAULT_TIMEOUT`]
pub fn build_default_client() -> Result<Client, reqwest::Error> {
    build_client(DEFAULT_TIMEOUT)
}

/// GitHub token from `GITHUB_TOKEN` or `GH_TOKEN`, if set and non-empty
pub fn auth_token() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|token| !token.trim().is_empty())
}

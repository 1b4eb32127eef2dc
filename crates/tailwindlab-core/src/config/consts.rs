//! Constants shared across the workspace

/// Release hosting defaults
pub mod release {
    /// GitHub owner of the tailwind CLI "extra" builds
    pub const OWNER: &str = "dobicinaitis";

    /// GitHub repository of the tailwind CLI "extra" builds
    pub const REPO: &str = "tailwind-cli-extra";

    pub const API_BASE_URL: &str = "https://api.github.com";

    pub const DOWNLOAD_BASE_URL: &str = "https://github.com";

    /// Per-request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 30;

    /// Per-asset download timeout in seconds (binaries are large)
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

    /// Upper bound on the release metadata body (1 MiB)
    pub const MAX_METADATA_BYTES: u64 = 1024 * 1024;
}

/// Config file discovery
pub mod file {
    pub const CONFIG_FILE_NAME: &str = "tailwindlab.toml";
}

/// Managed cache location relative to the OS cache directory
pub mod cache {
    pub const APP_DIR: &str = "tailwindlab";
    pub const TOOL_DIR: &str = "tailwind";
}

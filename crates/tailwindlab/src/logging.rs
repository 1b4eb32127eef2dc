//! Diagnostic logging to stderr

use std::io;
use tracing_subscriber::EnvFilter;

/// Filter variable, e.g. `TAILWINDLAB_LOG=tailwindlab_tailwind=debug`
const LOG_ENV: &str = "TAILWINDLAB_LOG";

const VERBOSE_FILTER: &str = "tailwindlab=debug,tailwindlab_core=debug,tailwindlab_tailwind=debug";

/// Installs the fmt subscriber; `--verbose` wins over the environment
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

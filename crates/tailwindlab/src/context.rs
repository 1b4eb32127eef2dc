//! Configuration shared by every command

use crate::cli::SourceArgs;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tailwindlab_core::config::Config;
use tailwindlab_core::config::consts::file::CONFIG_FILE_NAME;
use tailwindlab_tailwind::{Installer, identify};

/// Loaded configuration with command-line overrides applied
pub struct Context {
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Loads `explicit` if given, otherwise `./tailwindlab.toml` when it exists
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or any config file
    /// cannot be parsed.
    pub fn load(explicit: Option<&Path>, verbose: bool) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Config::from_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => Config::load_or_default(std::env::current_dir()?.join(CONFIG_FILE_NAME))?,
        };

        Ok(Self { config, verbose })
    }

    /// Applies `--version`, `--cache-dir` and strictness flags
    pub fn apply_source(&mut self, source: &SourceArgs) {
        if let Some(version) = &source.version {
            self.config.tailwind.version = version.clone();
        }
        self.override_cache_dir(source.cache_dir.clone());
        if let Some(strict) = source.strict {
            self.config.tailwind.strict = strict;
        }
        if source.no_strict {
            self.config.tailwind.strict = false;
        }
    }

    pub fn override_cache_dir(&mut self, cache_dir: Option<PathBuf>) {
        if cache_dir.is_some() {
            self.config.tailwind.cache_dir = cache_dir;
        }
    }

    /// Installer for the host platform
    pub fn installer(&self) -> Result<Installer> {
        Ok(Installer::from_config(&self.config, identify()?)?)
    }
}

//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tailwindlab_core::VersionSelector;

#[derive(Parser)]
#[command(name = "tailwindlab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to tailwindlab.toml (defaults to ./tailwindlab.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a stylesheet with the tailwind CLI, installing it if needed
    Build(BuildArgs),

    /// Download and cache the tailwind CLI and its side assets
    Install {
        #[command(flatten)]
        source: SourceArgs,

        /// Discard the cached release and download it again
        #[arg(short, long)]
        force: bool,
    },

    /// Show the detected platform and its release binary name
    Platform {
        #[arg(long)]
        json: bool,
    },

    /// Inspect or clean the release cache
    Cache {
        /// Cache base directory
        #[arg(long, env = "TAILWINDLAB_CACHE_DIR", value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        #[command(subcommand)]
        command: CacheCommands,
    },
}

/// Where releases come from and how they are verified
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Release to use: "latest" or a version such as 2.1.4
    #[arg(long, env = "TAILWINDLAB_VERSION", value_name = "VERSION")]
    pub version: Option<VersionSelector>,

    /// Cache base directory
    #[arg(long, env = "TAILWINDLAB_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enforce SHA-256 verification of downloaded assets
    #[arg(long, env = "TAILWINDLAB_STRICT", value_name = "BOOL")]
    pub strict: Option<bool>,

    /// Skip SHA-256 verification of downloaded assets (wins over --strict)
    #[arg(long)]
    pub no_strict: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Input stylesheet (overrides build.input)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output stylesheet (overrides build.output)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep rebuilding on changes
    #[arg(short, long)]
    pub watch: bool,

    #[arg(short, long)]
    pub minify: bool,

    #[arg(long)]
    pub optimize: bool,

    /// Emit a source map
    #[arg(long)]
    pub map: bool,

    /// Extra flags passed to the tailwind CLI (split on whitespace)
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub extra: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Print the cache entry of a release
    Path {
        #[arg(long, value_name = "VERSION")]
        version: Option<VersionSelector>,
    },

    /// List cached releases
    List {
        #[arg(long)]
        json: bool,
    },

    /// Remove one cached release, or the whole cache
    Clear {
        #[arg(long, value_name = "VERSION")]
        version: Option<VersionSelector>,
    },
}

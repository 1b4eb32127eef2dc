//! Tailwind CLI acquisition and invocation for tailwindlab.
//!
//! This crate locates, downloads, verifies and runs the prebuilt `tailwindcss-extra`
//! binary, then places the release's side assets (theme stylesheets and scripts) next
//! to the build output.
//!
//! # Architecture
//!
//! - [`platform`]: host OS/architecture and the platform binary name
//! - [`github`]: HTTP client, URL helpers and streaming downloads
//! - [`install`]: release resolution, cache management and the concurrent fetch
//! - [`exec`]: subprocess invocation and side-asset placement
//!
//! # Flow
//!
//! ```text
//! exec::run()
//!     ↓
//! 1. Cache check: {cache_dir}/{selector}/{binary}
//!     ↓ (miss)
//! 2. Lock {cache_dir}/{selector}.lock, re-check
//!     ↓ (still missing)
//! 3. Resolve release metadata (structured parse → text scan → static fallback)
//!     ↓
//! 4. Download every asset concurrently into a staging dir, verify SHA-256
//!     ↓
//! 5. Rename staging dir to {cache_dir}/{selector}
//!     ↓
//! 6. Run binary --input .. --output .., copy side assets to {out_dir}/flowbite/
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tailwindlab_core::config::Config;
//! use tailwindlab_tailwind::exec::{BuildFlag, RunOptions, run};
//! use std::path::Path;
//!
//! # fn main() -> tailwindlab_core::Result<()> {
//! let config = Config::default();
//! let options = RunOptions::from_config(&config).with_flag(BuildFlag::Minify);
//!
//! let report = run(Path::new("assets/app.css"), Path::new("public/app.css"), None, &options)?;
//! println!("built with {}", report.binary.display());
//! # Ok(())
//! # }
//! ```

pub mod exec;
pub mod github;
pub mod install;
pub mod platform;

pub use exec::{BuildFlag, RunOptions, RunReport, run};
pub use install::{CachedAssetSet, InstallOutcome, Installer};
pub use platform::{Arch, Os, Platform, identify};

pub type Result<T> = tailwindlab_core::Result<T>;

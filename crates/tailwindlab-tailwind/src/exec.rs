//! Tailwind invocation and side-asset placement
//!
//! The binary is run as `<binary> --input <in> --output <out> [flags..]` with stdout
//! discarded and the first KiB of stderr kept for the error report. After a successful
//! run the release's side assets are copied next to the output:
//!
//! ```text
//! {dirname(output)}/flowbite/
//! ├── themes/
//! │   └── default.css
//! └── flowbite.min.js
//! ```

use crate::Result;
use crate::install::{CachedAssetSet, Installer};
use crate::platform::identify;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tailwindlab_core::config::Config;
use tailwindlab_core::{TailwindlabError, VersionSelector};

/// Directory (beside the output file) receiving side assets
pub const SIDE_ASSET_DIR: &str = "flowbite";

/// Subdirectory of [`SIDE_ASSET_DIR`] receiving stylesheets
pub const THEMES_DIR: &str = "themes";

/// Upper bound on captured stderr
pub const MAX_STDERR_BYTES: u64 = 1024;

/// Option flags passed through to the binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFlag {
    Watch,
    Minify,
    Optimize,
    SourceMap,
    /// Arbitrary flags, split on whitespace
    Custom(String),
}

impl BuildFlag {
    pub fn args(&self) -> Vec<String> {
        match self {
            BuildFlag::Watch => vec!["--watch".to_string()],
            BuildFlag::Minify => vec!["--minify".to_string()],
            BuildFlag::Optimize => vec!["--optimize".to_string()],
            BuildFlag::SourceMap => vec!["--map".to_string()],
            BuildFlag::Custom(raw) => raw.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Everything [`run`] needs besides the input and output paths
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub version: VersionSelector,
    pub flags: Vec<BuildFlag>,
    pub config: Config,
}

impl RunOptions {
    /// Version, release settings and default flags from configuration
    pub fn from_config(config: &Config) -> Self {
        let mut flags = Vec::new();
        if config.build.minify {
            flags.push(BuildFlag::Minify);
        }
        if config.build.optimize {
            flags.push(BuildFlag::Optimize);
        }
        if config.build.map {
            flags.push(BuildFlag::SourceMap);
        }
        if !config.build.extra_args.trim().is_empty() {
            flags.push(BuildFlag::Custom(config.build.extra_args.clone()));
        }

        Self {
            version: config.tailwind.version.clone(),
            flags,
            config: config.clone(),
        }
    }

    /// Adds a flag unless it is already present
    pub fn with_flag(mut self, flag: BuildFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn with_version(mut self, version: VersionSelector) -> Self {
        self.version = version;
        self
    }

    /// Command-line arguments for all flags, in order
    pub fn args(&self) -> Vec<String> {
        self.flags.iter().flat_map(BuildFlag::args).collect()
    }
}

/// Outcome of a successful [`run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub binary: PathBuf,
    pub output: PathBuf,
    /// Side assets copied beside the output
    pub side_assets: Vec<PathBuf>,
    /// Whether the binary came from the cache without network access
    pub cached: bool,
}

/// Ensures the binary for `options.version` is installed, runs it and places side
/// assets
///
/// `extra_directory` overrides the cache base directory.
///
/// # Errors
///
/// Returns error if the platform is unsupported, the install fails, the binary exits
/// unsuccessfully, or a side asset cannot be copied.
pub fn run(
    input: &Path,
    output: &Path,
    extra_directory: Option<&Path>,
    options: &RunOptions,
) -> Result<RunReport> {
    let mut config = options.config.clone();
    if let Some(dir) = extra_directory {
        config.tailwind.cache_dir = Some(dir.to_path_buf());
    }

    let installer = Installer::from_config(&config, identify()?)?;
    run_with(&installer, input, output, options)
}

/// [`run`] with an explicit installer
pub fn run_with(
    installer: &Installer,
    input: &Path,
    output: &Path,
    options: &RunOptions,
) -> Result<RunReport> {
    let outcome = installer.ensure(&options.version)?;
    let cached = outcome.was_cached();
    let assets = outcome.into_assets();

    invoke(&assets.binary, input, output, &options.args())?;
    let side_assets = place_side_assets(&assets, output)?;

    Ok(RunReport {
        binary: assets.binary,
        output: output.to_path_buf(),
        side_assets,
        cached,
    })
}

/// Runs `binary --input <input> --output <output> <args..>` to completion
///
/// # Errors
///
/// Returns `ExecSpawnFailed` if the process cannot start and `ExecFailed` with the
/// captured stderr if it exits unsuccessfully.
pub fn invoke(binary: &Path, input: &Path, output: &Path, args: &[String]) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    tracing::debug!(
        "running {} --input {} --output {} {}",
        binary.display(),
        input.display(),
        output.display(),
        args.join(" ")
    );

    let mut child = Command::new(binary)
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TailwindlabError::ExecSpawnFailed {
            path: binary.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut stderr = Vec::new();
    if let Some(pipe) = child.stderr.take() {
        let mut limited = pipe.take(MAX_STDERR_BYTES);
        limited.read_to_end(&mut stderr)?;
        // Keep the pipe drained so the child never blocks on a full buffer
        io::copy(&mut limited.into_inner(), &mut io::sink())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(TailwindlabError::ExecFailed {
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Copies cached side assets into `{dirname(output)}/flowbite`
///
/// The destination is removed first so nothing from an earlier release survives.
/// Copies run concurrently; the first failure is returned.
pub fn place_side_assets(assets: &CachedAssetSet, output: &Path) -> Result<Vec<PathBuf>> {
    let out_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let root = out_dir.join(SIDE_ASSET_DIR);
    let themes = root.join(THEMES_DIR);

    if root.exists() {
        fs::remove_dir_all(&root)?;
    }

    let mut copies = Vec::new();
    if !assets.stylesheets.is_empty() {
        fs::create_dir_all(&themes)?;
        copies.extend(assets.stylesheets.iter().map(|from| (from, &themes)));
    }
    if !assets.scripts.is_empty() {
        fs::create_dir_all(&root)?;
        copies.extend(assets.scripts.iter().map(|from| (from, &root)));
    }

    let results: Vec<Result<PathBuf>> = thread::scope(|scope| {
        let handles: Vec<_> = copies
            .iter()
            .map(|(from, dir)| scope.spawn(move || copy_into(from, dir)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(TailwindlabError::Generic("asset copy task panicked".to_string()))
                })
            })
            .collect()
    });

    let placed = results.into_iter().collect::<Result<Vec<_>>>()?;
    tracing::debug!("placed {} side assets in {}", placed.len(), root.display());
    Ok(placed)
}

fn copy_into(from: &Path, dir: &Path) -> Result<PathBuf> {
    let to = match from.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    };
    fs::copy(from, &to).map_err(|e| TailwindlabError::AssetCopyFailed {
        from: from.to_path_buf(),
        to: to.clone(),
        reason: e.to_string(),
    })?;
    Ok(to)
}

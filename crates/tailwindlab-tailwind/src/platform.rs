//! Host platform identification
//!
//! Release artifacts are named `tailwindcss-extra-<os>-<arch>` (plus `.exe` on
//! Windows). The OS comes from the compile target; the architecture comes from a
//! `uname -m` probe.

use crate::Result;
use std::io::Read;
use std::process::{Command, Stdio};
use tailwindlab_core::TailwindlabError;

/// Prefix shared by every primary binary asset
pub const BINARY_PREFIX: &str = "tailwindcss-extra";

/// Host introspection command printing the machine architecture
const ARCH_PROBE: (&str, &[&str]) = ("uname", &["-m"]);

/// Upper bound on probe output; one short line is expected
const MAX_PROBE_OUTPUT: u64 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Linux,
    MacOS,
}

impl Os {
    pub fn tag(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::MacOS => "macos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    Armv7,
    X86_64,
    Unknown,
}

impl Arch {
    /// Maps a raw architecture string to its canonical tag
    pub fn normalize(raw: &str) -> Arch {
        match raw.trim() {
            "aarch64" | "arm64" => Arch::Arm64,
            "armv7" => Arch::Armv7,
            "x86_64" => Arch::X86_64,
            _ => Arch::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::Armv7 => "armv7",
            Arch::X86_64 => "x86_64",
            Arch::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detects the host platform; the architecture may be [`Arch::Unknown`]
    pub fn detect() -> Self {
        Self {
            os: detect_os(),
            arch: detect_arch(),
        }
    }

    /// Name of the primary executable asset for this platform
    pub fn binary_name(&self) -> Result<String> {
        if self.arch == Arch::Unknown {
            return Err(TailwindlabError::UnsupportedPlatform {
                os: self.os.tag().to_string(),
                arch: self.arch.tag().to_string(),
            });
        }

        let suffix = if self.os == Os::Windows { ".exe" } else { "" };
        Ok(format!(
            "{}-{}-{}{}",
            BINARY_PREFIX,
            self.os.tag(),
            self.arch.tag(),
            suffix
        ))
    }
}

/// Identifies the host platform, failing when the architecture is not supported
///
/// The error names the architecture exactly as the host reported it.
pub fn identify() -> Result<Platform> {
    identify_from(detect_os(), &raw_arch())
}

fn identify_from(os: Os, raw_arch: &str) -> Result<Platform> {
    let platform = Platform::new(os, Arch::normalize(raw_arch));
    if platform.arch == Arch::Unknown {
        let reported = raw_arch.trim();
        return Err(TailwindlabError::UnsupportedPlatform {
            os: os.tag().to_string(),
            arch: if reported.is_empty() {
                "<empty>".to_string()
            } else {
                reported.to_string()
            },
        });
    }
    tracing::debug!(
        "identified platform {}-{}",
        platform.os.tag(),
        platform.arch.tag()
    );
    Ok(platform)
}

pub fn detect_os() -> Os {
    #[cfg(target_os = "windows")]
    return Os::Windows;

    #[cfg(target_os = "linux")]
    return Os::Linux;

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    Os::MacOS
}

/// Detects the architecture through the host probe
///
/// Empty or unexpected probe output yields [`Arch::Unknown`].
pub fn detect_arch() -> Arch {
    Arch::normalize(&raw_arch())
}

/// Probe output, or the compile-time architecture when the probe cannot be run at all
fn raw_arch() -> String {
    probe_arch().unwrap_or_else(|| {
        tracing::debug!(
            "architecture probe unavailable, using compile-time {}",
            std::env::consts::ARCH
        );
        std::env::consts::ARCH.to_string()
    })
}

/// Runs the probe and returns its trimmed first line (`None` if it could not run)
fn probe_arch() -> Option<String> {
    let (program, args) = ARCH_PROBE;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let mut raw = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        let mut limited = stdout.take(MAX_PROBE_OUTPUT);
        if limited.read_to_end(&mut raw).is_err() {
            raw.clear();
        }
    }
    let _ = child.wait();

    let text = String::from_utf8_lossy(&raw);
    Some(text.lines().next().unwrap_or("").trim().to_string())
}

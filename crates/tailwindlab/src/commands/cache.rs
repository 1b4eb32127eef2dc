//! Cache commands - inspect and clean the release cache

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tailwindlab_core::VersionSelector;

#[derive(Debug, Serialize)]
struct EntryInfo {
    selector: String,
    path: String,
    installed: bool,
}

/// Execute `tailwindlab cache path`
pub fn path(ctx: &Context, version: Option<VersionSelector>) -> Result<()> {
    let installer = ctx.installer()?;
    let selector = version.unwrap_or_else(|| ctx.config.tailwind.version.clone());

    print_text(&installer.binary_path(&selector)?.display().to_string())?;
    if ctx.verbose && installer.cached(&selector)?.is_none() {
        print_text(&format!("{} not installed yet", "!".yellow()))?;
    }
    Ok(())
}

/// Execute `tailwindlab cache list`
pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let installer = ctx.installer()?;
    let entries: Vec<EntryInfo> = installer
        .layout()
        .list_entries(&installer.binary_name()?)?
        .into_iter()
        .map(|entry| EntryInfo {
            selector: entry.selector,
            path: entry.path.display().to_string(),
            installed: entry.has_binary,
        })
        .collect();

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        print_text(&format!(
            "No cached releases in {}",
            installer.layout().base().display()
        ))?;
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.installed {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        print_text(&format!("{} {:<10} {}", marker, entry.selector, entry.path))?;
    }
    Ok(())
}

/// Execute `tailwindlab cache clear`
pub fn clear(ctx: &Context, version: Option<VersionSelector>) -> Result<()> {
    let installer = ctx.installer()?;

    let (removed, what) = match &version {
        Some(selector) => (installer.remove(selector)?, format!("tailwind {}", selector)),
        None => (
            installer.layout().clear()?,
            installer.layout().base().display().to_string(),
        ),
    };

    if removed {
        print_text(&format!("{} Removed {}", "✓".green().bold(), what))?;
    } else {
        print_text(&format!("Nothing to remove for {}", what))?;
    }
    Ok(())
}

//! Install command - download the tailwind CLI release into the cache

use crate::cli::SourceArgs;
use crate::context::Context;
use crate::output::print_text;
use anyhow::Result;
use colored::Colorize;
use tailwindlab_tailwind::InstallOutcome;

/// Execute `tailwindlab install`
pub fn run(ctx: &mut Context, source: &SourceArgs, force: bool) -> Result<()> {
    ctx.apply_source(source);
    let installer = ctx.installer()?;
    let selector = ctx.config.tailwind.version.clone();

    if ctx.verbose {
        print_text(&format!(
            "{} Installing tailwind {} into {}",
            "→".cyan(),
            selector,
            installer.layout().base().display()
        ))?;
    }

    let outcome = if force {
        installer.reinstall(&selector)?
    } else {
        installer.ensure(&selector)?
    };

    let assets = outcome.assets();
    match &outcome {
        InstallOutcome::Cached(_) => print_text(&format!(
            "{} tailwind {} already installed: {}",
            "✓".green().bold(),
            selector,
            assets.binary.display()
        ))?,
        InstallOutcome::Fetched { tag, .. } => print_text(&format!(
            "{} Installed tailwind {} to {}",
            "✓".green().bold(),
            tag,
            assets.binary.display()
        ))?,
    }
    print_text(&format!(
        "  {} stylesheets, {} scripts",
        assets.stylesheets.len(),
        assets.scripts.len()
    ))?;

    Ok(())
}

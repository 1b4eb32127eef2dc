//! Build command - run the tailwind CLI and place side assets

use crate::cli::BuildArgs;
use crate::context::Context;
use crate::output::print_text;
use anyhow::{Result, anyhow};
use colored::Colorize;
use tailwindlab_tailwind::exec::{BuildFlag, RunOptions, run_with};

/// Build a stylesheet
///
/// Flags on the command line are added to those enabled in `[build]`.
pub fn run(ctx: &mut Context, args: BuildArgs) -> Result<()> {
    ctx.apply_source(&args.source);

    let input = args
        .input
        .or_else(|| ctx.config.build.input.clone())
        .ok_or_else(|| anyhow!("No input stylesheet: pass --input or set build.input"))?;
    let output = args
        .output
        .or_else(|| ctx.config.build.output.clone())
        .ok_or_else(|| anyhow!("No output path: pass --output or set build.output"))?;

    let mut options = RunOptions::from_config(&ctx.config);
    let requested = [
        (args.watch, BuildFlag::Watch),
        (args.minify, BuildFlag::Minify),
        (args.optimize, BuildFlag::Optimize),
        (args.map, BuildFlag::SourceMap),
    ];
    for (enabled, flag) in requested {
        if enabled {
            options = options.with_flag(flag);
        }
    }
    if let Some(extra) = args.extra.filter(|e| !e.trim().is_empty()) {
        options = options.with_flag(BuildFlag::Custom(extra));
    }

    if ctx.verbose {
        print_text(&format!(
            "{} Building {} -> {} (tailwind {})",
            "→".cyan(),
            input.display(),
            output.display(),
            options.version
        ))?;
    }

    let installer = ctx.installer()?;
    let report = run_with(&installer, &input, &output, &options)?;

    if ctx.verbose {
        for asset in &report.side_assets {
            print_text(&format!("  {} {}", "+".green(), asset.display()))?;
        }
    }

    let source = if report.cached { "cached" } else { "downloaded" };
    print_text(&format!(
        "{} Built {} ({} side assets, {} {})",
        "✓".green().bold(),
        report.output.display(),
        report.side_assets.len(),
        source,
        report.binary.display()
    ))?;

    Ok(())
}

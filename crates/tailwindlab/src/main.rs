mod cli;
mod commands;
mod context;
mod logging;
mod output;

use clap::Parser;
use cli::{CacheCommands, Cli, Commands};
use context::Context;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = Context::load(cli.config.as_deref(), cli.verbose).and_then(|mut ctx| {
        match cli.command {
            Commands::Build(args) => commands::build::run(&mut ctx, args),
            Commands::Install { source, force } => commands::install::run(&mut ctx, &source, force),
            Commands::Platform { json } => commands::platform::run(json),
            Commands::Cache { cache_dir, command } => {
                ctx.override_cache_dir(cache_dir);
                match command {
                    CacheCommands::Path { version } => commands::cache::path(&ctx, version),
                    CacheCommands::List { json } => commands::cache::list(&ctx, json),
                    CacheCommands::Clear { version } => commands::cache::clear(&ctx, version),
                }
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

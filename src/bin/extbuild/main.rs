//! extbuild CLI - configuration-phase helper for native extension builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use extbuild::util::GlobalContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("extbuild=debug")
    } else {
        EnvFilter::new("extbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Completions need no project
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let mut ctx = match cli.directory {
        Some(ref dir) => GlobalContext::with_root(dir)?,
        None => GlobalContext::new()?,
    };
    ctx.set_verbose(cli.verbose);
    if cli.no_color {
        ctx.set_color(false);
    }

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, &ctx),
        Commands::Classify(args) => commands::classify::execute(args, &ctx),
        Commands::Vsproj(args) => commands::vsproj::execute(args, &ctx),
        Commands::Toolchain(args) => commands::toolchain::execute(args, &ctx),
        Commands::Dump(args) => commands::dump::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// extbuild - configuration-phase helper for native extension builds
#[derive(Parser)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Run as if started in DIR
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configuration phase
    Configure(ConfigureArgs),

    /// Show the header and implementation found for each path
    Classify(ClassifyArgs),

    /// Generate the IDE project
    Vsproj(VsprojArgs),

    /// Show the toolchain initialization script
    Toolchain(ToolchainArgs),

    /// Write the resolved build environment as JSON
    Dump(DumpArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Build options passed as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Paths to classify, relative to the project root
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct VsprojArgs {
    /// Build options passed as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct ToolchainArgs {}

#[derive(Args)]
pub struct DumpArgs {
    /// Build options passed as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Write to this file instead of the default dump location
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

//! Command implementations

pub mod classify;
pub mod completions;
pub mod configure;
pub mod dump;
pub mod toolchain;
pub mod vsproj;

use anyhow::{Context, Result};
use extbuild::core::BuildOptions;

/// Parse positional `KEY=VALUE` arguments.
pub fn parse_options(args: &[String]) -> Result<BuildOptions> {
    BuildOptions::parse(args).context("invalid build option")
}

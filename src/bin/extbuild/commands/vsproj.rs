//! `extbuild vsproj` command

use anyhow::Result;

use super::parse_options;
use crate::cli::VsprojArgs;
use extbuild::ops::{generate_vs_project, BuildEnvironment};
use extbuild::util::GlobalContext;

pub fn execute(args: VsprojArgs, ctx: &GlobalContext) -> Result<()> {
    let options = parse_options(&args.options)?;
    let config = ctx.load_config();

    let mut env = BuildEnvironment::resolve(ctx, &config, options)?;
    env.discover_sources()?;

    if let Some(project) = generate_vs_project(ctx, &config, &mut env)? {
        eprintln!("    Generated {}", project.project.display());
        eprintln!("    Generated {}", project.solution.display());
    }

    Ok(())
}

//! `extbuild dump` command

use anyhow::Result;

use super::parse_options;
use crate::cli::DumpArgs;
use extbuild::ops::{dump, BuildEnvironment};
use extbuild::util::GlobalContext;

pub fn execute(args: DumpArgs, ctx: &GlobalContext) -> Result<()> {
    let options = parse_options(&args.options)?;
    let config = ctx.load_config();

    let mut env = BuildEnvironment::resolve(ctx, &config, options)?;
    env.discover_sources()?;

    let path = args.output.unwrap_or_else(|| ctx.env_dump_path());
    dump(&env, &path)?;
    eprintln!("        Wrote {}", path.display());

    Ok(())
}

//! Implementation of `extbuild configure`.
//!
//! Runs the configuration phase in order: source discovery, single
//! compilation unit aggregation, class reference embedding, optional IDE
//! project generation, and finally the environment dump.

use std::path::PathBuf;

use anyhow::Result;

use super::dump::dump;
use super::environment::BuildEnvironment;
use super::vsproj::generate_vs_project;
use crate::builder::docs::generate_doc_data;
use crate::builder::scu::ScuAggregator;
use crate::builder::vsproj::EmittedProject;
use crate::core::options::BuildOptions;
use crate::util::config::Config;
use crate::util::GlobalContext;

/// What a configure run produced.
#[derive(Debug, Clone)]
pub struct ConfigureResult {
    pub env: BuildEnvironment,
    /// Generated single compilation unit, if aggregation ran
    pub scu: Option<PathBuf>,
    /// Generated class reference source, if any
    pub doc_data: Option<PathBuf>,
    pub project: Option<EmittedProject>,
    pub env_dump: PathBuf,
}

/// Run the configuration phase.
pub fn configure(
    ctx: &GlobalContext,
    config: &Config,
    options: BuildOptions,
) -> Result<ConfigureResult> {
    let mut env = BuildEnvironment::resolve(ctx, config, options)?;
    env.discover_sources()?;

    let scu = ScuAggregator::new(&env.root, env.scu_build).aggregate(&mut env.sources, &mut env.scu)?;
    let doc_data = generate_doc_data(&env.root, &env.target, &mut env.sources)?;

    let project = if env.vsproj {
        generate_vs_project(ctx, config, &mut env)?
    } else {
        None
    };

    let env_dump = ctx.env_dump_path();
    dump(&env, &env_dump)?;

    Ok(ConfigureResult {
        env,
        scu,
        doc_data,
        project,
        env_dump,
    })
}

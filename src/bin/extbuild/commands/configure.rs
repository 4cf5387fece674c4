//! `extbuild configure` command

use anyhow::Result;
use serde_json::json;

use super::parse_options;
use crate::cli::ConfigureArgs;
use extbuild::ops::{configure, to_pretty_json};
use extbuild::util::GlobalContext;

pub fn execute(args: ConfigureArgs, ctx: &GlobalContext) -> Result<()> {
    let options = parse_options(&args.options)?;
    let config = ctx.load_config();

    let result = configure(ctx, &config, options)?;

    if args.json {
        let report = json!({
            "scu": result.scu,
            "doc_data": result.doc_data,
            "project": result.project.as_ref().map(|p| &p.project),
            "solution": result.project.as_ref().map(|p| &p.solution),
            "env_dump": result.env_dump,
            "sources": result.env.sources,
        });
        print!("{}", to_pretty_json(&report)?);
        return Ok(());
    }

    if let Some(ref scu) = result.scu {
        eprintln!("   Aggregated {}", scu.display());
    }
    if let Some(ref doc) = result.doc_data {
        eprintln!("     Embedded {}", doc.display());
    }
    if let Some(ref project) = result.project {
        eprintln!("    Generated {}", project.project.display());
        eprintln!("    Generated {}", project.solution.display());
    }
    eprintln!(
        "   Configured {} ({} sources, target {})",
        ctx.project_name(&config),
        result.env.sources.len(),
        result.env.target
    );
    eprintln!("        Wrote {}", result.env_dump.display());

    for source in &result.env.sources {
        println!("{}", source.display());
    }

    Ok(())
}

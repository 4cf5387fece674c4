//! `extbuild toolchain` command

use anyhow::Result;

use crate::cli::ToolchainArgs;
use extbuild::builder::command::toolchain_init;
use extbuild::builder::find_visual_c_batch_file;
use extbuild::util::diagnostic::{self, suggestions, Diagnostic};
use extbuild::util::GlobalContext;

pub fn execute(_args: ToolchainArgs, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.load_config();

    println!("Toolchain:");
    println!();

    let Some(batch_file) = find_visual_c_batch_file(&config.toolchain) else {
        println!("  vcvarsall: not found");
        diagnostic::emit(
            &Diagnostic::warning("Could not locate Visual Studio batch file")
                .with_suggestion(suggestions::NO_BATCH_FILE)
                .with_suggestion(suggestions::DEVELOPER_PROMPT),
            ctx.color(),
        );
        return Ok(());
    };

    println!("  vcvarsall: {}", batch_file.display());
    println!();

    println!("Initialization:");
    for platform in config.platforms() {
        println!("  {:<8} {}", platform.name, toolchain_init(&batch_file, &platform.name));
    }

    println!();
    println!("Environment:");
    for var in ["VCINSTALLDIR", "VS140COMNTOOLS"] {
        if let Ok(value) = std::env::var(var) {
            println!("  {}={}", var, value);
        }
    }

    Ok(())
}

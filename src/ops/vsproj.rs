//! Implementation of IDE project generation.

use anyhow::{bail, Result};

use super::environment::BuildEnvironment;
use crate::builder::classify::PathClassifier;
use crate::builder::command::CommandComposer;
use crate::builder::hint::{generate_cpp_hint_file, CPP_HINT_FILE};
use crate::builder::toolchain::find_visual_c_batch_file;
use crate::builder::vsproj::{EmittedProject, ProjectEmitter};
use crate::core::source::SourceInput;
use crate::core::variant::{VariantError, VariantMatrix, VariantMatrixBuilder};
use crate::util::config::Config;
use crate::util::diagnostic::{self, suggestions, Diagnostic};
use crate::util::fs::find_files_with_extension;
use crate::util::GlobalContext;

/// Message printed when no toolchain script is available.
pub const NO_BATCH_FILE_MESSAGE: &str =
    "Could not locate Visual Studio batch file to set up the build environment. Not generating VS project.";

/// Build the variant matrix from config and the resolved environment.
pub fn build_matrix(config: &Config, env: &BuildEnvironment) -> Result<VariantMatrix, VariantError> {
    let mut builder = VariantMatrixBuilder::new(config.configurations(), config.platforms())?
        .runfile(env.runfile.clone())
        .include_paths(env.include_paths.clone())
        .defines(env.defines.clone());
    for mode in &config.vsproj.modes {
        builder.add_mode(mode.clone())?;
    }
    Ok(builder.build())
}

/// Generate the IDE project for `env`.
///
/// Returns `None` when the toolchain script cannot be found; that is
/// reported and is not an error.
pub fn generate_vs_project(
    ctx: &GlobalContext,
    config: &Config,
    env: &mut BuildEnvironment,
) -> Result<Option<EmittedProject>> {
    let Some(batch_file) = find_visual_c_batch_file(&config.toolchain) else {
        diagnostic::emit(
            &Diagnostic::note(NO_BATCH_FILE_MESSAGE)
                .with_suggestion(suggestions::NO_BATCH_FILE)
                .with_suggestion(suggestions::DEVELOPER_PROMPT),
            ctx.color(),
        );
        return Ok(None);
    };
    tracing::info!("found vs batch_file: {}", batch_file.display());

    generate_cpp_hint_file(&env.root.join(CPP_HINT_FILE), &config.hint_macros());

    let classifier = PathClassifier::new(&env.root);
    classifier.add_to_project(
        &mut env.project_files,
        env.discovered.iter().cloned().map(SourceInput::File),
    );
    for header in find_files_with_extension(&env.root, "h") {
        env.project_files.add_header(header);
    }

    let matrix = match build_matrix(config, env) {
        Ok(matrix) => matrix,
        Err(e) => {
            diagnostic::emit(&e.to_diagnostic(), ctx.color());
            bail!("invalid IDE project configuration: {}", e);
        }
    };

    let commands = CommandComposer::new(&batch_file, &matrix, &env.options)
        .with_build_tool(config.build_tool())
        .compose_all();

    let emitter = ProjectEmitter::new(&env.root, ctx.project_name(config));
    let emitted = emitter.emit(&matrix, &commands, &env.project_files)?;
    Ok(Some(emitted))
}

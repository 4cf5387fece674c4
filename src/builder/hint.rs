//! `cpp.hint` generation.
//!
//! The IDE's parser reads `cpp.hint` to understand macros that would
//! otherwise confuse IntelliSense, such as class-registration macros.

use std::path::{Path, PathBuf};

use crate::util::diagnostic::{self, Diagnostic};

/// Hint file name, at the project root.
pub const CPP_HINT_FILE: &str = "cpp.hint";

/// Outcome of [`generate_cpp_hint_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Written(PathBuf),
    /// An existing file was left untouched.
    Kept(PathBuf),
    /// Writing failed; a warning was printed.
    Failed(PathBuf),
}

/// Render hint macros as `#define` lines.
pub fn render_hints(macros: &[String]) -> String {
    macros.iter().map(|m| format!("#define {}\n", m)).collect()
}

/// Write `cpp.hint` unless it already exists.
///
/// An existing file may carry user customizations and is never overwritten.
/// Write failures are reported and do not abort the caller.
pub fn generate_cpp_hint_file(path: &Path, macros: &[String]) -> HintOutcome {
    if path.is_file() {
        tracing::debug!("keeping existing {}", path.display());
        return HintOutcome::Kept(path.to_path_buf());
    }

    match std::fs::write(path, render_hints(macros)) {
        Ok(()) => {
            tracing::debug!("wrote {}", path.display());
            HintOutcome::Written(path.to_path_buf())
        }
        Err(e) => {
            diagnostic::emit(
                &Diagnostic::warning("Could not write cpp.hint file.")
                    .with_location(path)
                    .with_context(e.to_string()),
                false,
            );
            HintOutcome::Failed(path.to_path_buf())
        }
    }
}

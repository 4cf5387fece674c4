//! High-level operations.
//!
//! This module contains the implementation of extbuild commands.

pub mod configure;
pub mod dump;
pub mod environment;
pub mod vsproj;

pub use configure::{configure, ConfigureResult};
pub use dump::{dump, to_pretty_json};
pub use environment::BuildEnvironment;
pub use vsproj::{build_matrix, generate_vs_project, NO_BATCH_FILE_MESSAGE};

//! Configuration-phase builders.
//!
//! Each submodule produces one artifact of the configuration phase:
//! classified project files, the aggregated compilation unit, the IDE
//! build commands and project files, and the embedded class reference.

pub mod classify;
pub mod command;
pub mod docs;
pub mod hint;
pub mod scu;
pub mod toolchain;
pub mod vsproj;

pub use classify::{ClassificationResult, PathClassifier, ProjectFiles};
pub use command::{Action, CommandComposer, CommandSet};
pub use scu::{ScuAggregator, ScuError, ScuState};
pub use toolchain::{find_visual_c_batch_file, BatchFileLocator};
pub use vsproj::{EmittedProject, ProjectEmitter, ProjectVariants};

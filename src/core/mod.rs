//! Core data types.

pub mod options;
pub mod source;
pub mod variant;

pub use options::{BuildOption, BuildOptions, OptionError};
pub use source::{SourceEntry, SourceInput};
pub use variant::{BuildMode, Platform, VariantCell, VariantError, VariantMatrix, VariantMatrixBuilder};

//! extbuild - configuration-phase helpers for native extension builds
//!
//! This crate provides the library side of extbuild: source
//! classification, single compilation unit aggregation, variant matrix
//! construction, IDE build command composition, and IDE project emission.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{CommandComposer, PathClassifier, ProjectEmitter, ScuAggregator};
pub use core::{BuildOptions, VariantMatrix, VariantMatrixBuilder};
pub use ops::BuildEnvironment;
pub use util::context::GlobalContext;

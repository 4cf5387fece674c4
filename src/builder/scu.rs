//! Single compilation unit (SCU) aggregation.
//!
//! All sources are compiled through one generated file that includes each of
//! them in order. Include order determines which file-local symbols are
//! visible to later sources, so it is never changed.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::util::fs::{to_slash, write_string};

/// Source root, relative to the project root.
pub const SCU_SOURCE_ROOT: &str = "src";

/// Generated compilation unit, relative to the project root.
pub const SCU_OUTPUT: &str = "src/gen/scu.cpp";

/// Error during SCU aggregation.
#[derive(Debug, Error)]
pub enum ScuError {
    #[error("source `{source_path}` is not under the source root `{root}`")]
    OutsideRoot { source_path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Write(#[from] anyhow::Error),
}

/// Folders converted to SCU during one configuration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScuState {
    folders: BTreeSet<PathBuf>,
}

impl ScuState {
    pub fn new() -> Self {
        ScuState::default()
    }

    /// Folders relative to the source root. The root itself is the empty path.
    pub fn folders(&self) -> impl Iterator<Item = &Path> {
        self.folders.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, folder: &Path) -> bool {
        self.folders.contains(folder)
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Writes the generated compilation unit and rewrites the source list.
#[derive(Debug, Clone)]
pub struct ScuAggregator {
    project_root: PathBuf,
    source_root: PathBuf,
    output: PathBuf,
    enabled: bool,
}

impl ScuAggregator {
    /// Aggregator using the standard `src` root and `src/gen/scu.cpp` output.
    pub fn new(project_root: impl Into<PathBuf>, enabled: bool) -> Self {
        ScuAggregator {
            project_root: project_root.into(),
            source_root: PathBuf::from(SCU_SOURCE_ROOT),
            output: PathBuf::from(SCU_OUTPUT),
            enabled,
        }
    }

    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Absolute path of the generated file.
    pub fn output_path(&self) -> PathBuf {
        self.project_root.join(&self.output)
    }

    /// Render the generated file for `sources`.
    ///
    /// One include line per source, in input order, each path relative to
    /// the source root and terminated by a newline.
    pub fn render(&self, sources: &[PathBuf]) -> Result<String, ScuError> {
        let root = self.absolute(&self.source_root);
        let mut contents = String::new();
        for source in sources {
            let rel = self.relative_to_root(&root, source)?;
            contents.push_str(&format!("#include \"{}\"\n", to_slash(&rel)));
        }
        Ok(contents)
    }

    /// Aggregate `sources` into the generated file.
    ///
    /// When disabled or when `sources` is empty this does nothing and
    /// returns `None`. Otherwise the file is overwritten, `sources` is
    /// replaced by the generated file's absolute path, and the folders of
    /// the aggregated sources are recorded in `state`.
    pub fn aggregate(
        &self,
        sources: &mut Vec<PathBuf>,
        state: &mut ScuState,
    ) -> Result<Option<PathBuf>, ScuError> {
        if !self.enabled {
            return Ok(None);
        }
        if sources.is_empty() {
            tracing::debug!("no sources to aggregate, skipping SCU generation");
            return Ok(None);
        }

        let contents = self.render(sources)?;

        let root = self.absolute(&self.source_root);
        for source in sources.iter() {
            let rel = self.relative_to_root(&root, source)?;
            let folder = rel.parent().map(Path::to_path_buf).unwrap_or_default();
            state.folders.insert(folder);
        }

        let output = self.output_path();
        write_string(&output, &contents)?;
        tracing::info!(
            "aggregated {} sources into {}",
            sources.len(),
            output.display()
        );

        *sources = vec![output.clone()];
        Ok(Some(output))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    fn relative_to_root(&self, root: &Path, source: &Path) -> Result<PathBuf, ScuError> {
        // `src/../other/x.cpp` has `src` as a prefix but lives outside it.
        let source_abs = normalize(&self.absolute(source));
        match source_abs.strip_prefix(normalize(root)) {
            Ok(rel) => Ok(rel.to_path_buf()),
            Err(_) => Err(ScuError::OutsideRoot {
                source_path: source.to_path_buf(),
                root: self.source_root.clone(),
            }),
        }
    }
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

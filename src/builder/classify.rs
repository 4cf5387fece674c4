//! Header/implementation classification for IDE project listings.
//!
//! Classification is best-effort: a path with no matching files on disk is
//! simply not recorded, and nothing here returns an error.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::source::{SourceEntry, SourceInput};
use crate::util::fs::glob_relative;

/// Header extensions, in lookup order.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp"];

/// Implementation extensions, in lookup order.
pub const IMPLEMENTATION_EXTENSIONS: &[&str] = &["c", "cpp"];

/// Matching files found for one entry. At most one of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub header: Option<PathBuf>,
    pub implementation: Option<PathBuf>,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.implementation.is_none()
    }
}

/// Headers and sources listed in the IDE project.
///
/// Insertion order is kept and repeated paths are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFiles {
    headers: Vec<PathBuf>,
    sources: Vec<PathBuf>,
}

impl ProjectFiles {
    pub fn new() -> Self {
        ProjectFiles::default()
    }

    pub fn add_header(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.headers.contains(&path) {
            self.headers.push(path);
        }
    }

    pub fn add_source(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.sources.contains(&path) {
            self.sources.push(path);
        }
    }

    /// Record a classification result.
    pub fn record(&mut self, result: ClassificationResult) {
        if let Some(header) = result.header {
            self.add_header(header);
        }
        if let Some(implementation) = result.implementation {
            self.add_source(implementation);
        }
    }

    pub fn headers(&self) -> &[PathBuf] {
        &self.headers
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

/// Searches the filesystem for headers and implementations next to a path.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    root: PathBuf,
}

impl PathClassifier {
    /// Relative paths are looked up against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PathClassifier { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the first existing `{base}.h`/`{base}.hpp` and `{base}.c`/`{base}.cpp`.
    pub fn classify(&self, entry: &SourceEntry) -> ClassificationResult {
        let base = entry.base_name();
        ClassificationResult {
            header: self.find_with(&base, HEADER_EXTENSIONS),
            implementation: self.find_with(&base, IMPLEMENTATION_EXTENSIONS),
        }
    }

    fn find_with(&self, base: &str, extensions: &[&str]) -> Option<PathBuf> {
        extensions
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", base, ext)))
            .find(|candidate| self.root.join(candidate).is_file())
    }

    /// Classify a collection of inputs into `files`.
    ///
    /// Directories are expanded into their nested entries plus their own
    /// headers and implementations, and lists are flattened. Expanded
    /// entries are processed after the inputs already queued.
    pub fn add_to_project<I>(&self, files: &mut ProjectFiles, inputs: I)
    where
        I: IntoIterator<Item = SourceInput>,
    {
        let mut queue: VecDeque<SourceInput> = inputs.into_iter().collect();
        let mut visited_dirs: HashSet<PathBuf> = HashSet::new();

        while let Some(input) = queue.pop_front() {
            let path = match input {
                SourceInput::Dir(dir) => {
                    let key = self.root.join(&dir).canonicalize().unwrap_or_else(|_| dir.clone());
                    if visited_dirs.insert(key) {
                        queue.extend(self.expand_dir(&dir));
                    }
                    continue;
                }
                SourceInput::List(items) => {
                    queue.extend(items);
                    continue;
                }
                SourceInput::File(path) => path,
                SourceInput::Literal(s) => PathBuf::from(s),
            };

            tracing::debug!("classifying {}", path.display());
            files.record(self.classify(&SourceEntry::new(path)));
        }
    }

    fn expand_dir(&self, dir: &Path) -> Vec<SourceInput> {
        let mut expanded = Vec::new();
        for pattern in ["*/*", "*.h", "*.?pp"] {
            let pattern = dir.join(pattern);
            match glob_relative(&self.root, &pattern.to_string_lossy()) {
                Ok(paths) => {
                    expanded.extend(paths.into_iter().map(|p| SourceInput::detect(&self.root, p)))
                }
                Err(e) => tracing::debug!("skipping {}: {:#}", dir.display(), e),
            }
        }
        expanded
    }
}

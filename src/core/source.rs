//! Source artifacts as seen by the configuration phase.

use std::path::{Path, PathBuf};

/// A path to a source artifact (header, implementation, or anything the
/// caller hands over for IDE display).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceEntry {
    path: PathBuf,
}

impl SourceEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SourceEntry { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path with everything from the first `.` of its file name removed.
    ///
    /// `src/foo.gen.cpp` becomes `src/foo`. Dots in directory names are left
    /// alone, so `./src/foo.cpp` becomes `./src/foo`. Doubled backslashes are
    /// collapsed into forward slashes.
    pub fn base_name(&self) -> String {
        let raw = self.path.to_string_lossy().replace("\\\\", "/");
        let name_start = raw.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
        match raw[name_start..].find('.') {
            Some(dot) => raw[..name_start + dot].to_string(),
            None => raw,
        }
    }
}

impl From<&str> for SourceEntry {
    fn from(s: &str) -> Self {
        SourceEntry::new(s)
    }
}

impl From<PathBuf> for SourceEntry {
    fn from(p: PathBuf) -> Self {
        SourceEntry::new(p)
    }
}

/// Input accepted by the path classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    /// A single file node.
    File(PathBuf),
    /// A directory to expand one level deep.
    Dir(PathBuf),
    /// A literal path string, resolved against the project root.
    Literal(String),
    /// A nested list, flattened into the working collection.
    List(Vec<SourceInput>),
}

impl SourceInput {
    /// Pick `File` or `Dir` by looking at the filesystem, falling back to
    /// `Literal` when the path does not exist.
    pub fn detect(root: &Path, path: impl AsRef<Path>) -> SourceInput {
        let path = path.as_ref();
        let resolved = root.join(path);
        if resolved.is_dir() {
            SourceInput::Dir(path.to_path_buf())
        } else if resolved.is_file() {
            SourceInput::File(path.to_path_buf())
        } else {
            SourceInput::Literal(path.to_string_lossy().into_owned())
        }
    }
}

impl From<PathBuf> for SourceInput {
    fn from(p: PathBuf) -> Self {
        SourceInput::File(p)
    }
}

impl From<&str> for SourceInput {
    fn from(s: &str) -> Self {
        SourceInput::Literal(s.to_string())
    }
}

impl From<Vec<SourceInput>> for SourceInput {
    fn from(v: Vec<SourceInput>) -> Self {
        SourceInput::List(v)
    }
}

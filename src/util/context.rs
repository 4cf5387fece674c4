//! Global context for extbuild operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::{global_config_path, load_config, project_config_path, Config};

/// File the environment dump is written to, relative to the working directory.
pub const ENV_DUMP_FILE: &str = ".extbuild_env.json";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Project root (defaults to cwd)
    root: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            root: cwd.clone(),
            cwd,
            verbose: false,
            color: std::io::stderr().is_terminal(),
        })
    }

    /// Create a GlobalContext for a specific project root.
    ///
    /// Relative roots are resolved against the current directory.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let mut ctx = Self::new()?;
        let root = ctx.cwd.join(root.as_ref());
        ctx.root = root
            .canonicalize()
            .with_context(|| format!("project directory not found: {}", root.display()))?;
        Ok(ctx)
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Override the working directory the environment dump goes to.
    pub fn set_cwd(&mut self, cwd: impl Into<PathBuf>) {
        self.cwd = cwd.into();
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the project-local extbuild directory.
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(".extbuild")
    }

    /// Get the project configuration file path.
    pub fn config_path(&self) -> PathBuf {
        project_config_path(&self.root)
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        let global = global_config_path();
        load_config(global.as_deref(), &self.config_path())
    }

    /// Path of the environment dump in the working directory.
    pub fn env_dump_path(&self) -> PathBuf {
        self.cwd.join(ENV_DUMP_FILE)
    }

    /// Project name: configured name, or the root directory's name.
    pub fn project_name(&self, config: &Config) -> String {
        config.project.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert_eq!(ctx.root(), ctx.cwd());
        assert_eq!(ctx.env_dump_path(), ctx.cwd().join(".extbuild_env.json"));
    }

    #[test]
    fn test_with_root() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_root(tmp.path()).unwrap();
        assert_eq!(ctx.root(), tmp.path().canonicalize().unwrap());
        assert_eq!(
            ctx.config_path(),
            ctx.root().join(".extbuild").join("config.toml")
        );
    }

    #[test]
    fn test_with_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(GlobalContext::with_root(tmp.path().join("missing")).is_err());
    }

    #[test]
    fn test_project_name_falls_back_to_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("my_extension")).unwrap();
        let ctx = GlobalContext::with_root(tmp.path().join("my_extension")).unwrap();

        let mut config = Config::default();
        assert_eq!(ctx.project_name(&config), "my_extension");

        config.project.name = Some("kafka".to_string());
        assert_eq!(ctx.project_name(&config), "kafka");
    }
}

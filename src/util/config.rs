//! Configuration file support for extbuild.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.extbuild/config.toml` - User-wide defaults
//! - Project: `.extbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::variant::{BuildMode, Platform, DEFAULT_CONFIGURATIONS};

/// Default host build tool invoked by generated IDE commands.
pub const DEFAULT_BUILD_TOOL: &str = "scons";

/// Default build target when neither config nor command line sets one.
pub const DEFAULT_TARGET: &str = "template_debug";

/// extbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project settings
    pub project: ProjectConfig,

    /// Build settings
    pub build: BuildConfig,

    /// IDE project settings
    pub vsproj: VsprojConfig,

    /// Toolchain settings
    pub toolchain: ToolchainConfig,
}

/// Project-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name, used for the IDE project and solution files
    pub name: Option<String>,

    /// Executable the IDE launches for every variant
    pub runfile: Option<String>,

    /// Host build tool used by generated commands (defaults to `scons`)
    pub build_tool: Option<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default build target (editor, template_debug, template_release)
    pub target: Option<String>,

    /// Aggregate all sources into a single compilation unit
    pub scu_build: Option<bool>,

    /// Baseline include directories
    pub include_paths: Vec<String>,

    /// Baseline preprocessor defines
    pub defines: Vec<String>,
}

/// IDE project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VsprojConfig {
    /// Build configurations (defaults to editor, template_release, template_debug)
    pub configurations: Option<Vec<String>>,

    /// IDE platforms (defaults to Win32 and x64)
    pub platforms: Option<Vec<Platform>>,

    /// Additional named build modes, in IDE order
    pub modes: Vec<BuildMode>,

    /// Macros written to `cpp.hint`
    pub hint_macros: Option<Vec<String>>,
}

/// Toolchain configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Explicit path to the toolchain initialization script (vcvarsall.bat)
    pub vcvars: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Project settings
        if other.project.name.is_some() {
            self.project.name = other.project.name;
        }
        if other.project.runfile.is_some() {
            self.project.runfile = other.project.runfile;
        }
        if other.project.build_tool.is_some() {
            self.project.build_tool = other.project.build_tool;
        }

        // Build settings
        if other.build.target.is_some() {
            self.build.target = other.build.target;
        }
        if other.build.scu_build.is_some() {
            self.build.scu_build = other.build.scu_build;
        }
        if !other.build.include_paths.is_empty() {
            self.build.include_paths = other.build.include_paths;
        }
        if !other.build.defines.is_empty() {
            self.build.defines = other.build.defines;
        }

        // IDE project settings
        if other.vsproj.configurations.is_some() {
            self.vsproj.configurations = other.vsproj.configurations;
        }
        if other.vsproj.platforms.is_some() {
            self.vsproj.platforms = other.vsproj.platforms;
        }
        if !other.vsproj.modes.is_empty() {
            self.vsproj.modes = other.vsproj.modes;
        }
        if other.vsproj.hint_macros.is_some() {
            self.vsproj.hint_macros = other.vsproj.hint_macros;
        }

        // Toolchain settings
        if other.toolchain.vcvars.is_some() {
            self.toolchain.vcvars = other.toolchain.vcvars;
        }
    }

    /// Host build tool for generated commands.
    pub fn build_tool(&self) -> &str {
        self.project.build_tool.as_deref().unwrap_or(DEFAULT_BUILD_TOOL)
    }

    /// Configured build configurations, or the defaults.
    pub fn configurations(&self) -> Vec<String> {
        self.vsproj.configurations.clone().unwrap_or_else(|| {
            DEFAULT_CONFIGURATIONS.iter().map(|s| s.to_string()).collect()
        })
    }

    /// Configured IDE platforms, or the defaults.
    pub fn platforms(&self) -> Vec<Platform> {
        self.vsproj.platforms.clone().unwrap_or_else(Platform::defaults)
    }

    /// Macros for `cpp.hint`.
    pub fn hint_macros(&self) -> Vec<String> {
        self.vsproj
            .hint_macros
            .clone()
            .unwrap_or_else(|| vec!["GDCLASS(m_class, m_inherits)".to_string()])
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.extbuild/config.toml)
/// 2. Global config (~/.extbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.extbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".extbuild"))
}

/// Get the global config path (~/.extbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.extbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".extbuild").join("config.toml")
}

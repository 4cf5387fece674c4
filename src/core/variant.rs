//! Variant matrix for IDE project generation.
//!
//! The IDE sees one selectable configuration per
//! (build configuration, platform, mode) triple. Modes are registered in
//! order after an implicit default mode, and each mode contributes one cell
//! for every configuration/platform pair.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Default build configurations exposed to the IDE.
pub const DEFAULT_CONFIGURATIONS: &[&str] = &["editor", "template_release", "template_debug"];

/// An IDE platform and the identifier the build tool uses for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Name used by the IDE (`Win32`, `x64`)
    pub name: String,
    /// Architecture identifier used by the build tool (`x86_32`, `x86_64`)
    pub id: String,
}

impl Platform {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Platform {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The platforms the IDE needs to recognize an NMake project.
    pub fn defaults() -> Vec<Platform> {
        vec![Platform::new("Win32", "x86_32"), Platform::new("x64", "x86_64")]
    }
}

/// A named build mode, e.g. a `tools` mode that adds extra defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildMode {
    /// Display name; empty for the default mode
    pub name: String,
    /// Extra include directory
    pub includes: String,
    /// Extra preprocessor defines
    pub defines: Vec<String>,
    /// Extra command-line arguments appended to the build commands
    pub cli_args: String,
}

impl BuildMode {
    pub fn named(name: impl Into<String>) -> Self {
        BuildMode {
            name: name.into(),
            ..BuildMode::default()
        }
    }

    pub fn with_includes(mut self, includes: impl Into<String>) -> Self {
        self.includes = includes.into();
        self
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    pub fn with_cli_args(mut self, args: impl Into<String>) -> Self {
        self.cli_args = args.into();
        self
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

/// One concrete (configuration, platform, mode) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantCell {
    pub configuration: String,
    pub platform: Platform,
    pub mode: String,
    /// `editor_[tools]|x64` or `editor|x64`
    pub label: String,
    /// Artifact launched by the IDE; identical for every cell
    pub runfile: String,
    pub include_paths: Vec<String>,
    pub defines: Vec<String>,
    pub cmd_args: String,
}

impl VariantCell {
    /// The configuration half of the label (`editor_[tools]`).
    pub fn configuration_name(&self) -> &str {
        self.label
            .split_once('|')
            .map(|(c, _)| c)
            .unwrap_or(&self.label)
    }
}

/// Compose the IDE label for a cell.
pub fn variant_label(configuration: &str, mode: &str, platform: &str) -> String {
    if mode.is_empty() {
        format!("{}|{}", configuration, platform)
    } else {
        format!("{}_[{}]|{}", configuration, mode, platform)
    }
}

/// Invalid matrix input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VariantError {
    #[error("at least one build configuration is required")]
    NoConfigurations,

    #[error("at least one platform is required")]
    NoPlatforms,

    #[error("build configuration `{0}` is listed more than once")]
    DuplicateConfiguration(String),

    #[error("platform `{0}` is listed more than once")]
    DuplicatePlatform(String),

    #[error("build mode name must not be empty")]
    EmptyModeName,

    #[error("build mode `{0}` is already registered")]
    DuplicateMode(String),

    #[error("build mode `{name}` contains reserved character `{ch}`")]
    ReservedCharacter { name: String, ch: char },

    #[error("build mode `{name}` is a substring of configuration `{configuration}`")]
    AmbiguousMode { name: String, configuration: String },

    #[error("build mode `{name}` overlaps registered mode `{existing}`")]
    OverlappingModes { name: String, existing: String },
}

impl VariantError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            VariantError::DuplicateMode(name) => diag
                .with_context(format!(
                    "two modes named `{}` would produce identical IDE configurations",
                    name
                ))
                .with_suggestion("Rename one of the `[[vsproj.modes]]` entries"),
            VariantError::AmbiguousMode {
                name,
                configuration,
            } => diag
                .with_context(format!(
                    "stripping `{}` from the active configuration would corrupt `{}`",
                    name, configuration
                ))
                .with_suggestion("Pick a mode name that does not appear in any configuration name"),
            VariantError::OverlappingModes { name, existing } => diag
                .with_context(format!(
                    "stripping `{}` and `{}` from the active configuration would leave a fragment behind",
                    name, existing
                ))
                .with_suggestion("Pick mode names that do not contain one another"),
            VariantError::NoConfigurations | VariantError::NoPlatforms => {
                diag.with_suggestion("Remove the empty list from `[vsproj]` to use the defaults")
            }
            _ => diag,
        }
    }
}

/// Builds the cross product of configurations, platforms and modes.
#[derive(Debug, Clone)]
pub struct VariantMatrixBuilder {
    configurations: Vec<String>,
    platforms: Vec<Platform>,
    runfile: String,
    include_paths: Vec<String>,
    defines: Vec<String>,
    modes: Vec<BuildMode>,
}

impl VariantMatrixBuilder {
    /// Start a matrix with the implicit default mode registered.
    pub fn new(
        configurations: Vec<String>,
        platforms: Vec<Platform>,
    ) -> Result<Self, VariantError> {
        if configurations.is_empty() {
            return Err(VariantError::NoConfigurations);
        }
        if platforms.is_empty() {
            return Err(VariantError::NoPlatforms);
        }
        for (i, config) in configurations.iter().enumerate() {
            if configurations[..i].contains(config) {
                return Err(VariantError::DuplicateConfiguration(config.clone()));
            }
        }
        for (i, platform) in platforms.iter().enumerate() {
            if platforms[..i].iter().any(|p| p.name == platform.name) {
                return Err(VariantError::DuplicatePlatform(platform.name.clone()));
            }
        }

        Ok(VariantMatrixBuilder {
            configurations,
            platforms,
            runfile: String::new(),
            include_paths: Vec::new(),
            defines: Vec::new(),
            modes: vec![BuildMode::default()],
        })
    }

    /// Artifact every cell launches.
    pub fn runfile(mut self, runfile: impl Into<String>) -> Self {
        self.runfile = runfile.into();
        self
    }

    /// Baseline include directories shared by every cell.
    pub fn include_paths(mut self, paths: Vec<String>) -> Self {
        self.include_paths = paths;
        self
    }

    /// Baseline defines shared by every cell.
    pub fn defines(mut self, defines: Vec<String>) -> Self {
        self.defines = defines;
        self
    }

    /// Register a named mode after the ones already registered.
    pub fn add_mode(&mut self, mode: BuildMode) -> Result<&mut Self, VariantError> {
        if mode.name.is_empty() {
            return Err(VariantError::EmptyModeName);
        }
        if let Some(ch) = mode.name.chars().find(|c| matches!(c, '|' | '[' | ']' | '"')) {
            return Err(VariantError::ReservedCharacter {
                name: mode.name.clone(),
                ch,
            });
        }
        if self.modes.iter().any(|m| m.name == mode.name) {
            return Err(VariantError::DuplicateMode(mode.name.clone()));
        }
        if let Some(existing) = self
            .modes
            .iter()
            .filter(|m| !m.is_default())
            .find(|m| m.name.contains(&mode.name) || mode.name.contains(&m.name))
        {
            return Err(VariantError::OverlappingModes {
                name: mode.name.clone(),
                existing: existing.name.clone(),
            });
        }
        if let Some(config) = self.configurations.iter().find(|c| c.contains(&mode.name)) {
            return Err(VariantError::AmbiguousMode {
                name: mode.name.clone(),
                configuration: config.clone(),
            });
        }

        tracing::debug!("registered build mode `{}`", mode.name);
        self.modes.push(mode);
        Ok(self)
    }

    /// Produce the matrix: modes in registration order, then configurations,
    /// then platforms.
    pub fn build(&self) -> VariantMatrix {
        let mut cells =
            Vec::with_capacity(self.modes.len() * self.configurations.len() * self.platforms.len());

        for mode in &self.modes {
            let mut include_paths = self.include_paths.clone();
            if !mode.includes.is_empty() {
                include_paths.push(mode.includes.clone());
            }
            let mut defines = self.defines.clone();
            defines.extend(mode.defines.iter().cloned());

            for config in &self.configurations {
                for platform in &self.platforms {
                    cells.push(VariantCell {
                        configuration: config.clone(),
                        platform: platform.clone(),
                        mode: mode.name.clone(),
                        label: variant_label(config, &mode.name, &platform.name),
                        runfile: self.runfile.clone(),
                        include_paths: include_paths.clone(),
                        defines: defines.clone(),
                        cmd_args: mode.cli_args.clone(),
                    });
                }
            }
        }

        VariantMatrix {
            cells,
            mode_names: self
                .modes
                .iter()
                .filter(|m| !m.is_default())
                .map(|m| m.name.clone())
                .collect(),
        }
    }
}

/// The full, ordered set of variant cells.
#[derive(Debug, Clone, Serialize)]
pub struct VariantMatrix {
    cells: Vec<VariantCell>,
    mode_names: Vec<String>,
}

impl VariantMatrix {
    pub fn cells(&self) -> &[VariantCell] {
        &self.cells
    }

    /// Names of the explicitly registered modes, in registration order.
    pub fn mode_names(&self) -> &[String] {
        &self.mode_names
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Distinct configuration labels (`editor_[tools]`) in cell order.
    pub fn configuration_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for cell in &self.cells {
            let name = cell.configuration_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

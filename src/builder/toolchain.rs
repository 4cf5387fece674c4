//! Toolchain initialization script discovery.
//!
//! The IDE commands call the MSVC `vcvarsall.bat` script to set up the
//! compiler environment before invoking the build tool. Finding it is
//! best-effort: when nothing is found the caller skips project generation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util::config::ToolchainConfig;

/// Script name.
pub const VCVARSALL: &str = "vcvarsall.bat";

/// VC tools component required from the installation.
const VC_TOOLS_COMPONENT: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

/// Locates `vcvarsall.bat`.
///
/// Search order:
/// 1. Explicit path from `[toolchain] vcvars`
/// 2. `VCINSTALLDIR` (set inside a developer prompt)
/// 3. `vswhere.exe -latest`
/// 4. `VS140COMNTOOLS` (Visual Studio 2015 layout)
#[derive(Debug, Clone, Default)]
pub struct BatchFileLocator {
    override_path: Option<PathBuf>,
    vc_install_dir: Option<PathBuf>,
    vs140_comntools: Option<PathBuf>,
    program_files_x86: Option<PathBuf>,
    use_vswhere: bool,
}

impl BatchFileLocator {
    /// Locator reading the process environment.
    pub fn from_env(config: &ToolchainConfig) -> Self {
        BatchFileLocator {
            override_path: config.vcvars.clone(),
            vc_install_dir: std::env::var_os("VCINSTALLDIR").map(PathBuf::from),
            vs140_comntools: std::env::var_os("VS140COMNTOOLS").map(PathBuf::from),
            program_files_x86: Some(
                std::env::var_os("ProgramFiles(x86)")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)")),
            ),
            use_vswhere: true,
        }
    }

    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_vc_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vc_install_dir = Some(dir.into());
        self
    }

    pub fn with_vs140_comntools(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vs140_comntools = Some(dir.into());
        self
    }

    pub fn without_vswhere(mut self) -> Self {
        self.use_vswhere = false;
        self
    }

    /// Find the script, first match wins.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.override_path {
            if path.is_file() {
                tracing::debug!("using configured toolchain script: {}", path.display());
                return Some(path.clone());
            }
            tracing::warn!("Configured vcvars script not found: {}", path.display());
        }

        if let Some(found) = self.vc_install_dir.as_deref().and_then(vcvarsall_in_vc_dir) {
            tracing::debug!("found toolchain script via VCINSTALLDIR: {}", found.display());
            return Some(found);
        }

        if self.use_vswhere {
            if let Some(found) = self.locate_with_vswhere() {
                return Some(found);
            }
        }

        if let Some(tools) = self.vs140_comntools.as_deref() {
            // VS140COMNTOOLS points at <install>\Common7\Tools\
            let install = tools.ancestors().nth(2)?;
            if let Some(found) = vcvarsall_in_vc_dir(&install.join("VC")) {
                tracing::debug!("found toolchain script via VS140COMNTOOLS: {}", found.display());
                return Some(found);
            }
        }

        None
    }

    fn locate_with_vswhere(&self) -> Option<PathBuf> {
        let vswhere = find_vswhere(self.program_files_x86.as_deref())?;
        tracing::debug!("Found vswhere at: {}", vswhere.display());

        let output = Command::new(&vswhere)
            .args([
                "-latest",
                "-products",
                "*",
                "-requires",
                VC_TOOLS_COMPONENT,
                "-property",
                "installationPath",
                "-format",
                "value",
            ])
            .output();

        let install = match output {
            Ok(out) if out.status.success() => {
                let path = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if path.is_empty() {
                    tracing::debug!("vswhere returned empty path");
                    return None;
                }
                PathBuf::from(path)
            }
            Ok(out) => {
                tracing::debug!("vswhere failed: {}", String::from_utf8_lossy(&out.stderr));
                return None;
            }
            Err(e) => {
                tracing::debug!("Failed to run vswhere: {}", e);
                return None;
            }
        };

        tracing::debug!("Found Visual Studio at: {}", install.display());
        vcvarsall_in_vc_dir(&install.join("VC"))
    }
}

/// Find the toolchain initialization script for this environment.
pub fn find_visual_c_batch_file(config: &ToolchainConfig) -> Option<PathBuf> {
    BatchFileLocator::from_env(config).locate()
}

/// `vcvarsall.bat` inside a `VC` directory, current layout first.
pub fn vcvarsall_in_vc_dir(vc_dir: &Path) -> Option<PathBuf> {
    [
        vc_dir.join("Auxiliary").join("Build").join(VCVARSALL),
        vc_dir.join(VCVARSALL),
    ]
    .into_iter()
    .find(|p| p.is_file())
}

/// Find vswhere.exe in the installer directory or on PATH.
fn find_vswhere(program_files_x86: Option<&Path>) -> Option<PathBuf> {
    if let Some(program_files_x86) = program_files_x86 {
        let standard_path = program_files_x86
            .join("Microsoft Visual Studio")
            .join("Installer")
            .join("vswhere.exe");
        if standard_path.is_file() {
            return Some(standard_path);
        }
    }

    which::which("vswhere").ok()
}

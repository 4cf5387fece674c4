//! Resolved build environment for one configuration run.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::builder::classify::ProjectFiles;
use crate::builder::scu::ScuState;
use crate::core::options::BuildOptions;
use crate::util::config::{Config, DEFAULT_TARGET};
use crate::util::fs::{glob_files, has_component};
use crate::util::GlobalContext;

/// Source discovery patterns, relative to the project root.
pub const SOURCE_PATTERNS: &[&str] = &["src/*.cpp", "src/**/*.cpp"];

/// Include directory added for discovered sources.
pub const SOURCE_INCLUDE_DIR: &str = "src/";

/// Runfile used when none is configured.
pub const DEFAULT_RUNFILE: &str = "godot";

/// Everything the configuration phase knows about the build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildEnvironment {
    pub root: PathBuf,
    pub target: String,
    pub platform: String,
    pub options: BuildOptions,
    pub include_paths: Vec<String>,
    pub defines: Vec<String>,
    pub scu_build: bool,
    pub vsproj: bool,
    pub runfile: String,
    /// Sources found on disk, before aggregation
    pub discovered: Vec<PathBuf>,
    /// Sources handed to the compiler
    pub sources: Vec<PathBuf>,
    pub scu: ScuState,
    pub project_files: ProjectFiles,
}

impl BuildEnvironment {
    /// Combine config and command-line options. Command-line options win.
    pub fn resolve(ctx: &GlobalContext, config: &Config, options: BuildOptions) -> Result<Self> {
        let target = options
            .get("target")
            .map(str::to_string)
            .or_else(|| config.build.target.clone())
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());
        let platform = options
            .get("platform")
            .map(str::to_string)
            .unwrap_or_else(host_platform);
        let scu_build = options
            .get_bool("scu_build")?
            .or(config.build.scu_build)
            .unwrap_or(false);
        let vsproj = options.get_bool("vsproj")?.unwrap_or(false);
        let runfile = config
            .project
            .runfile
            .clone()
            .unwrap_or_else(|| DEFAULT_RUNFILE.to_string());

        tracing::debug!(
            "resolved environment: target={}, platform={}, scu_build={}",
            target,
            platform,
            scu_build
        );

        Ok(BuildEnvironment {
            root: ctx.root().to_path_buf(),
            target,
            platform,
            options,
            include_paths: config.build.include_paths.clone(),
            defines: config.build.defines.clone(),
            scu_build,
            vsproj,
            runfile,
            discovered: Vec::new(),
            sources: Vec::new(),
            scu: ScuState::new(),
            project_files: ProjectFiles::new(),
        })
    }

    /// Discover `src/**/*.cpp` and add `src/` to the include paths.
    ///
    /// Anything under a `gen` directory is left out; generated files are
    /// added by the step that generates them.
    pub fn discover_sources(&mut self) -> Result<()> {
        if !self.include_paths.iter().any(|p| p == SOURCE_INCLUDE_DIR) {
            self.include_paths.push(SOURCE_INCLUDE_DIR.to_string());
        }

        let found: Vec<PathBuf> = glob_files(&self.root, SOURCE_PATTERNS)?
            .into_iter()
            .filter(|p| !has_component(p, "gen"))
            .collect();
        tracing::debug!("discovered {} sources", found.len());

        self.discovered = found.clone();
        self.sources = found;
        Ok(())
    }
}

/// Build tool platform name for the host (`windows`, `linux`, `macos`).
fn host_platform() -> String {
    std::env::consts::OS.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir) -> GlobalContext {
        GlobalContext::with_root(tmp.path()).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let tmp = TempDir::new().unwrap();
        let env = BuildEnvironment::resolve(&ctx(&tmp), &Config::default(), BuildOptions::new())
            .unwrap();
        assert_eq!(env.target, "template_debug");
        assert!(!env.scu_build);
        assert!(!env.vsproj);
        assert_eq!(env.runfile, "godot");
    }

    #[test]
    fn test_options_override_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.build.target = Some("template_release".to_string());
        config.build.scu_build = Some(true);

        let options = BuildOptions::parse(["target=editor", "scu_build=no", "vsproj=yes"]).unwrap();
        let env = BuildEnvironment::resolve(&ctx(&tmp), &config, options).unwrap();
        assert_eq!(env.target, "editor");
        assert!(!env.scu_build);
        assert!(env.vsproj);
    }

    #[test]
    fn test_scu_build_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.build.scu_build = Some(true);
        let env = BuildEnvironment::resolve(&ctx(&tmp), &config, BuildOptions::new()).unwrap();
        assert!(env.scu_build);

        config.build.scu_build = Some(false);
        let env = BuildEnvironment::resolve(&ctx(&tmp), &config, BuildOptions::new()).unwrap();
        assert!(!env.scu_build);
    }

    #[test]
    fn test_invalid_bool_option() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions::parse(["scu_build=perhaps"]).unwrap();
        assert!(BuildEnvironment::resolve(&ctx(&tmp), &Config::default(), options).is_err());
    }

    #[test]
    fn test_discover_sources_skips_generated() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("kafkalib")).unwrap();
        fs::create_dir_all(src.join("gen")).unwrap();
        fs::write(src.join("register_types.cpp"), "").unwrap();
        fs::write(src.join("kafkalib/kafka.cpp"), "").unwrap();
        fs::write(src.join("gen/scu.cpp"), "").unwrap();
        fs::write(src.join("notes.txt"), "").unwrap();

        let mut env =
            BuildEnvironment::resolve(&ctx(&tmp), &Config::default(), BuildOptions::new()).unwrap();
        env.discover_sources().unwrap();

        assert_eq!(
            env.sources,
            vec![
                PathBuf::from("src/register_types.cpp"),
                PathBuf::from("src/kafkalib/kafka.cpp"),
            ]
        );
        assert_eq!(env.discovered, env.sources);
        assert_eq!(env.include_paths, vec!["src/"]);
    }
}

//! IDE build command composition.
//!
//! The IDE invokes one shell command per action. The command first sets up
//! the compiler environment for the active platform and then re-runs the
//! host build tool with the options the project was generated with. The
//! same command serves every variant: the IDE substitutes its own
//! `$(Configuration)` and `$(PlatformTarget)` tokens at invocation time.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::options::BuildOptions;
use crate::core::variant::{VariantCell, VariantMatrix};
use crate::util::config::DEFAULT_BUILD_TOOL;

/// Separator between chained `cmd` statements.
const CMD_CHAIN: &str = " ^& ";

/// Platform identifier passed to the host build tool.
pub const TARGET_PLATFORM: &str = "windows";

/// A logical IDE action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Build,
    Rebuild,
    Clean,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Build, Action::Rebuild, Action::Clean];

    /// Host build tool invocation for this action.
    pub fn base_command(&self, tool: &str) -> String {
        match self {
            Action::Build => format!("{} debug_symbols=yes", tool),
            // Regenerates the project as part of a rebuild.
            Action::Rebuild => format!("{} debug_symbols=yes vsproj=yes", tool),
            Action::Clean => format!("{} --clean", tool),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Build => write!(f, "build"),
            Action::Rebuild => write!(f, "rebuild"),
            Action::Clean => write!(f, "clean"),
        }
    }
}

/// Map an IDE platform target onto the toolchain's architecture name.
///
/// The IDE calls the 64-bit target `x64` while the initialization script
/// expects `x86_amd64`. Everything else passes through unchanged.
pub fn toolchain_arch(platform_target: &str) -> &str {
    if platform_target == "x64" {
        "x86_amd64"
    } else {
        platform_target
    }
}

/// Initialization step for a concrete platform target.
pub fn toolchain_init(batch_file: &Path, platform_target: &str) -> String {
    format!(
        "call \"{}\" {}",
        batch_file.display(),
        toolchain_arch(platform_target)
    )
}

/// MSBuild expression that recovers the base configuration from the active
/// IDE configuration by stripping every mode suffix.
///
/// With a `tools` mode this is
/// `$(Configuration.Replace("tools", "").Replace("_[]", ""))`.
pub fn configuration_expression(mode_names: &[String]) -> String {
    let mut expr = String::from("$(Configuration");
    for name in mode_names {
        expr.push_str(&format!(".Replace(\"{}\", \"\")", name));
    }
    expr.push_str(".Replace(\"_[]\", \"\"))");
    expr
}

/// Evaluate [`configuration_expression`] for a given active configuration.
pub fn resolve_configuration(active: &str, mode_names: &[String]) -> String {
    let mut config = active.to_string();
    for name in mode_names {
        config = config.replace(name.as_str(), "");
    }
    config.replace("_[]", "")
}

/// Commands for all three actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSet {
    pub build: String,
    pub rebuild: String,
    pub clean: String,
}

impl CommandSet {
    pub fn get(&self, action: Action) -> &str {
        match action {
            Action::Build => &self.build,
            Action::Rebuild => &self.rebuild,
            Action::Clean => &self.clean,
        }
    }

    /// Commands for one cell, with the cell's extra arguments appended.
    pub fn for_cell(&self, cell: &VariantCell) -> CommandSet {
        self.with_args(&cell.cmd_args)
    }

    /// Commands with `args` appended to each action.
    pub fn with_args(&self, args: &str) -> CommandSet {
        let append = |cmd: &str| {
            if args.is_empty() {
                cmd.to_string()
            } else {
                format!("{} {}", cmd, args)
            }
        };
        CommandSet {
            build: append(&self.build),
            rebuild: append(&self.rebuild),
            clean: append(&self.clean),
        }
    }
}

/// Composes the IDE build commands for a variant matrix.
#[derive(Debug, Clone)]
pub struct CommandComposer {
    batch_file: PathBuf,
    build_tool: String,
    options: BuildOptions,
    mode_names: Vec<String>,
}

impl CommandComposer {
    /// `options` are the caller's build options; outer-only options are
    /// dropped before they are forwarded.
    pub fn new(batch_file: impl Into<PathBuf>, matrix: &VariantMatrix, options: &BuildOptions) -> Self {
        CommandComposer {
            batch_file: batch_file.into(),
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            options: options.for_ide(),
            mode_names: matrix.mode_names().to_vec(),
        }
    }

    pub fn with_build_tool(mut self, tool: impl Into<String>) -> Self {
        self.build_tool = tool.into();
        self
    }

    /// Options forwarded into every command.
    pub fn forwarded_options(&self) -> &BuildOptions {
        &self.options
    }

    /// Compose the command line for one action.
    pub fn compose(&self, action: Action) -> String {
        let prefix = [
            r#"cmd /V /C set "plat=$(PlatformTarget)""#.to_string(),
            r#"(if "$(PlatformTarget)"=="x64" (set "plat=x86_amd64"))"#.to_string(),
            format!("call \"{}\" !plat!", self.batch_file.display()),
        ];

        // ProjectDir ends with a backslash, which would escape the closing
        // quote of the argument.
        let mut invocation = vec![
            action.base_command(&self.build_tool),
            r#"--directory="$(ProjectDir.TrimEnd('\'))""#.to_string(),
            format!("platform={}", TARGET_PLATFORM),
            format!("target={}", configuration_expression(&self.mode_names)),
            "progress=no".to_string(),
        ];
        invocation.extend(self.options.iter().map(|opt| opt.to_string()));

        let mut statements = prefix.to_vec();
        statements.push(invocation.join(" "));
        statements.join(CMD_CHAIN)
    }

    /// Compose the commands for every action.
    pub fn compose_all(&self) -> CommandSet {
        CommandSet {
            build: self.compose(Action::Build),
            rebuild: self.compose(Action::Rebuild),
            clean: self.compose(Action::Clean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variant::{BuildMode, Platform, VariantMatrixBuilder};

    fn matrix_with_modes(modes: &[&str]) -> VariantMatrix {
        let mut builder = VariantMatrixBuilder::new(
            vec!["editor".into(), "template_release".into(), "template_debug".into()],
            Platform::defaults(),
        )
        .unwrap();
        for mode in modes {
            builder.add_mode(BuildMode::named(*mode)).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_toolchain_arch() {
        assert_eq!(toolchain_arch("x64"), "x86_amd64");
        assert_eq!(toolchain_arch("Win32"), "Win32");
        assert_eq!(toolchain_arch("x86"), "x86");
        assert_eq!(
            toolchain_init(Path::new("C:/VS/vcvarsall.bat"), "x64"),
            "call \"C:/VS/vcvarsall.bat\" x86_amd64"
        );
    }

    #[test]
    fn test_configuration_expression() {
        assert_eq!(
            configuration_expression(&[]),
            r#"$(Configuration.Replace("_[]", ""))"#
        );
        assert_eq!(
            configuration_expression(&["tools".to_string()]),
            r#"$(Configuration.Replace("tools", "").Replace("_[]", ""))"#
        );
    }

    #[test]
    fn test_resolve_configuration() {
        let modes = vec!["tools".to_string(), "profiling".to_string()];
        assert_eq!(resolve_configuration("editor_[tools]", &modes), "editor");
        assert_eq!(
            resolve_configuration("template_debug_[profiling]", &modes),
            "template_debug"
        );
        assert_eq!(resolve_configuration("template_release", &modes), "template_release");
    }

    #[test]
    fn test_every_cell_resolves_to_its_configuration() {
        let matrix = matrix_with_modes(&["tools", "profiling"]);
        for cell in matrix.cells() {
            assert_eq!(
                resolve_configuration(cell.configuration_name(), matrix.mode_names()),
                cell.configuration
            );
        }
    }

    #[test]
    fn test_compose_build() {
        let matrix = matrix_with_modes(&["tools"]);
        let options = BuildOptions::parse([
            "vsproj=yes",
            "dev_build=yes",
            "target=editor",
            "platform=windows",
            "progress=no",
        ])
        .unwrap();
        let composer = CommandComposer::new(
            r"C:\Program Files\VS\VC\Auxiliary\Build\vcvarsall.bat",
            &matrix,
            &options,
        );

        let expected = concat!(
            r#"cmd /V /C set "plat=$(PlatformTarget)" ^& "#,
            r#"(if "$(PlatformTarget)"=="x64" (set "plat=x86_amd64")) ^& "#,
            r#"call "C:\Program Files\VS\VC\Auxiliary\Build\vcvarsall.bat" !plat! ^& "#,
            r#"scons debug_symbols=yes --directory="$(ProjectDir.TrimEnd('\'))" platform=windows "#,
            r#"target=$(Configuration.Replace("tools", "").Replace("_[]", "")) progress=no dev_build=yes"#,
        );
        assert_eq!(composer.compose(Action::Build), expected);
    }

    #[test]
    fn test_compose_all_actions() {
        let matrix = matrix_with_modes(&[]);
        let composer = CommandComposer::new("vcvarsall.bat", &matrix, &BuildOptions::new())
            .with_build_tool("scons.bat");
        let commands = composer.compose_all();

        assert!(commands.build.contains(" ^& scons.bat debug_symbols=yes --directory="));
        assert!(commands
            .rebuild
            .contains(" ^& scons.bat debug_symbols=yes vsproj=yes --directory="));
        assert!(commands.clean.contains(" ^& scons.bat --clean --directory="));
        for action in Action::ALL {
            assert!(commands.get(action).ends_with("progress=no"));
        }
    }

    #[test]
    fn test_cell_args_are_appended() {
        let mut builder =
            VariantMatrixBuilder::new(vec!["editor".into()], Platform::defaults()).unwrap();
        builder
            .add_mode(BuildMode::named("tools").with_cli_args("tools=yes"))
            .unwrap();
        let matrix = builder.build();
        let commands = CommandComposer::new("vcvarsall.bat", &matrix, &BuildOptions::new())
            .compose_all();

        let default_cell = commands.for_cell(&matrix.cells()[0]);
        assert_eq!(default_cell, commands);

        let tools_cell = commands.for_cell(&matrix.cells()[2]);
        assert!(tools_cell.build.ends_with("progress=no tools=yes"));
        assert!(tools_cell.clean.ends_with("progress=no tools=yes"));
    }
}

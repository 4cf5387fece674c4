//! Visual Studio project emission.
//!
//! Writes an NMake-style `.vcxproj` and a solution referencing it. The
//! project never compiles anything itself: every configuration shells out
//! to the host build tool through the composed commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::classify::ProjectFiles;
use super::command::CommandSet;
use crate::core::variant::VariantMatrix;
use crate::util::fs::{to_slash, write_string};
use crate::util::hash::guid_from_name;

/// Project file suffix.
pub const PROJECT_SUFFIX: &str = ".vcxproj";

/// Solution file suffix.
pub const SOLUTION_SUFFIX: &str = ".sln";

/// Project type GUID for Visual C++ projects.
const VCPP_PROJECT_TYPE: &str = "{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}";

/// Per-variant values handed to the emitter, one entry per cell in matrix
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectVariants {
    pub variant: Vec<String>,
    pub runfile: Vec<String>,
    pub buildtarget: Vec<String>,
    pub cpppaths: Vec<Vec<String>>,
    pub cppdefines: Vec<Vec<String>>,
    pub cmdargs: Vec<String>,
}

impl ProjectVariants {
    pub fn from_matrix(matrix: &VariantMatrix) -> Self {
        let mut variants = ProjectVariants::default();
        for cell in matrix.cells() {
            variants.variant.push(cell.label.clone());
            variants.runfile.push(cell.runfile.clone());
            variants.buildtarget.push(cell.runfile.clone());
            variants.cpppaths.push(cell.include_paths.clone());
            variants.cppdefines.push(cell.defines.clone());
            variants.cmdargs.push(cell.cmd_args.clone());
        }
        variants
    }

    pub fn len(&self) -> usize {
        self.variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variant.is_empty()
    }

    /// `(configuration, platform)` for variant `i`.
    fn split(&self, i: usize) -> (&str, &str) {
        let label = &self.variant[i];
        label.split_once('|').unwrap_or((label.as_str(), ""))
    }
}

/// Files written by [`ProjectEmitter::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedProject {
    pub project: PathBuf,
    pub solution: PathBuf,
}

/// Emits the project and solution files for one project.
#[derive(Debug, Clone)]
pub struct ProjectEmitter {
    root: PathBuf,
    name: String,
    guid: String,
}

impl ProjectEmitter {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        ProjectEmitter {
            root: root.into(),
            guid: guid_from_name(&name),
            name,
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn project_path(&self) -> PathBuf {
        self.root.join(format!("{}{}", self.name, PROJECT_SUFFIX))
    }

    pub fn solution_path(&self) -> PathBuf {
        self.root.join(format!("{}{}", self.name, SOLUTION_SUFFIX))
    }

    /// Write both files, overwriting previous ones.
    pub fn emit(
        &self,
        matrix: &VariantMatrix,
        commands: &CommandSet,
        files: &ProjectFiles,
    ) -> Result<EmittedProject> {
        let variants = ProjectVariants::from_matrix(matrix);

        let project = self.project_path();
        write_string(&project, &self.render_project(&variants, commands, files))?;
        let solution = self.solution_path();
        write_string(&solution, &self.render_solution(&variants))?;

        tracing::info!(
            "generated {} with {} configurations",
            project.display(),
            variants.len()
        );
        Ok(EmittedProject { project, solution })
    }

    /// Render the `.vcxproj` document.
    pub fn render_project(
        &self,
        variants: &ProjectVariants,
        commands: &CommandSet,
        files: &ProjectFiles,
    ) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str(
            "<Project DefaultTargets=\"Build\" ToolsVersion=\"17.0\" \
             xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\n",
        );

        out.push_str("\t<ItemGroup Label=\"ProjectConfigurations\">\n");
        for i in 0..variants.len() {
            let (config, platform) = variants.split(i);
            out.push_str(&format!(
                "\t\t<ProjectConfiguration Include=\"{}\">\n",
                xml_escape(&variants.variant[i])
            ));
            out.push_str(&format!("\t\t\t<Configuration>{}</Configuration>\n", xml_escape(config)));
            out.push_str(&format!("\t\t\t<Platform>{}</Platform>\n", xml_escape(platform)));
            out.push_str("\t\t</ProjectConfiguration>\n");
        }
        out.push_str("\t</ItemGroup>\n");

        out.push_str("\t<PropertyGroup Label=\"Globals\">\n");
        out.push_str(&format!("\t\t<ProjectGuid>{}</ProjectGuid>\n", self.guid));
        out.push_str(&format!("\t\t<RootNamespace>{}</RootNamespace>\n", xml_escape(&self.name)));
        out.push_str("\t\t<Keyword>MakeFileProj</Keyword>\n");
        out.push_str("\t</PropertyGroup>\n");
        out.push_str("\t<Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.Default.props\" />\n");

        for i in 0..variants.len() {
            out.push_str(&format!(
                "\t<PropertyGroup Condition=\"{}\" Label=\"Configuration\">\n",
                condition(&variants.variant[i])
            ));
            out.push_str("\t\t<ConfigurationType>Makefile</ConfigurationType>\n");
            out.push_str("\t\t<UseOfMfc>false</UseOfMfc>\n");
            out.push_str("\t\t<PlatformToolset>v143</PlatformToolset>\n");
            out.push_str("\t</PropertyGroup>\n");
        }
        out.push_str("\t<Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.props\" />\n");

        for i in 0..variants.len() {
            let cell_commands = commands.with_args(&variants.cmdargs[i]);
            out.push_str(&format!(
                "\t<PropertyGroup Condition=\"{}\">\n",
                condition(&variants.variant[i])
            ));
            out.push_str(&format!(
                "\t\t<NMakeBuildCommandLine>{}</NMakeBuildCommandLine>\n",
                xml_escape(&cell_commands.build)
            ));
            out.push_str(&format!(
                "\t\t<NMakeReBuildCommandLine>{}</NMakeReBuildCommandLine>\n",
                xml_escape(&cell_commands.rebuild)
            ));
            out.push_str(&format!(
                "\t\t<NMakeCleanCommandLine>{}</NMakeCleanCommandLine>\n",
                xml_escape(&cell_commands.clean)
            ));
            out.push_str(&format!(
                "\t\t<NMakeOutput>{}</NMakeOutput>\n",
                xml_escape(&variants.buildtarget[i])
            ));
            out.push_str(&format!(
                "\t\t<NMakePreprocessorDefinitions>{}$(NMakePreprocessorDefinitions)</NMakePreprocessorDefinitions>\n",
                xml_escape(&join_list(&variants.cppdefines[i]))
            ));
            out.push_str(&format!(
                "\t\t<NMakeIncludeSearchPath>{}$(NMakeIncludeSearchPath)</NMakeIncludeSearchPath>\n",
                xml_escape(&join_list(&variants.cpppaths[i]))
            ));
            out.push_str(&format!(
                "\t\t<LocalDebuggerCommand>{}</LocalDebuggerCommand>\n",
                xml_escape(&variants.runfile[i])
            ));
            out.push_str("\t</PropertyGroup>\n");
        }

        write_items(&mut out, "ClInclude", files.headers());
        write_items(&mut out, "ClCompile", files.sources());

        out.push_str("\t<Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.targets\" />\n");
        out.push_str("</Project>\n");
        out
    }

    /// Render the `.sln` document.
    pub fn render_solution(&self, variants: &ProjectVariants) -> String {
        let mut out = String::new();
        out.push_str("\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n");
        out.push_str("# Visual Studio Version 17\r\n");
        out.push_str(&format!(
            "Project(\"{}\") = \"{}\", \"{}{}\", \"{}\"\r\nEndProject\r\n",
            VCPP_PROJECT_TYPE, self.name, self.name, PROJECT_SUFFIX, self.guid
        ));
        out.push_str("Global\r\n");
        out.push_str("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r\n");
        for label in &variants.variant {
            out.push_str(&format!("\t\t{} = {}\r\n", label, label));
        }
        out.push_str("\tEndGlobalSection\r\n");
        out.push_str("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\r\n");
        for label in &variants.variant {
            out.push_str(&format!("\t\t{}.{}.ActiveCfg = {}\r\n", self.guid, label, label));
            out.push_str(&format!("\t\t{}.{}.Build.0 = {}\r\n", self.guid, label, label));
        }
        out.push_str("\tEndGlobalSection\r\n");
        out.push_str("EndGlobal\r\n");
        out
    }
}

fn condition(label: &str) -> String {
    format!("'$(Configuration)|$(Platform)'=='{}'", xml_escape(label))
}

fn join_list(items: &[String]) -> String {
    items.iter().map(|item| format!("{};", item)).collect()
}

fn write_items(out: &mut String, kind: &str, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    out.push_str("\t<ItemGroup>\n");
    for path in paths {
        out.push_str(&format!(
            "\t\t<{} Include=\"{}\" />\n",
            kind,
            xml_escape(&windows_path(path))
        ));
    }
    out.push_str("\t</ItemGroup>\n");
}

fn windows_path(path: &Path) -> String {
    to_slash(path).replace('/', "\\")
}

/// Escape text for XML content and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

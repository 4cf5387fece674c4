//! CLI integration tests for extbuild.
//!
//! These tests run the binary against throwaway extension projects.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the extbuild binary command, isolated from the user's environment.
fn extbuild(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("extbuild").unwrap();
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("VCINSTALLDIR")
        .env_remove("VS140COMNTOOLS")
        .env_remove("RUST_LOG");
    cmd
}

/// Create an extension project with a couple of sources.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("kafkalib")).unwrap();
    fs::write(src.join("register_types.cpp"), "").unwrap();
    fs::write(src.join("register_types.h"), "").unwrap();
    fs::write(src.join("kafkalib/kafka.cpp"), "").unwrap();
    fs::write(src.join("kafkalib/kafka.hpp"), "").unwrap();
    tmp
}

fn write_config(root: &Path, contents: &str) {
    fs::create_dir_all(root.join(".extbuild")).unwrap();
    fs::write(root.join(".extbuild/config.toml"), contents).unwrap();
}

// ============================================================================
// extbuild configure
// ============================================================================

#[test]
fn test_configure_writes_env_dump() {
    let tmp = project();

    extbuild(tmp.path())
        .arg("configure")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Configured"))
        .stdout(predicate::str::contains("src/register_types.cpp"));

    let dump = fs::read_to_string(tmp.path().join(".extbuild_env.json")).unwrap();
    assert!(dump.starts_with("{\n    \""));
    let value: serde_json::Value = serde_json::from_str(&dump).unwrap();
    assert_eq!(value["target"], "template_debug");
    assert_eq!(value["sources"].as_array().unwrap().len(), 2);
    assert!(!tmp.path().join("src/gen/scu.cpp").exists());
}

#[test]
fn test_configure_with_scu_build() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["configure", "scu_build=yes"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Aggregated"));

    let scu = fs::read_to_string(tmp.path().join("src/gen/scu.cpp")).unwrap();
    assert_eq!(
        scu,
        "#include \"register_types.cpp\"\n#include \"kafkalib/kafka.cpp\"\n"
    );
}

#[test]
fn test_configure_scu_from_config() {
    let tmp = project();
    write_config(tmp.path(), "[build]\nscu_build = true\n");

    extbuild(tmp.path())
        .args(["configure", "--json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("scu.cpp"));

    assert!(tmp.path().join("src/gen/scu.cpp").is_file());
}

#[test]
fn test_configure_with_directory_flag() {
    let tmp = project();
    let outside = TempDir::new().unwrap();

    extbuild(outside.path())
        .args(["-C"])
        .arg(tmp.path())
        .args(["configure", "scu_build=yes"])
        .current_dir(outside.path())
        .assert()
        .success();

    assert!(tmp.path().join("src/gen/scu.cpp").is_file());
    // The dump goes to the working directory.
    assert!(outside.path().join(".extbuild_env.json").is_file());
}

#[test]
fn test_configure_rejects_malformed_option() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["configure", "scu_build"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid build option"));
}

#[test]
fn test_configure_rejects_bad_bool() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["configure", "scu_build=perhaps"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("scu_build"));
}

// ============================================================================
// extbuild classify
// ============================================================================

#[test]
fn test_classify_prints_headers_then_sources() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["classify", "src/kafkalib/kafka.cpp", "src/missing.h"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::eq(
            "Headers:\n  src/kafkalib/kafka.hpp\nSources:\n  src/kafkalib/kafka.cpp\n",
        ));
}

#[test]
fn test_classify_expands_directories() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["classify", "src"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  src/register_types.h\n"))
        .stdout(predicate::str::contains("  src/kafkalib/kafka.cpp\n"));
}

// ============================================================================
// extbuild vsproj
// ============================================================================

#[test]
fn test_vsproj_without_toolchain_is_skipped() {
    let tmp = project();

    extbuild(tmp.path())
        .arg("vsproj")
        .current_dir(tmp.path())
        .env("PATH", "")
        .env("ProgramFiles(x86)", tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Could not locate Visual Studio batch file",
        ));

    assert!(!tmp.path().join("cpp.hint").exists());
}

#[test]
fn test_vsproj_with_configured_toolchain() {
    let tmp = project();
    let script = tmp.path().join("vcvarsall.bat");
    fs::write(&script, "@echo off\r\n").unwrap();
    let config = format!(
        "[project]\nname = \"kafka\"\n\n[toolchain]\nvcvars = {:?}\n\n[[vsproj.modes]]\nname = \"tools\"\ncli_args = \"tools=yes\"\n",
        script.to_string_lossy()
    );
    write_config(tmp.path(), &config);

    extbuild(tmp.path())
        .args(["vsproj", "dev_build=yes"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("kafka.vcxproj"));

    let xml = fs::read_to_string(tmp.path().join("kafka.vcxproj")).unwrap();
    assert!(xml.contains("editor_[tools]|x64"));
    assert!(xml.contains("dev_build=yes"));
    assert!(xml.contains("tools=yes"));
    assert!(xml.contains("src\\kafkalib\\kafka.hpp") || xml.contains("src/kafkalib/kafka.hpp"));
    assert!(tmp.path().join("kafka.sln").is_file());
    assert_eq!(
        fs::read_to_string(tmp.path().join("cpp.hint")).unwrap(),
        "#define GDCLASS(m_class, m_inherits)\n"
    );
}

// ============================================================================
// extbuild dump / completions
// ============================================================================

#[test]
fn test_dump_to_custom_path() {
    let tmp = project();

    extbuild(tmp.path())
        .args(["dump", "target=editor", "--output", "env.json"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("env.json")).unwrap()).unwrap();
    assert_eq!(value["target"], "editor");
    assert_eq!(value["options"]["target"], "editor");
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    extbuild(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extbuild"));
}

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();

    extbuild(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("vsproj"));
}

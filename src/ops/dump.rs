//! Environment dump for external tooling.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::environment::BuildEnvironment;
use crate::util::fs::write_string;

/// Serialize `value` as JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("failed to serialize build environment")?;
    let mut json = String::from_utf8(buf).context("environment dump is not valid UTF-8")?;
    json.push('\n');
    Ok(json)
}

/// Write `env` to `path`, replacing any previous dump.
pub fn dump(env: &BuildEnvironment, path: &Path) -> Result<()> {
    let json = to_pretty_json(env)?;
    write_string(path, &json)?;
    tracing::debug!("wrote environment dump to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::BuildOptions;
    use crate::util::config::Config;
    use crate::util::GlobalContext;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_four_space_indent() {
        let json = to_pretty_json(&serde_json::json!({"target": "editor"})).unwrap();
        assert_eq!(json, "{\n    \"target\": \"editor\"\n}\n");
    }

    #[test]
    fn test_dump_overwrites() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_root(tmp.path()).unwrap();
        let options = BuildOptions::parse(["target=editor", "dev_build=yes"]).unwrap();
        let env = BuildEnvironment::resolve(&ctx, &Config::default(), options).unwrap();

        let path = tmp.path().join("env.json");
        fs::write(&path, "stale").unwrap();
        dump(&env, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["target"], "editor");
        assert_eq!(value["options"]["dev_build"], "yes");
        assert_eq!(value["scu_build"], false);
    }
}

//! Command-line build options.
//!
//! Options arrive as `key=value` pairs, the same way the host build tool
//! receives them. They are kept in insertion order so they can be
//! re-serialized verbatim into the IDE build commands.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Options that only make sense for the outer invocation and are never
/// forwarded into generated IDE commands.
///
/// `vsproj` would regenerate the project on every build, `platform` and
/// `target` are fixed per variant, and `progress` is forced off.
pub const IDE_FILTERED_OPTIONS: &[&str] = &["vsproj", "platform", "target", "progress"];

/// Error parsing a `key=value` option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("invalid option `{0}`: expected KEY=VALUE")]
    MissingEquals(String),

    #[error("invalid option `{0}`: empty key")]
    EmptyKey(String),

    #[error("invalid boolean `{value}` for option `{key}`")]
    InvalidBool { key: String, value: String },
}

/// A single `key=value` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOption {
    pub key: String,
    pub value: String,
}

impl FromStr for BuildOption {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| OptionError::MissingEquals(s.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(OptionError::EmptyKey(s.to_string()));
        }
        Ok(BuildOption {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for BuildOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_quoted(&self.value)
            || !self.value.contains(|c: char| c.is_whitespace() || c == '"')
        {
            write!(f, "{}={}", self.key, self.value)
        } else {
            write!(f, "{}=\"{}\"", self.key, escape_quoted(&self.value))
        }
    }
}

/// A value already wrapped in quotes with none inside.
fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && value.starts_with('"')
        && value.ends_with('"')
        && !value[1..value.len() - 1].contains('"')
}

/// Escape `value` for use inside a double-quoted argument.
///
/// Follows the Windows argument rules: an embedded quote becomes `\"`, and
/// backslashes are doubled only when they precede a quote (including the
/// closing one).
fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let mut backslashes = 0;
    for c in value.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat('\\').take(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.extend(std::iter::repeat('\\').take(backslashes * 2));
    out
}

/// Ordered set of build options.
///
/// Setting a key that is already present replaces its value but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    entries: Vec<BuildOption>,
}

// Serialized as a map, in insertion order.
impl Serialize for BuildOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for opt in &self.entries {
            map.serialize_entry(&opt.key, &opt.value)?;
        }
        map.end()
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        BuildOptions::default()
    }

    /// Parse a list of `key=value` arguments.
    pub fn parse<I, S>(args: I) -> Result<Self, OptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = BuildOptions::new();
        for arg in args {
            let opt: BuildOption = arg.as_ref().parse()?;
            opts.set(opt.key, opt.value);
        }
        Ok(opts)
    }

    /// Insert or replace an option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(BuildOption { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Get a boolean option, `None` when the key is absent.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, OptionError> {
        self.get(key)
            .map(|value| {
                parse_bool(value).ok_or_else(|| OptionError::InvalidBool {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Remove an option, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx).value)
    }

    /// Copy of these options without the given keys.
    pub fn without(&self, keys: &[&str]) -> BuildOptions {
        BuildOptions {
            entries: self
                .entries
                .iter()
                .filter(|e| !keys.contains(&e.key.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Options forwarded into generated IDE commands.
    pub fn for_ide(&self) -> BuildOptions {
        self.without(IDE_FILTERED_OPTIONS)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildOption> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a boolean the way the host build tool does.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "t" | "1" | "on" | "all" => Some(true),
        "n" | "no" | "false" | "f" | "0" | "off" | "none" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let opts = BuildOptions::parse(["target=editor", "scu_build=yes", "dev_build=no"]).unwrap();
        assert_eq!(opts.len(), 3);
        assert_eq!(opts.get("target"), Some("editor"));
        assert_eq!(opts.get_bool("scu_build").unwrap(), Some(true));
        assert_eq!(opts.get_bool("dev_build").unwrap(), Some(false));
        assert_eq!(opts.get_bool("missing").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            BuildOptions::parse(["target"]).unwrap_err(),
            OptionError::MissingEquals("target".to_string())
        );
        assert_eq!(
            BuildOptions::parse(["=editor"]).unwrap_err(),
            OptionError::EmptyKey("=editor".to_string())
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        let opts = BuildOptions::parse(["extra_flags=-DFOO=1"]).unwrap();
        assert_eq!(opts.get("extra_flags"), Some("-DFOO=1"));
    }

    #[test]
    fn test_set_keeps_first_position() {
        let opts = BuildOptions::parse(["a=1", "b=2", "a=3"]).unwrap();
        let keys: Vec<_> = opts.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(opts.get("a"), Some("3"));
    }

    #[test]
    fn test_invalid_bool() {
        let opts = BuildOptions::parse(["scu_build=maybe"]).unwrap();
        assert!(matches!(
            opts.get_bool("scu_build"),
            Err(OptionError::InvalidBool { .. })
        ));
    }

    #[test]
    fn test_for_ide_filters_outer_options() {
        let opts = BuildOptions::parse([
            "vsproj=yes",
            "platform=windows",
            "dev_build=yes",
            "target=editor",
            "progress=yes",
            "precision=double",
        ])
        .unwrap();
        let filtered = opts.for_ide();
        let rendered: Vec<_> = filtered.iter().map(|o| o.to_string()).collect();
        assert_eq!(rendered, vec!["dev_build=yes", "precision=double"]);
    }

    #[test]
    fn test_display_quotes_whitespace() {
        let opt: BuildOption = "godot_path=C:\\Program Files\\godot.exe".parse().unwrap();
        assert_eq!(opt.to_string(), "godot_path=\"C:\\Program Files\\godot.exe\"");

        let quoted: BuildOption = "name=\"already quoted\"".parse().unwrap();
        assert_eq!(quoted.to_string(), "name=\"already quoted\"");
    }

    #[test]
    fn test_display_escapes_embedded_quotes() {
        let opt: BuildOption = "extra=a \"b\" c".parse().unwrap();
        assert_eq!(opt.to_string(), r#"extra="a \"b\" c""#);

        let opt: BuildOption = r#"flag=say"hi""#.parse().unwrap();
        assert_eq!(opt.to_string(), r#"flag="say\"hi\"""#);

        let opt: BuildOption = r"dir=C:\My Dir\".parse().unwrap();
        assert_eq!(opt.to_string(), r#"dir="C:\My Dir\\""#);
    }
}

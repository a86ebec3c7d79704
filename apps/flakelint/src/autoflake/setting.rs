//! Autoflake configuration record.
//!
//! The plugin's `config` table deserializes into [`AutoflakeSetting`].
//! Deserialization is strict: unknown keys are rejected.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Options for one autoflake component. Every boolean maps to one flag.
pub struct AutoflakeSetting {
    #[serde(default)]
    pub includes: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub excludes: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub include_globs: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_globs: Option<Vec<String>>,
    /// Extra modules whose unused imports may be removed (`--imports a,b`).
    #[serde(default)]
    pub imports: Option<Vec<String>>,
    #[serde(default)]
    pub expand_star_imports: bool,
    #[serde(default)]
    pub remove_unused_variables: bool,
    #[serde(default)]
    pub ignore_init_module_imports: bool,
    #[serde(default)]
    pub remove_duplicate_keys: bool,
    #[serde(default)]
    pub remove_all_unused_imports: bool,
}

impl AutoflakeSetting {
    /// Build a setting from a plugin `config` table.
    ///
    /// `location` names the table in error messages (e.g. `plugin.autoflake`).
    pub fn from_table(table: toml::Table, location: &str) -> Result<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| Error::InvalidSetting {
                location: location.to_string(),
                message: e.message().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn test_defaults_are_all_off() {
        let s = AutoflakeSetting::from_table(toml::Table::new(), "plugin.autoflake").unwrap();
        assert_eq!(s, AutoflakeSetting::default());
        assert!(s.imports.is_none());
        assert!(!s.remove_all_unused_imports);
    }

    #[test]
    fn test_full_table() {
        let s = AutoflakeSetting::from_table(
            table(
                r#"
includes = ["src"]
excludes = ["src/gen"]
include_globs = ["tools/**/*.py"]
exclude_globs = ["**/migrations/*.py"]
imports = ["django", "requests"]
expand_star_imports = true
remove_unused_variables = true
ignore_init_module_imports = true
remove_duplicate_keys = true
remove_all_unused_imports = true
"#,
            ),
            "plugin.autoflake",
        )
        .unwrap();
        assert_eq!(s.includes, Some(vec![PathBuf::from("src")]));
        assert_eq!(s.exclude_globs, Some(vec!["**/migrations/*.py".to_string()]));
        assert_eq!(
            s.imports,
            Some(vec!["django".to_string(), "requests".to_string()])
        );
        assert!(s.expand_star_imports && s.remove_duplicate_keys);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = AutoflakeSetting::from_table(table("remove_unused = true"), "plugin.autoflake")
            .unwrap_err();
        match err {
            Error::InvalidSetting { location, message } => {
                assert_eq!(location, "plugin.autoflake");
                assert!(message.contains("remove_unused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(AutoflakeSetting::from_table(
            table("expand_star_imports = \"yes\""),
            "plugin.autoflake"
        )
        .is_err());
    }
}

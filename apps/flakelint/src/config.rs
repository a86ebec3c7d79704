//! Configuration discovery and effective settings resolution.
//!
//! flakelint reads `flakelint.toml|yaml|yml`, or the `[tool.flakelint]` table
//! of `pyproject.toml`, from the repository root (or closest ancestor) and
//! merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - plugin settings: all autoflake options off
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use crate::host::PluginConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["flakelint.toml", "flakelint.yaml", "flakelint.yml"];
const PYPROJECT: &str = "pyproject.toml";

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// Root configuration loaded from `flakelint.toml|yaml` or `pyproject.toml`.
pub struct FlakelintConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub plugin: BTreeMap<String, PluginSection>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// One `[plugin.<name>]` section; `config` holds the plugin's own options.
pub struct PluginSection {
    pub config: Option<toml::Table>,
}

#[derive(Deserialize)]
struct PyProject {
    tool: Option<PyProjectTool>,
}

#[derive(Deserialize)]
struct PyProjectTool {
    flakelint: Option<FlakelintConfig>,
}

#[derive(Debug, Clone)]
/// A config file that was found and parsed.
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: FlakelintConfig,
    /// Dotted prefix of the plugin tables inside the file.
    pub plugin_prefix: &'static str,
}

impl LoadedConfig {
    /// Plugin section for `name`; `None` when the file does not mention it.
    pub fn plugin_config(&self, name: &str) -> Option<PluginConfig> {
        self.config.plugin.get(name).map(|section| PluginConfig {
            location: format!("{}.{}", self.plugin_prefix, name),
            config: section.config.clone(),
        })
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub config: Option<LoadedConfig>,
}

impl Effective {
    /// Directory tools run from: the config file's directory, else the root.
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .as_ref()
            .and_then(|c| c.path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.repo_root.clone())
    }

    /// Plugin section for `name`, or an empty (all-defaults) one when absent.
    pub fn plugin_config(&self, name: &str) -> PluginConfig {
        self.config
            .as_ref()
            .and_then(|c| c.plugin_config(name))
            .unwrap_or_else(|| PluginConfig {
                location: format!("plugin.{}", name),
                config: Some(toml::Table::new()),
            })
    }

    /// Path reported to plugins as the config origin.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .as_ref()
            .map(|c| c.path.clone())
            .unwrap_or_else(|| self.repo_root.join(CONFIG_FILES[0]))
    }
}

fn has_config(dir: &Path) -> bool {
    CONFIG_FILES.iter().any(|f| dir.join(f).exists()) || dir.join(PYPROJECT).exists()
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a flakelint config, a `pyproject.toml` or a `.git` directory
/// is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if has_config(cur) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load the flakelint config from `root` if present.
///
/// Dedicated files win over `pyproject.toml`; a `pyproject.toml` without a
/// `[tool.flakelint]` table counts as absent.
pub fn load_config(root: &Path) -> Result<Option<LoadedConfig>> {
    let toml_path = root.join(CONFIG_FILES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)?;
        let config: FlakelintConfig = toml::from_str(&s).map_err(|source| Error::ConfigParse {
            path: toml_path.clone(),
            source,
        })?;
        return Ok(Some(LoadedConfig {
            path: toml_path,
            config,
            plugin_prefix: "plugin",
        }));
    }
    for yml in &CONFIG_FILES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)?;
            let config: FlakelintConfig =
                serde_yaml::from_str(&s).map_err(|source| Error::ConfigYaml {
                    path: p.clone(),
                    source,
                })?;
            return Ok(Some(LoadedConfig {
                path: p,
                config,
                plugin_prefix: "plugin",
            }));
        }
    }
    let py = root.join(PYPROJECT);
    if py.exists() {
        let s = fs::read_to_string(&py)?;
        let project: PyProject = toml::from_str(&s).map_err(|source| Error::ConfigParse {
            path: py.clone(),
            source,
        })?;
        if let Some(config) = project.tool.and_then(|t| t.flakelint) {
            return Ok(Some(LoadedConfig {
                path: py,
                config,
                plugin_prefix: "tool.flakelint.plugin",
            }));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli_repo_root: Option<&str>, cli_output: Option<&str>) -> Result<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let start = fs::canonicalize(&start)?;
    let repo_root = detect_repo_root(&start);
    let config = load_config(&repo_root)?;

    let output = cli_output
        .map(|s| s.to_string())
        .or_else(|| config.as_ref().and_then(|c| c.config.output.clone()))
        .unwrap_or_else(|| "human".to_string());

    Ok(Effective {
        repo_root,
        output,
        config,
    })
}

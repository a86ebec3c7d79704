//! Interfaces between a plugin and the host that drives it.
//!
//! A host loads a [`Plugin`] through a factory function, hands it the
//! plugin's config table, and receives [`Component`]s. Each component builds
//! a [`LintCommand`] per [`Target`]; running a command reports diagnostics to
//! a [`Reporter`] and yields the tool's exit code.

use crate::error::{Error, Result};
use crate::models::{Diagnostic, RunReport};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Operation mode requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Check only; files are left untouched.
    Lint,
    /// Rewrite files in place.
    Format,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Lint => "lint",
            Target::Format => "format",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lint" => Ok(Target::Lint),
            "format" => Ok(Target::Format),
            other => Err(Error::UnknownTarget(other.to_string())),
        }
    }
}

/// Directories a command runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Directory holding the project config; tools run from here.
    pub base_dir: PathBuf,
}

impl PathContext {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

/// Plugin section as found in the project config.
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    /// Dotted location of the section, used in error messages.
    pub location: String,
    pub config: Option<toml::Table>,
}

/// Sink for diagnostics produced by a command.
pub trait Reporter {
    fn report_diagnostics(&mut self, diagnostics: Vec<Diagnostic>);
}

/// Reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_report(self, command: &str, exit_code: i32) -> RunReport {
        RunReport::new(command, exit_code, self.diagnostics)
    }
}

impl Reporter for CollectingReporter {
    fn report_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }
}

/// A single runnable invocation of a tool.
pub trait LintCommand {
    fn name(&self) -> &str;

    /// Run to completion and return the exit code; 0 means success.
    fn run(&self, reporter: &mut dyn Reporter) -> Result<i32>;
}

/// A configured tool able to build commands for the targets it supports.
pub trait Component {
    fn name(&self) -> &str;

    fn targets(&self) -> &[Target];

    /// Write tool-specific settings files, if the tool has any.
    fn export_setting(&self, paths: &PathContext) -> Result<()>;

    fn create_command(&self, target: Target, paths: &PathContext) -> Box<dyn LintCommand>;
}

/// Entry point object returned by a plugin factory.
pub trait Plugin {
    /// Build components from the plugin section of the config at `config_path`.
    fn load(&self, config_path: &Path, config: &PluginConfig) -> Result<Vec<Box<dyn Component>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        assert_eq!("lint".parse::<Target>().unwrap(), Target::Lint);
        assert_eq!("format".parse::<Target>().unwrap(), Target::Format);
        let err = "fix".parse::<Target>().unwrap_err();
        assert!(matches!(err, Error::UnknownTarget(t) if t == "fix"));
        assert_eq!(Target::Format.to_string(), "format");
    }

    #[test]
    fn test_collecting_reporter_accumulates() {
        let mut reporter = CollectingReporter::default();
        let d = Diagnostic {
            file_path: PathBuf::from("x.py"),
            start_line: 2,
            end_line: 3,
            start_column: Some(1),
            message: None,
            diff: None,
        };
        reporter.report_diagnostics(vec![d.clone()]);
        reporter.report_diagnostics(vec![d]);
        assert_eq!(reporter.diagnostics().len(), 2);
        let report = reporter.into_report("autoflake", 0);
        assert!(report.success());
        assert_eq!(report.summary.files, 1);
    }
}

//! The autoflake invocation: argument vector, execution, and output mapping.

use crate::autoflake::setting::AutoflakeSetting;
use crate::diff::parse_error_diffs;
use crate::error::{Error, Result};
use crate::host::{LintCommand, PathContext, Reporter};
use crate::process;
use crate::source::{normalize, python_file_filter, Source};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

/// Binary name looked up on `PATH` unless overridden.
pub const AUTOFLAKE_BIN: &str = "autoflake";

const BEFORE_PREFIX: &str = "original/";
const AFTER_PREFIX: &str = "fixed/";

/// Translate a setting into autoflake flags, in a fixed order.
///
/// Targets are not included; they always follow the flags.
pub fn build_args(setting: &AutoflakeSetting, in_place: bool) -> Vec<String> {
    let mut args = Vec::new();
    if in_place {
        args.push("--in-place".to_string());
    }
    if let Some(imports) = setting.imports.as_ref().filter(|i| !i.is_empty()) {
        args.push("--imports".to_string());
        args.push(imports.join(","));
    }
    let flags = [
        (setting.expand_star_imports, "--expand-star-imports"),
        (setting.remove_unused_variables, "--remove-unused-variables"),
        (setting.ignore_init_module_imports, "--ignore-init-module-imports"),
        (setting.remove_duplicate_keys, "--remove-duplicate-keys"),
        (setting.remove_all_unused_imports, "--remove-all-unused-imports"),
    ];
    for (enabled, flag) in flags {
        if enabled {
            args.push(flag.to_string());
        }
    }
    args
}

/// Map an autoflake diff header path back to the file it describes.
///
/// # Errors
///
/// Returns [`Error::UnexpectedErrorFormat`] when neither prefix is present.
pub fn parse_file_path(file_path: &str) -> Result<PathBuf> {
    file_path
        .strip_prefix(BEFORE_PREFIX)
        .or_else(|| file_path.strip_prefix(AFTER_PREFIX))
        .map(PathBuf::from)
        .ok_or_else(|| Error::UnexpectedErrorFormat(file_path.to_string()))
}

/// One autoflake run, either check-only or in place.
#[derive(Debug, Clone)]
pub struct AutoflakeCommand {
    name: String,
    base_dir: PathBuf,
    source: Source,
    setting: AutoflakeSetting,
    in_place: bool,
    program: String,
}

impl AutoflakeCommand {
    pub fn new(
        name: &str,
        paths: &PathContext,
        source: Source,
        setting: AutoflakeSetting,
        in_place: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            base_dir: normalize(&paths.base_dir),
            source,
            setting,
            in_place,
            program: AUTOFLAKE_BIN.to_string(),
        }
    }

    /// Use a different executable name or path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn in_place(&self) -> bool {
        self.in_place
    }

    /// Full argument vector for the given targets, relative to the base dir.
    pub fn command_args(&self, targets: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = build_args(&self.setting, self.in_place)
            .into_iter()
            .map(OsString::from)
            .collect();
        args.extend(targets.iter().map(|t| {
            pathdiff::diff_paths(t, &self.base_dir)
                .unwrap_or_else(|| t.clone())
                .into_os_string()
        }));
        args
    }
}

impl LintCommand for AutoflakeCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, reporter: &mut dyn Reporter) -> Result<i32> {
        let sources = self.source.resolve(&self.base_dir, python_file_filter)?;
        info!("Checking {} files", sources.len());

        let program = process::check_command_installed(&self.program)?;
        if sources.is_empty() {
            return Ok(0);
        }

        let args = self.command_args(&sources);
        let output = process::run(&program, &args, &self.base_dir)?;

        let diagnostics = parse_error_diffs(&output.stdout, parse_file_path)?;
        reporter.report_diagnostics(diagnostics);
        Ok(output.exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CollectingReporter;

    const BOOL_FLAGS: [&str; 5] = [
        "--expand-star-imports",
        "--remove-unused-variables",
        "--ignore-init-module-imports",
        "--remove-duplicate-keys",
        "--remove-all-unused-imports",
    ];

    fn setting_from_mask(mask: u8) -> AutoflakeSetting {
        AutoflakeSetting {
            expand_star_imports: mask & 1 != 0,
            remove_unused_variables: mask & 2 != 0,
            ignore_init_module_imports: mask & 4 != 0,
            remove_duplicate_keys: mask & 8 != 0,
            remove_all_unused_imports: mask & 16 != 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_setting_has_no_flags() {
        assert!(build_args(&AutoflakeSetting::default(), false).is_empty());
        assert_eq!(
            build_args(&AutoflakeSetting::default(), true),
            vec!["--in-place"]
        );
    }

    #[test]
    fn test_all_options_in_stable_order() {
        let setting = AutoflakeSetting {
            imports: Some(vec!["django".into(), "requests".into()]),
            ..setting_from_mask(0b11111)
        };
        assert_eq!(
            build_args(&setting, true),
            vec![
                "--in-place",
                "--imports",
                "django,requests",
                "--expand-star-imports",
                "--remove-unused-variables",
                "--ignore-init-module-imports",
                "--remove-duplicate-keys",
                "--remove-all-unused-imports",
            ]
        );
    }

    #[test]
    fn test_empty_imports_are_omitted() {
        let setting = AutoflakeSetting {
            imports: Some(Vec::new()),
            ..Default::default()
        };
        assert!(build_args(&setting, false).is_empty());
    }

    #[test]
    fn test_each_flag_subset_maps_exactly() {
        for mask in 0u8..32 {
            let args = build_args(&setting_from_mask(mask), false);
            let expected: Vec<&str> = BOOL_FLAGS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| *f)
                .collect();
            assert_eq!(args, expected, "mask {mask:#07b}");
        }
    }

    #[test]
    fn test_format_differs_from_lint_only_by_in_place() {
        let setting = AutoflakeSetting {
            imports: Some(vec!["os".into()]),
            ..setting_from_mask(0b10101)
        };
        let lint = build_args(&setting, false);
        let format = build_args(&setting, true);
        assert_eq!(format[0], "--in-place");
        assert_eq!(&format[1..], lint.as_slice());
        assert!(!lint.contains(&"--in-place".to_string()));
    }

    #[test]
    fn test_parse_file_path_prefixes() {
        assert_eq!(parse_file_path("original/foo.py").unwrap(), PathBuf::from("foo.py"));
        assert_eq!(
            parse_file_path("fixed/pkg/foo.py").unwrap(),
            PathBuf::from("pkg/foo.py")
        );
        assert_eq!(
            parse_file_path("original/pkg/original/x.py").unwrap(),
            PathBuf::from("pkg/original/x.py")
        );
        let err = parse_file_path("a/foo.py").unwrap_err();
        assert!(matches!(err, Error::UnexpectedErrorFormat(p) if p == "a/foo.py"));
    }

    #[test]
    fn test_autoflake_output_maps_to_file() {
        let stdout = "\
--- original/foo.py
+++ fixed/foo.py
@@ -1,3 +1,2 @@
-import os
 import sys
 print(sys.path)
";
        let diags = parse_error_diffs(stdout, parse_file_path).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file_path, PathBuf::from("foo.py"));
        assert_eq!((diags[0].start_line, diags[0].end_line), (1, 1));
    }

    #[test]
    fn test_unexpected_prefix_fails() {
        let stdout = "--- before/foo.py\n+++ after/foo.py\n@@ -1 +0,0 @@\n-import os\n";
        let err = parse_error_diffs(stdout, parse_file_path).unwrap_err();
        assert!(matches!(err, Error::UnexpectedErrorFormat(_)));
    }

    #[test]
    fn test_command_args_are_relative_to_base_dir() {
        let paths = PathContext::new("/repo");
        let cmd = AutoflakeCommand::new(
            "autoflake",
            &paths,
            Source::default(),
            setting_from_mask(2),
            false,
        );
        let args = cmd.command_args(&[PathBuf::from("/repo/pkg/a.py")]);
        assert_eq!(
            args,
            vec![
                OsString::from("--remove-unused-variables"),
                OsString::from("pkg/a.py")
            ]
        );
    }

    #[test]
    fn test_command_args_with_dotted_relative_base() {
        let cmd = AutoflakeCommand::new(
            "autoflake",
            &PathContext::new("./repo"),
            Source::default(),
            AutoflakeSetting::default(),
            false,
        );
        let args = cmd.command_args(&[PathBuf::from("repo/pkg/a.py")]);
        assert_eq!(args, vec![OsString::from("pkg/a.py")]);
    }

    #[test]
    fn test_empty_file_set_spawns_nothing() {
        // The program must exist, but an empty tree means it is never run.
        let dir = tempfile::tempdir().unwrap();
        let program = std::env::current_exe().unwrap();
        let cmd = AutoflakeCommand::new(
            "autoflake",
            &PathContext::new(dir.path()),
            Source::default(),
            AutoflakeSetting::default(),
            true,
        )
        .with_program(program.to_string_lossy());
        let mut reporter = CollectingReporter::default();
        assert_eq!(cmd.run(&mut reporter).unwrap(), 0);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_missing_tool_is_fatal_even_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = AutoflakeCommand::new(
            "autoflake",
            &PathContext::new(dir.path()),
            Source::default(),
            AutoflakeSetting::default(),
            false,
        )
        .with_program("flakelint-missing-autoflake");
        let mut reporter = CollectingReporter::default();
        let err = cmd.run(&mut reporter).unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }
}

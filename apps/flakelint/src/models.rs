//! Shared data models for diagnostics and run reports.

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single finding attributed to a file and line range.
///
/// Diff-derived diagnostics carry the hunk body in `diff` and leave
/// `message` empty.
pub struct Diagnostic {
    pub file_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: Option<usize>,
    pub message: Option<String>,
    pub diff: Option<String>,
}

#[derive(Debug, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub files: usize,
    pub diagnostics: usize,
    pub exit_code: i32,
}

#[derive(Debug, Serialize)]
/// Result of running one command: exit code plus everything it reported.
pub struct RunReport {
    pub command: String,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: Summary,
}

impl RunReport {
    pub fn new(command: &str, exit_code: i32, diagnostics: Vec<Diagnostic>) -> Self {
        let mut files: Vec<&PathBuf> = diagnostics.iter().map(|d| &d.file_path).collect();
        files.sort();
        files.dedup();
        let summary = Summary {
            files: files.len(),
            diagnostics: diagnostics.len(),
            exit_code,
        };
        Self {
            command: command.to_string(),
            diagnostics,
            summary,
        }
    }

    pub fn success(&self) -> bool {
        self.summary.exit_code == 0
    }
}

//! External tool detection and blocking execution.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, warn};

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (-1 when the process was killed by a signal).
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Locate `command` on `PATH`, or accept it as an explicit path.
///
/// # Errors
///
/// Returns [`Error::CommandNotFound`] when the binary cannot be found.
pub fn check_command_installed(command: &str) -> Result<PathBuf> {
    match which::which(command) {
        Ok(path) => {
            // Absolute, since the child runs from another directory.
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            debug!("Tool '{command}' detected at: {}", path.display());
            Ok(path)
        }
        Err(_) => Err(Error::CommandNotFound {
            command: command.to_string(),
        }),
    }
}

/// Run `program` with `args` inside `cwd`, waiting for it to exit.
///
/// The working directory applies to the child only. Stderr lines are logged.
pub fn run<I, S>(program: &Path, args: I, cwd: &Path) -> Result<ProcessOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start = Instant::now();
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| Error::Spawn {
            command: program.display().to_string(),
            source,
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        warn!(target: "flakelint::tool", "{line}");
    }
    debug!(
        program = %program.display(),
        exit_code,
        duration_ms,
        "Tool finished"
    );

    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
        duration_ms,
    })
}

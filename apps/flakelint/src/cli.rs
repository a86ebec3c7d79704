//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flakelint",
    version,
    about = "Run autoflake as a lint/format plugin",
    long_about = "flakelint — run autoflake over a Python project and report the changes it would make as diagnostics.\n\nConfiguration precedence: CLI > flakelint.toml / [tool.flakelint] > defaults.",
    after_help = "Examples:\n  flakelint lint\n  flakelint lint --output json --diff\n  flakelint format --repo-root services/api",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone)]
/// Options shared by `lint` and `format`.
pub struct RunArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "autoflake executable (default: autoflake from PATH)")]
    pub program: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Print the diff hunk under each diagnostic")]
    pub diff: bool,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current flakelint version.")]
    Version,
    /// Check files without modifying them
    #[command(
        about = "Report what autoflake would change",
        long_about = "Run autoflake in check mode and report each diff hunk as a diagnostic. Files are not modified.",
        after_help = "Examples:\n  flakelint lint\n  flakelint lint --output json"
    )]
    Lint(RunArgs),
    /// Rewrite files in place
    #[command(
        about = "Apply autoflake in place",
        long_about = "Run autoflake with --in-place over the configured files.",
        after_help = "Examples:\n  flakelint format\n  flakelint format --program .venv/bin/autoflake"
    )]
    Format(RunArgs),
}

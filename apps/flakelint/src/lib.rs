//! flakelint core library.
//!
//! This crate adapts the `autoflake` command-line tool to a lint/format host:
//! it turns a small configuration record into autoflake flags, runs the tool
//! over a resolved file set, and maps the unified diff it prints back to
//! per-file diagnostics.
//!
//! High-level modules:
//! - `host`: Plugin/component/command traits the host drives.
//! - `autoflake`: The autoflake plugin, its setting and its command.
//! - `diff`: Unified diff parsing into diagnostics.
//! - `process`: Tool detection and blocking execution.
//! - `source`: Include/exclude path and glob resolution.
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Diagnostic and report structs.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `telemetry`: Tracing subscriber setup for the binary.
pub mod autoflake;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod host;
pub mod models;
pub mod output;
pub mod process;
pub mod source;
pub mod telemetry;

pub use autoflake::plugin;
pub use error::{Error, Result};

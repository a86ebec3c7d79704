//! Output rendering for lint and format runs.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-diagnostic fields and a top-level summary.

use crate::models::RunReport;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a run report in the requested format.
pub fn print_report(report: &RunReport, output: &str, show_diff: bool) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for d in &report.diagnostics {
                let location = if d.start_line == d.end_line {
                    format!("{}:{}", d.file_path.display(), d.start_line)
                } else {
                    format!("{}:{}-{}", d.file_path.display(), d.start_line, d.end_line)
                };
                let message = d
                    .message
                    .clone()
                    .unwrap_or_else(|| "would be rewritten".to_string());
                if color {
                    println!(
                        "{} {} ❲{}❳ — {}",
                        "✖".red(),
                        location.bold(),
                        report.command,
                        message
                    );
                } else {
                    println!("✖ {} ❲{}❳ — {}", location, report.command, message);
                }
                if show_diff {
                    if let Some(diff) = &d.diff {
                        for line in diff.lines() {
                            if !color {
                                println!("    {}", line);
                            } else if line.starts_with('-') {
                                println!("    {}", line.red());
                            } else if line.starts_with('+') {
                                println!("    {}", line.green());
                            } else {
                                println!("    {}", line.bright_black());
                            }
                        }
                    }
                }
            }
            let summary = format!(
                "— Summary — command={} diagnostics={} files={} exit={}",
                report.command,
                report.summary.diagnostics,
                report.summary.files,
                report.summary.exit_code
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose the report JSON object (pure) for testing purposes.
pub fn compose_report_json(report: &RunReport) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

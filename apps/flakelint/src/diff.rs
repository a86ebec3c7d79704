//! Unified diff parsing into line-range diagnostics.
//!
//! Tools that run in "check" mode often print the fix they would apply as a
//! unified diff. Each hunk becomes one [`Diagnostic`]:
//! - the range covers the first to last removed line in the source file;
//! - hunks that only add lines use the added lines' numbers in the target file.
//!
//! File paths are taken from the `---` header and mapped through a
//! caller-supplied parser, which is where tool-specific prefixes such as
//! `original/` are stripped. A parser error aborts the whole parse. Text that
//! is not a well-formed diff is logged and yields no diagnostics.

use crate::error::Result;
use crate::models::Diagnostic;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::warn;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid hunk header regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Context,
    Removed,
    Added,
    /// `\ No newline at end of file`; counts toward neither side.
    Marker,
}

#[derive(Debug)]
struct HunkLine {
    kind: LineKind,
    text: String,
    source_line_no: Option<usize>,
    target_line_no: Option<usize>,
}

impl HunkLine {
    fn render(&self) -> String {
        let prefix = match self.kind {
            LineKind::Context => ' ',
            LineKind::Removed => '-',
            LineKind::Added => '+',
            LineKind::Marker => '\\',
        };
        format!("{}{}", prefix, self.text)
    }
}

#[derive(Debug)]
struct Hunk {
    lines: Vec<HunkLine>,
}

impl Hunk {
    /// Line range touched by this hunk, preferring source line numbers.
    fn changed_range(&self) -> Option<(usize, usize)> {
        let removed: Vec<usize> = self
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Removed)
            .filter_map(|l| l.source_line_no)
            .collect();
        if let (Some(first), Some(last)) = (removed.first(), removed.last()) {
            return Some((*first, *last));
        }
        let added: Vec<usize> = self
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .filter_map(|l| l.target_line_no)
            .collect();
        match (added.first(), added.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    fn body(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
        out
    }
}

#[derive(Debug)]
struct Patch {
    source_file: String,
    hunks: Vec<Hunk>,
}

/// Hunk currently being filled, with the line counts still expected.
struct OpenHunk {
    hunk: Hunk,
    source_left: usize,
    target_left: usize,
    next_source: usize,
    next_target: usize,
}

impl OpenHunk {
    fn is_complete(&self) -> bool {
        self.source_left == 0 && self.target_left == 0
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ParseError {
    line_no: usize,
    message: String,
}

fn header_path(rest: &str) -> String {
    // Drop an optional tab-separated timestamp.
    rest.split('\t').next().unwrap_or(rest).trim_end().to_string()
}

fn parse_count(cap: Option<regex::Match<'_>>) -> usize {
    cap.and_then(|m| m.as_str().parse().ok()).unwrap_or(1)
}

fn parse_patches(text: &str) -> std::result::Result<Vec<Patch>, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut patches: Vec<Patch> = Vec::new();
    let mut open: Option<OpenHunk> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;

        if let Some(cur) = open.as_mut() {
            if let Some(rest) = line.strip_prefix('\\') {
                cur.hunk.lines.push(HunkLine {
                    kind: LineKind::Marker,
                    text: rest.to_string(),
                    source_line_no: None,
                    target_line_no: None,
                });
                i += 1;
                continue;
            }
            if !cur.is_complete() {
                let (kind, body) = match line.chars().next() {
                    Some(' ') => (LineKind::Context, &line[1..]),
                    Some('-') => (LineKind::Removed, &line[1..]),
                    Some('+') => (LineKind::Added, &line[1..]),
                    // Some producers strip the single space of empty context lines.
                    None => (LineKind::Context, ""),
                    Some(_) => {
                        return Err(ParseError {
                            line_no,
                            message: format!("unexpected line inside hunk: {:?}", line),
                        })
                    }
                };
                let mut hunk_line = HunkLine {
                    kind,
                    text: body.to_string(),
                    source_line_no: None,
                    target_line_no: None,
                };
                if kind != LineKind::Added {
                    if cur.source_left == 0 {
                        return Err(ParseError {
                            line_no,
                            message: "hunk has more source lines than declared".into(),
                        });
                    }
                    hunk_line.source_line_no = Some(cur.next_source);
                    cur.next_source += 1;
                    cur.source_left -= 1;
                }
                if kind != LineKind::Removed {
                    if cur.target_left == 0 {
                        return Err(ParseError {
                            line_no,
                            message: "hunk has more target lines than declared".into(),
                        });
                    }
                    hunk_line.target_line_no = Some(cur.next_target);
                    cur.next_target += 1;
                    cur.target_left -= 1;
                }
                cur.hunk.lines.push(hunk_line);
                i += 1;
                continue;
            }
        }

        // A finished hunk belongs to the most recent patch.
        if let Some(done) = open.take() {
            if let Some(patch) = patches.last_mut() {
                patch.hunks.push(done.hunk);
            }
        }

        if line.starts_with('\\') {
            i += 1;
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            if let Some(next) = lines.get(i + 1) {
                if next.starts_with("+++ ") {
                    patches.push(Patch {
                        source_file: header_path(rest),
                        hunks: Vec::new(),
                    });
                    i += 2;
                    continue;
                }
            }
        }

        if line.starts_with("@@") {
            let caps = HUNK_HEADER.captures(line).ok_or_else(|| ParseError {
                line_no,
                message: format!("malformed hunk header: {:?}", line),
            })?;
            if patches.is_empty() {
                return Err(ParseError {
                    line_no,
                    message: "hunk header before any file header".into(),
                });
            }
            let source_start: usize = caps[1].parse().unwrap_or(0);
            let target_start: usize = caps[3].parse().unwrap_or(0);
            open = Some(OpenHunk {
                hunk: Hunk { lines: Vec::new() },
                source_left: parse_count(caps.get(2)),
                target_left: parse_count(caps.get(4)),
                next_source: source_start,
                next_target: target_start,
            });
            i += 1;
            continue;
        }

        // Anything else outside a hunk (preamble, `diff` lines) is skipped.
        i += 1;
    }

    if let Some(cur) = open.take() {
        if !cur.is_complete() {
            return Err(ParseError {
                line_no: lines.len(),
                message: "hunk is shorter than its header declares".into(),
            });
        }
        if let Some(patch) = patches.last_mut() {
            patch.hunks.push(cur.hunk);
        }
    }

    Ok(patches)
}

/// Parse unified diff text into one diagnostic per hunk.
///
/// `file_path_parser` maps the `---` header path to the reported file path.
/// Its errors are returned unchanged; malformed diff text is only logged.
pub fn parse_error_diffs<F>(errors: &str, file_path_parser: F) -> Result<Vec<Diagnostic>>
where
    F: Fn(&str) -> Result<PathBuf>,
{
    let patches = match parse_patches(errors) {
        Ok(p) => p,
        Err(e) => {
            warn!(
                line = e.line_no,
                "Failed to parse diff output ({}); no diagnostics reported", e.message
            );
            return Ok(Vec::new());
        }
    };

    let mut diagnostics = Vec::new();
    for patch in patches {
        if patch.hunks.is_empty() {
            continue;
        }
        let file_path = match file_path_parser(&patch.source_file) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %patch.source_file, "Unexpected diff header path");
                return Err(e);
            }
        };
        for hunk in &patch.hunks {
            let Some((start_line, end_line)) = hunk.changed_range() else {
                continue;
            };
            diagnostics.push(Diagnostic {
                file_path: file_path.clone(),
                start_line,
                end_line,
                start_column: Some(1),
                message: None,
                diff: Some(hunk.body()),
            });
        }
    }
    Ok(diagnostics)
}

//! Target file selection from include/exclude paths and globs.
//!
//! A [`Source`] is the filter record a component carries. Resolution walks
//! the included directories below a base directory, adds glob matches, then
//! drops anything under an excluded path or matching an exclude glob. Hidden
//! files and directories are never matched by directory walks or globs.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Predicate deciding which files a tool can handle.
pub type FileFilter = fn(&Path) -> bool;

/// Accepts Python sources and stubs.
pub fn python_file_filter(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("py") | Some("pyi")
    )
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    includes: Vec<PathBuf>,
    excludes: Vec<PathBuf>,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

impl Source {
    /// Without any include path or glob, the whole base directory is included.
    pub fn new(
        includes: Option<Vec<PathBuf>>,
        excludes: Option<Vec<PathBuf>>,
        include_globs: Option<Vec<String>>,
        exclude_globs: Option<Vec<String>>,
    ) -> Self {
        let mut includes = includes.unwrap_or_default();
        let include_globs = include_globs.unwrap_or_default();
        if includes.is_empty() && include_globs.is_empty() {
            includes.push(PathBuf::from("."));
        }
        Self {
            includes,
            excludes: excludes.unwrap_or_default(),
            include_globs,
            exclude_globs: exclude_globs.unwrap_or_default(),
        }
    }

    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    /// Resolve matching files below `base_dir`, sorted and deduplicated.
    ///
    /// Results are absolute when `base_dir` is, otherwise relative to the
    /// same directory `base_dir` is relative to. Exclude globs are matched
    /// against paths relative to `base_dir`.
    pub fn resolve(&self, base_dir: &Path, filter: FileFilter) -> Result<Vec<PathBuf>> {
        let base_dir = normalize(base_dir);
        let base_dir = base_dir.as_path();
        let mut found: BTreeSet<PathBuf> = BTreeSet::new();

        for inc in &self.includes {
            let path = normalize(&base_dir.join(inc));
            if path.is_file() {
                found.insert(path);
            } else if path.is_dir() {
                let pattern = format!("{}/**/*", Pattern::escape(&path.to_string_lossy()));
                collect_glob(&pattern, &mut found)?;
            } else {
                debug!(path = %path.display(), "Include path does not exist");
            }
        }
        for pat in &self.include_globs {
            let pattern = format!("{}/{}", Pattern::escape(&base_dir.to_string_lossy()), pat);
            collect_glob(&pattern, &mut found)?;
        }

        let excludes: Vec<PathBuf> = self
            .excludes
            .iter()
            .map(|p| normalize(&base_dir.join(p)))
            .collect();
        let exclude_globs = self
            .exclude_globs
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| Error::Glob {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(found
            .into_iter()
            .filter(|p| p.is_file() && filter(p))
            .filter(|p| !is_hidden(relative_to(p, base_dir)))
            .filter(|p| !excludes.iter().any(|ex| p.starts_with(ex)))
            .filter(|p| {
                let rel = relative_to(p, base_dir);
                !exclude_globs
                    .iter()
                    .any(|g| g.matches_path_with(rel, MATCH_OPTIONS))
            })
            .collect())
    }
}

fn collect_glob(pattern: &str, found: &mut BTreeSet<PathBuf>) -> Result<()> {
    let paths = glob::glob_with(pattern, MATCH_OPTIONS).map_err(|source| Error::Glob {
        pattern: pattern.to_string(),
        source,
    })?;
    for entry in paths.flatten() {
        found.insert(normalize(&entry));
    }
    Ok(())
}

/// `path` below `base`; a base of `.` leaves it unchanged.
fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn is_hidden(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Drop `.` components so joined paths compare equal to globbed ones.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let out: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

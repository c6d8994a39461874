//! Content unit discovery by filesystem walking.
//!
//! Discovery is separate from building: the scanner only finds `.md` files
//! and computes their routes. Nothing is read at this stage.

use std::fs;
use std::path::{Path, PathBuf};

use quire_nav::RoutePath;

/// One markdown source file under the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Path relative to the content directory, `/`-separated (e.g. `framework/routing.md`).
    pub relative_path: String,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Route the unit is served under.
    pub route: RoutePath,
}

/// Walks a content directory for markdown files.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    /// Create a scanner rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Scan the content directory.
    ///
    /// Units come back sorted by relative path. Hidden files and directories
    /// are skipped. Returns an empty Vec if the directory doesn't exist.
    #[must_use]
    pub fn scan(&self) -> Vec<ContentUnit> {
        let mut units = Vec::new();
        if self.source_dir.is_dir() {
            Self::scan_directory(&self.source_dir, "", &mut units);
        }
        units.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        units
    }

    fn scan_directory(dir_path: &Path, prefix: &str, units: &mut Vec<ContentUnit>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            tracing::warn!(dir = %dir_path.display(), "Unreadable content directory");
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let path = entry.path();

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                Self::scan_directory(&path, &relative, units);
            } else if path.extension().is_some_and(|e| e == "md") {
                units.push(ContentUnit {
                    route: route_for(&relative),
                    relative_path: relative,
                    path,
                });
            }
        }
    }
}

/// Route of a content unit.
///
/// - `index.md` → `/`
/// - `guide.md` → `/guide`
/// - `framework/index.md` → `/framework`
/// - `framework/routing.md` → `/framework/routing`
#[must_use]
pub fn route_for(relative_path: &str) -> RoutePath {
    let without_ext = relative_path
        .strip_suffix(".md")
        .unwrap_or(relative_path);
    let path_part = if without_ext == "index" {
        ""
    } else if let Some(dir) = without_ext.strip_suffix("/index") {
        dir
    } else {
        without_ext
    };
    RoutePath::normalize(&format!("/{path_part}"))
}

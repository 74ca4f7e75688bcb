//! Path utilities for module specifiers and the filesystem.

use std::path::{Component, Path, PathBuf};

/// Joins a module specifier prefix with a relative subpath lexically.
///
/// `.` segments are dropped, `..` pops the previous segment and a trailing
/// `/` on `sub` is preserved. No filesystem access happens.
///
/// # Examples
///
/// ```
/// use frontlint_core::utils::paths::join_specifier;
///
/// assert_eq!(join_specifier("pkg", "./feature"), "pkg/feature");
/// assert_eq!(join_specifier("pkg", "."), "pkg");
/// assert_eq!(join_specifier("pkg", "./a/../b/"), "pkg/b/");
/// ```
#[must_use]
pub fn join_specifier(base: &str, sub: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in sub.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut joined = segments.join("/");
    if sub.ends_with('/') && !joined.is_empty() {
        joined.push('/');
    }
    joined
}

/// Returns true for `./x`, `../x`, `.` and `..` specifiers.
#[must_use]
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Returns true if `path` has a `node_modules` component.
#[must_use]
pub fn is_in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(s) if s == "node_modules"))
}

/// Searches `start` and its ancestors for a file called `file_name`.
///
/// `start` may be a file; the search then begins in its directory.
#[must_use]
pub fn find_upwards(start: &Path, file_name: &str) -> Option<PathBuf> {
    let first = if start.is_dir() { Some(start) } else { start.parent() };
    first?
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

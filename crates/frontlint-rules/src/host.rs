//! Module resolution and manifest lookup.
//!
//! Boundary checks need two services from the environment: resolving an
//! import specifier to a real path, and finding the manifest that owns a
//! path. They are traits so the checks can run against an in-memory host in
//! tests and against the filesystem ([`FsHost`]) in production.

use std::fs;
use std::path::{Path, PathBuf};

use frontlint_core::utils::paths::{find_upwards, is_relative_specifier};
use frontlint_core::MANIFEST_FILE_NAME;
use tracing::debug;

use crate::manifest::Manifest;

/// A parsed manifest and the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedManifest {
    /// Path of the `package.json`.
    pub path: PathBuf,
    /// Parsed contents.
    pub manifest: Manifest,
}

/// Resolves import specifiers to real paths.
pub trait ModuleResolver: Send + Sync {
    /// Resolves `specifier` as imported from the file `from`.
    ///
    /// Returns the real (symlink-free) path, or `None` if the specifier does
    /// not resolve.
    fn resolve(&self, specifier: &str, from: &Path) -> Option<PathBuf>;
}

/// Finds the manifest that owns a path.
pub trait ManifestLookup: Send + Sync {
    /// Returns the nearest `package.json` at or above `path`.
    fn nearest_manifest(&self, path: &Path) -> Option<LocatedManifest>;
}

/// Everything boundary resolution needs from the environment.
pub trait PackageHost: ModuleResolver + ManifestLookup {}

impl<T: ModuleResolver + ManifestLookup> PackageHost for T {}

/// Splits a bare specifier into package name and remaining subpath.
///
/// The subpath keeps its leading `/`; it is empty for a package root.
/// Relative and absolute specifiers yield `None`.
///
/// ```
/// use frontlint_rules::host::split_package_specifier;
///
/// assert_eq!(split_package_specifier("@scope/pkg/a/b"), Some(("@scope/pkg", "/a/b")));
/// assert_eq!(split_package_specifier("lodash"), Some(("lodash", "")));
/// assert_eq!(split_package_specifier("./local"), None);
/// ```
#[must_use]
pub fn split_package_specifier(specifier: &str) -> Option<(&str, &str)> {
    if specifier.is_empty() || is_relative_specifier(specifier) || specifier.starts_with('/') {
        return None;
    }
    let name_end = if specifier.starts_with('@') {
        let scope_end = specifier.find('/')?;
        specifier[scope_end + 1..]
            .find('/')
            .map_or(specifier.len(), |i| scope_end + 1 + i)
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };
    Some(specifier.split_at(name_end))
}

const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".jsx", ".ts", ".tsx", ".json"];

/// Node-style resolution against the real filesystem.
///
/// Relative specifiers are probed with each extension and as directories
/// (`main` field, then `index.*`). Bare specifiers are looked up in
/// `node_modules` directories from the importer upwards. Results are
/// canonicalized, so a workspace package linked into `node_modules`
/// resolves to its source location.
#[derive(Debug, Clone)]
pub struct FsHost {
    extensions: Vec<String>,
}

impl Default for FsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FsHost {
    /// Creates a host probing the JavaScript and TypeScript extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    /// Replaces the probed extensions (with leading dot).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn resolve_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        let raw = path.as_os_str().to_string_lossy();
        self.extensions
            .iter()
            .map(|ext| PathBuf::from(format!("{raw}{ext}")))
            .find(|candidate| candidate.is_file())
    }

    fn resolve_dir(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        let main = read_manifest(&manifest_path).and_then(|m| m.main);
        main.and_then(|main| {
            let target = dir.join(main);
            self.resolve_file(&target)
                .or_else(|| self.resolve_index(&target))
        })
        .or_else(|| self.resolve_index(dir))
        .or_else(|| manifest_path.is_file().then_some(manifest_path))
    }

    fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        self.resolve_file(&dir.join("index"))
            .filter(|_| dir.is_dir())
    }

    fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        self.resolve_file(path).or_else(|| self.resolve_dir(path))
    }

    fn resolve_bare(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let (name, rest) = split_package_specifier(specifier)?;
        from_dir.ancestors().find_map(|dir| {
            let package_dir = dir.join("node_modules").join(name);
            if !package_dir.is_dir() {
                return None;
            }
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                self.resolve_dir(&package_dir)
            } else {
                self.resolve_path(&package_dir.join(rest))
            }
        })
    }
}

impl ModuleResolver for FsHost {
    fn resolve(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        let from_dir = from.parent().unwrap_or(Path::new("."));
        let found = if is_relative_specifier(specifier) {
            self.resolve_path(&from_dir.join(specifier))
        } else if Path::new(specifier).is_absolute() {
            self.resolve_path(Path::new(specifier))
        } else {
            self.resolve_bare(specifier, from_dir)
        };
        let real = found.and_then(|p| p.canonicalize().ok());
        if real.is_none() {
            debug!(specifier, from = %from.display(), "specifier did not resolve");
        }
        real
    }
}

impl ManifestLookup for FsHost {
    fn nearest_manifest(&self, path: &Path) -> Option<LocatedManifest> {
        let manifest_path = find_upwards(path, MANIFEST_FILE_NAME)?;
        let manifest = read_manifest(&manifest_path)?;
        Some(LocatedManifest {
            path: manifest_path,
            manifest,
        })
    }
}

fn read_manifest(path: &Path) -> Option<Manifest> {
    let text = fs::read_to_string(path).ok()?;
    match Manifest::from_json(&text) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "unreadable manifest");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory host for boundary tests.

    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub(crate) struct MemoryHost {
        resolutions: HashMap<String, PathBuf>,
        manifests: Vec<LocatedManifest>,
    }

    impl MemoryHost {
        pub(crate) fn resolve_to(mut self, specifier: &str, path: &str) -> Self {
            self.resolutions
                .insert(specifier.to_string(), PathBuf::from(path));
            self
        }

        pub(crate) fn manifest(mut self, path: &str, json: &str) -> Self {
            self.manifests.push(LocatedManifest {
                path: PathBuf::from(path),
                manifest: Manifest::from_json(json).unwrap(),
            });
            self
        }
    }

    impl ModuleResolver for MemoryHost {
        fn resolve(&self, specifier: &str, _from: &Path) -> Option<PathBuf> {
            self.resolutions.get(specifier).cloned()
        }
    }

    impl ManifestLookup for MemoryHost {
        fn nearest_manifest(&self, path: &Path) -> Option<LocatedManifest> {
            path.ancestors().find_map(|dir| {
                self.manifests
                    .iter()
                    .find(|m| m.path.parent() == Some(dir))
                    .cloned()
            })
        }
    }
}

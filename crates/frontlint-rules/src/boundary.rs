//! Package boundary resolution.
//!
//! Decides whether a bare import like `@scope/pkg/src/internal` reaches
//! into another workspace package past its declared `exports` map.

use std::path::Path;

use frontlint_core::utils::paths::{is_in_node_modules, is_relative_specifier, join_specifier};
use tracing::trace;

use crate::host::PackageHost;
use crate::manifest::ExportSurface;

/// Why a specifier was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Relative or absolute path.
    NotBare,
    /// The specifier does not resolve.
    Unresolved,
    /// No manifest owns the resolved file.
    NoManifest,
    /// The owning manifest has no name.
    Unnamed,
    /// The specifier is the package name itself.
    PackageRoot,
    /// The specifier does not start with the owning package's name, e.g. a
    /// file vendored inside another package.
    ForeignPackage,
    /// Importer and imported file belong to the same package.
    SamePackage,
    /// The package resolves into `node_modules` rather than a workspace
    /// location; it is a third-party install, not a workspace package.
    Installed,
}

/// Outcome of a boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to check.
    Skipped(SkipReason),
    /// The subpath is covered by the package's `exports` map.
    Exported,
    /// The package declares no `exports` map, so no subpath is public.
    NoExportMap {
        /// Package name.
        package: String,
    },
    /// The `exports` map does not list the subpath.
    NotExported {
        /// Package name.
        package: String,
        /// Package-relative subpath, e.g. `./src/internal`.
        subpath: String,
    },
}

impl Verdict {
    /// Returns true if the import crosses a package boundary illegally.
    #[must_use]
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::NoExportMap { .. } | Self::NotExported { .. })
    }
}

/// Returns true if an `exports` key admits `specifier` of package `name`.
///
/// Keys are joined onto the package name. A trailing `*` or `/` on the key
/// matches any specifier with that prefix; any other key must match exactly.
/// Condition maps (`import`, `require`, `default`) are not expanded: a
/// top-level condition key is compared like a subpath, e.g. `pkg/import`.
#[must_use]
pub fn export_key_matches(name: &str, key: &str, specifier: &str) -> bool {
    let joined = join_specifier(name, key);
    if let Some(prefix) = joined.strip_suffix('*') {
        specifier.starts_with(prefix)
    } else if joined.ends_with('/') {
        specifier.starts_with(&joined)
    } else {
        joined == specifier
    }
}

/// Checks bare imports against the exports map of the package they reach.
pub struct BoundaryResolver<'h> {
    host: &'h dyn PackageHost,
}

impl std::fmt::Debug for BoundaryResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryResolver").finish_non_exhaustive()
    }
}

impl<'h> BoundaryResolver<'h> {
    /// Creates a resolver over `host`.
    #[must_use]
    pub fn new(host: &'h dyn PackageHost) -> Self {
        Self { host }
    }

    /// Checks `specifier` as imported from the file `from`.
    #[must_use]
    pub fn check(&self, specifier: &str, from: &Path) -> Verdict {
        let verdict = self.evaluate(specifier, from);
        trace!(specifier, ?verdict, "boundary check");
        verdict
    }

    fn evaluate(&self, specifier: &str, from: &Path) -> Verdict {
        if is_relative_specifier(specifier) || Path::new(specifier).is_absolute() {
            return Verdict::Skipped(SkipReason::NotBare);
        }
        let Some(resolved) = self.host.resolve(specifier, from) else {
            return Verdict::Skipped(SkipReason::Unresolved);
        };
        let Some(imported) = self.host.nearest_manifest(&resolved) else {
            return Verdict::Skipped(SkipReason::NoManifest);
        };
        let importing = self.host.nearest_manifest(from);
        let Some(name) = imported.manifest.name.as_deref() else {
            return Verdict::Skipped(SkipReason::Unnamed);
        };

        if specifier == name {
            return Verdict::Skipped(SkipReason::PackageRoot);
        }
        if !specifier.starts_with(&format!("{name}/")) {
            return Verdict::Skipped(SkipReason::ForeignPackage);
        }
        if importing.is_some_and(|m| m.path == imported.path) {
            return Verdict::Skipped(SkipReason::SamePackage);
        }
        match self.host.resolve(name, from) {
            None => return Verdict::Skipped(SkipReason::Unresolved),
            Some(root) if is_in_node_modules(&root) => {
                return Verdict::Skipped(SkipReason::Installed)
            }
            Some(_) => {}
        }

        match imported.manifest.export_surface() {
            ExportSurface::Absent | ExportSurface::Legacy(_) => Verdict::NoExportMap {
                package: name.to_string(),
            },
            ExportSurface::Map(keys) => {
                if keys
                    .iter()
                    .any(|key| export_key_matches(name, key, specifier))
                {
                    Verdict::Exported
                } else {
                    Verdict::NotExported {
                        package: name.to_string(),
                        subpath: format!(".{}", &specifier[name.len()..]),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;

    const APP: &str = "/repo/packages/app/src/index.js";

    fn workspace() -> MemoryHost {
        MemoryHost::default()
            .manifest("/repo/packages/app/package.json", r#"{ "name": "app" }"#)
            .manifest(
                "/repo/packages/ui/package.json",
                r#"{ "name": "@acme/ui", "exports": { ".": "./index.js", "./button": "./src/button.js", "./icons/*": "./src/icons/*.js" } }"#,
            )
            .manifest(
                "/repo/packages/legacy/package.json",
                r#"{ "name": "legacy", "exports": "./index.js" }"#,
            )
            .manifest("/repo/packages/plain/package.json", r#"{ "name": "plain", "main": "index.js" }"#)
            .resolve_to("@acme/ui", "/repo/packages/ui/index.js")
            .resolve_to("@acme/ui/button", "/repo/packages/ui/src/button.js")
            .resolve_to("@acme/ui/icons/star", "/repo/packages/ui/src/icons/star.js")
            .resolve_to("@acme/ui/src/internal", "/repo/packages/ui/src/internal.js")
            .resolve_to("legacy", "/repo/packages/legacy/index.js")
            .resolve_to("legacy/lib/a", "/repo/packages/legacy/lib/a.js")
            .resolve_to("plain", "/repo/packages/plain/index.js")
            .resolve_to("plain/util", "/repo/packages/plain/util.js")
    }

    fn check(host: &MemoryHost, specifier: &str, from: &str) -> Verdict {
        BoundaryResolver::new(host).check(specifier, Path::new(from))
    }

    #[test]
    fn exported_subpaths_pass() {
        let host = workspace();
        assert_eq!(check(&host, "@acme/ui/button", APP), Verdict::Exported);
        assert_eq!(check(&host, "@acme/ui/icons/star", APP), Verdict::Exported);
    }

    #[test]
    fn unexported_subpath_is_reported() {
        let host = workspace();
        let verdict = check(&host, "@acme/ui/src/internal", APP);
        assert_eq!(
            verdict,
            Verdict::NotExported {
                package: "@acme/ui".into(),
                subpath: "./src/internal".into()
            }
        );
        assert!(verdict.is_violation());
    }

    #[test]
    fn packages_without_export_map() {
        let host = workspace();
        assert_eq!(
            check(&host, "legacy/lib/a", APP),
            Verdict::NoExportMap { package: "legacy".into() }
        );
        assert_eq!(
            check(&host, "plain/util", APP),
            Verdict::NoExportMap { package: "plain".into() }
        );
    }

    #[test]
    fn skips() {
        let host = workspace();
        assert_eq!(check(&host, "./local", APP), Verdict::Skipped(SkipReason::NotBare));
        assert_eq!(check(&host, "/abs/x", APP), Verdict::Skipped(SkipReason::NotBare));
        assert_eq!(check(&host, "nowhere/x", APP), Verdict::Skipped(SkipReason::Unresolved));
        assert_eq!(check(&host, "@acme/ui", APP), Verdict::Skipped(SkipReason::PackageRoot));
        assert_eq!(
            check(&host, "@acme/ui/src/internal", "/repo/packages/ui/src/button.js"),
            Verdict::Skipped(SkipReason::SamePackage)
        );
    }

    #[test]
    fn installed_copies_are_skipped() {
        let host = MemoryHost::default()
            .manifest("/repo/app/package.json", r#"{ "name": "app" }"#)
            .manifest("/repo/node_modules/dep/package.json", r#"{ "name": "dep" }"#)
            .resolve_to("dep", "/repo/node_modules/dep/index.js")
            .resolve_to("dep/lib/x", "/repo/node_modules/dep/lib/x.js");
        assert_eq!(
            check(&host, "dep/lib/x", "/repo/app/a.js"),
            Verdict::Skipped(SkipReason::Installed)
        );
    }

    #[test]
    fn foreign_and_unnamed_owners_are_skipped() {
        let host = MemoryHost::default()
            .manifest("/repo/app/package.json", r#"{ "name": "app" }"#)
            .manifest("/repo/vendor/package.json", r#"{ "name": "vendor-bundle" }"#)
            .manifest("/repo/anon/package.json", r#"{ "private": true }"#)
            .resolve_to("shim/x", "/repo/vendor/shim/x.js")
            .resolve_to("anon/x", "/repo/anon/x.js");
        assert_eq!(
            check(&host, "shim/x", "/repo/app/a.js"),
            Verdict::Skipped(SkipReason::ForeignPackage)
        );
        assert_eq!(
            check(&host, "anon/x", "/repo/app/a.js"),
            Verdict::Skipped(SkipReason::Unnamed)
        );
    }

    #[test]
    fn export_key_matching() {
        assert!(export_key_matches("pkg", "./a", "pkg/a"));
        assert!(!export_key_matches("pkg", "./a", "pkg/a/b"));
        assert!(export_key_matches("pkg", "./features/*", "pkg/features/x/y"));
        assert!(export_key_matches("pkg", "./*", "pkg/anything"));
        assert!(export_key_matches("pkg", "./lib/", "pkg/lib/x"));
        assert!(!export_key_matches("pkg", ".", "pkg/x"));
        assert!(!export_key_matches("pkg", "import", "pkg/lib/x"));
        assert!(!export_key_matches("pkg", "default", "pkg/lib/x"));
    }
}

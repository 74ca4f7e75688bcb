//! Rule to forbid importing another package's internals.
//!
//! # Rationale
//!
//! A workspace package's public surface is its `exports` map. Deep imports
//! like `@acme/ui/src/button` bypass it and break when the package moves
//! files around.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD: not listed in @acme/ui's exports
//! import { Button } from '@acme/ui/src/button';
//! export * from '@acme/ui/src/theme';
//!
//! // BAD: legacy has no exports map at all
//! import helper from 'legacy/lib/helper';
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! import { Button } from '@acme/ui';
//! import { Icon } from '@acme/ui/icons/star'; // matches "./icons/*"
//! ```

use std::fmt;
use std::sync::Arc;

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Node, Rule, Severity};

use crate::boundary::{BoundaryResolver, Verdict};
use crate::host::{FsHost, PackageHost};

/// Rule code for no-pkg-dir-import.
pub const CODE: &str = "FL008";

/// Rule name for no-pkg-dir-import.
pub const NAME: &str = "frontlint/no-pkg-dir-import";

/// Reports imports that reach past a workspace package's exports map.
#[derive(Clone)]
pub struct NoPkgDirImport {
    /// Custom severity.
    pub severity: Severity,
    host: Arc<dyn PackageHost>,
}

impl fmt::Debug for NoPkgDirImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoPkgDirImport")
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl Default for NoPkgDirImport {
    fn default() -> Self {
        Self::new()
    }
}

impl NoPkgDirImport {
    /// Creates a rule that resolves against the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::with_host(Arc::new(FsHost::new()))
    }

    /// Creates a rule over a custom resolution host.
    #[must_use]
    pub fn with_host(host: Arc<dyn PackageHost>) -> Self {
        Self {
            severity: Severity::Error,
            host,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoPkgDirImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids importing package subpaths not declared in its exports map"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                "noExportsCfg",
                "Package '{{pkg}}' declares no exports map; import it by its name only.",
            ),
            (
                "invalidSubpath",
                "Subpath '{{subpath}}' is not exported by package '{{pkg}}'.",
            ),
        ]
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let resolver = BoundaryResolver::new(self.host.as_ref());
        let mut diagnostics = Vec::new();
        for id in ast.descendants(ast.root()) {
            let source = match ast.node(id) {
                Node::ImportDeclaration { source, .. } => *source,
                Node::ExportDeclaration {
                    source: Some(source),
                    ..
                } => *source,
                _ => continue,
            };
            let Some(specifier) = ast.node(source).string_value() else {
                continue;
            };
            let diagnostic = match resolver.check(specifier, ctx.path) {
                Verdict::NoExportMap { package } => ctx.report(
                    self,
                    ast,
                    source,
                    "noExportsCfg",
                    MessageData::new().with("pkg", package),
                ),
                Verdict::NotExported { package, subpath } => ctx.report(
                    self,
                    ast,
                    source,
                    "invalidSubpath",
                    MessageData::new()
                        .with("subpath", subpath)
                        .with("pkg", package),
                ),
                Verdict::Exported | Verdict::Skipped(_) => continue,
            };
            diagnostics.push(diagnostic);
        }
        diagnostics
    }
}

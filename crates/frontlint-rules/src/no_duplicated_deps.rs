//! Rule to forbid declaring a package as both runtime and dev dependency.
//!
//! # Rationale
//!
//! A package listed in both sections has two declared ranges that drift
//! apart. It belongs in exactly one of them.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD
//! { "dependencies": { "react": "^18" }, "devDependencies": { "react": "^18" } }
//! ```

use std::collections::BTreeSet;

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Rule, Severity};

use crate::manifest::{DependencyKind, ManifestTree};

/// Rule code for no-duplicated-deps.
pub const CODE: &str = "FL005";

/// Rule name for no-duplicated-deps.
pub const NAME: &str = "frontlint/no-duplicated-deps";

/// Forbids names present in both `dependencies` and `devDependencies`.
#[derive(Debug, Clone)]
pub struct NoDuplicatedDeps {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoDuplicatedDeps {
    fn default() -> Self {
        Self::new()
    }
}

impl NoDuplicatedDeps {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoDuplicatedDeps {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids a package in both dependencies and devDependencies"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "duplicatedDep",
            "'{{name}}' is declared in both dependencies and devDependencies.",
        )]
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        if !ctx.is_manifest() {
            return Vec::new();
        }
        let Some(manifest) = ManifestTree::locate(ast) else {
            return Vec::new();
        };
        let dev: BTreeSet<String> = manifest
            .dependencies(DependencyKind::Dev)
            .into_iter()
            .map(|entry| entry.name)
            .collect();

        let mut seen = BTreeSet::new();
        manifest
            .dependencies(DependencyKind::Runtime)
            .into_iter()
            .filter(|entry| dev.contains(&entry.name) && seen.insert(entry.name.clone()))
            .map(|entry| {
                ctx.report(
                    self,
                    ast,
                    entry.property,
                    "duplicatedDep",
                    MessageData::new().with("name", &entry.name),
                )
            })
            .collect()
    }
}

//! Rule to block dependencies by name or version range.
//!
//! # Rationale
//!
//! Some packages are banned outright in the monorepo, others only in
//! certain versions (a known-broken release line, a major that is not yet
//! supported). The blocklist lives in the rule options.
//!
//! # Configuration
//!
//! ```toml
//! [rules."frontlint/package-disallow-deps"]
//! blocklist = [
//!     "moment",                                  # any version
//!     ["react", "<17", "Upgrade to React 18."],  # name, blocked range, tip
//! ]
//! ```
//!
//! A declared range is reported when it shares any version with the blocked
//! range. Declared ranges that are not semver (`latest`, git URLs) are
//! skipped; `workspace:` prefixes are stripped first.

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Rule, Severity};
use serde::Deserialize;
use tracing::debug;

use crate::manifest::{DependencyEntry, DependencyKind, ManifestTree};
use crate::semver_range::VersionRange;

/// Rule code for package-disallow-deps.
pub const CODE: &str = "FL006";

/// Rule name for package-disallow-deps.
pub const NAME: &str = "frontlint/package-disallow-deps";

/// One blocklist entry as written in the options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlockEntry {
    /// Package name; every version is blocked.
    Name(String),
    /// `[name, range?, tip?]`.
    Tuple(Vec<Option<String>>),
}

/// A normalized blocklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    /// Package name.
    pub name: String,
    /// Blocked range; `None` blocks every version.
    pub range: Option<String>,
    /// Advice appended to the message.
    pub tip: Option<String>,
}

impl BlockEntry {
    /// Normalizes the entry. Tuples without a name yield `None`.
    #[must_use]
    pub fn to_rule(&self) -> Option<BlockRule> {
        match self {
            Self::Name(name) => Some(BlockRule {
                name: name.clone(),
                range: None,
                tip: None,
            }),
            Self::Tuple(parts) => {
                let mut parts = parts.iter().cloned();
                let name = parts.next().flatten()?;
                Some(BlockRule {
                    name,
                    range: parts.next().flatten().filter(|r| !r.trim().is_empty()),
                    tip: parts.next().flatten(),
                })
            }
        }
    }
}

/// Options for [`PackageDisallowDeps`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisallowOptions {
    /// Blocked packages.
    pub blocklist: Vec<BlockEntry>,
}

/// Reports dependencies that match the configured blocklist.
#[derive(Debug, Clone)]
pub struct PackageDisallowDeps {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for PackageDisallowDeps {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageDisallowDeps {
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

    fn check_entry(
        &self,
        ctx: &FileContext,
        ast: &Ast,
        entry: &DependencyEntry,
        block: &BlockRule,
    ) -> Option<Diagnostic> {
        let tip = block.tip.clone().unwrap_or_default();
        let Some(blocked) = &block.range else {
            let data = MessageData::new()
                .with("name", &entry.name)
                .with("tip", tip);
            return Some(ctx.report(self, ast, entry.property, "disallowDep", data));
        };
        let declared = entry.range.as_deref()?;
        let normalized = declared.strip_prefix("workspace:").unwrap_or(declared);
        let declared_range = VersionRange::parse(normalized)
            .map_err(|e| debug!(name = %entry.name, range = declared, error = %e, "skipping unparsable range"))
            .ok()?;
        let blocked_range = VersionRange::parse(blocked)
            .map_err(|e| debug!(name = %entry.name, range = %blocked, error = %e, "skipping unparsable blocked range"))
            .ok()?;
        if !declared_range.intersects(&blocked_range) {
            return None;
        }
        let data = MessageData::new()
            .with("name", &entry.name)
            .with("version", declared)
            .with("blockedRange", blocked)
            .with("tip", tip);
        Some(ctx.report(self, ast, entry.property, "disallowVersion", data))
    }
}

impl Rule for PackageDisallowDeps {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids blocklisted dependencies and dependency versions"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                "disallowDep",
                "Dependency '{{name}}' is not allowed. {{tip}}",
            ),
            (
                "disallowVersion",
                "Dependency '{{name}}@{{version}}' overlaps the blocked range '{{blockedRange}}'. {{tip}}",
            ),
        ]
    }

    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "blocklist": {
                    "type": "array",
                    "items": {
                        "oneOf": [
                            { "type": "string" },
                            { "type": "array", "minItems": 1, "maxItems": 3 }
                        ]
                    }
                }
            },
            "additionalProperties": false
        })
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        if !ctx.is_manifest() {
            return Vec::new();
        }
        let Some(options) = ctx.resolve_options(NAME, &DisallowOptions::default()) else {
            return Vec::new();
        };
        let blocklist: Vec<BlockRule> = options
            .blocklist
            .iter()
            .filter_map(BlockEntry::to_rule)
            .collect();
        if blocklist.is_empty() {
            return Vec::new();
        }
        let Some(manifest) = ManifestTree::locate(ast) else {
            return Vec::new();
        };

        let mut diagnostics = Vec::new();
        for kind in [DependencyKind::Runtime, DependencyKind::Dev] {
            for entry in manifest.dependencies(kind) {
                diagnostics.extend(
                    blocklist
                        .iter()
                        .filter(|block| block.name == entry.name)
                        .filter_map(|block| self.check_entry(ctx, ast, &entry, block)),
                );
            }
        }
        diagnostics
    }
}

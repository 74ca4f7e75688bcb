//! Rule to limit how far relative imports climb.
//!
//! # Rationale
//!
//! `../../../shared/x` couples a file to the directory layout around it.
//! Past a few levels the target belongs to another package or module and
//! should be imported by name.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD (max = 3)
//! import x from '../../../shared/x';
//! const y = require('../../../../y');
//! await import('../../../z');
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! import x from '@app/shared/x';
//! import y from '../../y';
//! ```

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Rule, Severity};
use serde::Deserialize;

use crate::path_depth::{is_too_deep, module_sources, parent_depth};

/// Rule code for no-deep-relative-import.
pub const CODE: &str = "FL004";

/// Rule name for no-deep-relative-import.
pub const NAME: &str = "frontlint/no-deep-relative-import";

/// Default depth at which an import is reported.
pub const DEFAULT_MAX: usize = 3;

/// Options for [`NoDeepRelativeImport`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepthOptions {
    /// Depth at which an import is reported.
    pub max: usize,
}

impl Default for DepthOptions {
    fn default() -> Self {
        Self { max: DEFAULT_MAX }
    }
}

/// Reports relative imports that climb `max` or more directories.
#[derive(Debug, Clone)]
pub struct NoDeepRelativeImport {
    /// Custom severity.
    pub severity: Severity,
    /// Threshold used when no options are configured.
    pub defaults: DepthOptions,
}

impl Default for NoDeepRelativeImport {
    fn default() -> Self {
        Self::new()
    }
}

impl NoDeepRelativeImport {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            defaults: DepthOptions::default(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoDeepRelativeImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids relative imports that climb too many parent directories"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "tooDeep",
            "Import '{{path}}' climbs {{depth}} parent directories (limit {{max}}). Import it by package name instead.",
        )]
    }

    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "max": { "type": "integer", "minimum": 1 } },
            "additionalProperties": false
        })
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let Some(options) = ctx.resolve_options(NAME, &self.defaults) else {
            return Vec::new();
        };
        module_sources(ast)
            .into_iter()
            .filter(|source| is_too_deep(source.specifier, options.max))
            .map(|source| {
                let data = MessageData::new()
                    .with("path", source.specifier)
                    .with("depth", parent_depth(source.specifier))
                    .with("max", options.max);
                ctx.report(self, ast, source.node, "tooDeep", data)
            })
            .collect()
    }
}

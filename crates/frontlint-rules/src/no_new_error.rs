//! Rule to forbid throwing bare `Error` instances.
//!
//! # Rationale
//!
//! A plain `new Error(...)` carries no type to branch on and no error code
//! for reporting. Projects define their own error class; with the
//! `replacement` option set, the diagnostic suggests swapping the callee.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD
//! throw new Error('request failed');
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! throw new CustomError('request failed', ErrorCode.Network);
//! ```

use frontlint_core::{Ast, Diagnostic, FileContext, Fix, MessageData, Node, Rule, Severity};
use serde::Deserialize;

/// Rule code for no-new-error.
pub const CODE: &str = "FL010";

/// Rule name for no-new-error.
pub const NAME: &str = "frontlint/no-new-error";

/// Options for [`NoNewError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewErrorOptions {
    /// Class to suggest instead of `Error`.
    pub replacement: Option<String>,
}

/// Forbids `new Error(...)`.
#[derive(Debug, Clone)]
pub struct NoNewError {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoNewError {
    fn default() -> Self {
        Self::new()
    }
}

impl NoNewError {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoNewError {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids constructing bare Error instances"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "noNewError",
            "Do not construct a bare Error; use a project error class instead.",
        )]
    }

    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "replacement": { "type": "string" } },
            "additionalProperties": false
        })
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let Some(options) = ctx.resolve_options(NAME, &NewErrorOptions::default()) else {
            return Vec::new();
        };
        ast.descendants(ast.root())
            .filter_map(|id| match ast.node(id) {
                Node::NewExpression { callee, .. }
                    if ast.node(*callee).identifier_name() == Some("Error") =>
                {
                    Some((id, *callee))
                }
                _ => None,
            })
            .map(|(id, callee)| {
                let diagnostic = ctx.report(self, ast, id, "noNewError", MessageData::new());
                match &options.replacement {
                    Some(replacement) => {
                        let span = ast.span(callee);
                        diagnostic.with_fix(Fix::new(span.start, span.len(), replacement))
                    }
                    None => diagnostic,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_with};
    use serde_json::json;

    #[test]
    fn reports_bare_error() {
        let found = run(&NoNewError::new(), "a.js", "throw new Error('boom');");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message_id, "noNewError");
        assert_eq!(found[0].location.column, 7);
        assert!(found[0].fix.is_none());
    }

    #[test]
    fn other_constructors_pass() {
        let src = "throw new TypeError('x');\nthrow new errors.Error('y');\nthrow Error('z');";
        assert!(run(&NoNewError::new(), "a.js", src).is_empty());
    }

    #[test]
    fn replacement_produces_a_fix() {
        let src = "throw new Error('boom');";
        let found = run_with(
            &NoNewError::new(),
            "a.js",
            src,
            &json!({ "replacement": "CustomError" }),
        );
        let fix = found[0].fix.clone().expect("fix");
        assert_eq!(fix, Fix::new(10, 5, "CustomError"));
        let mut fixed = src.to_string();
        fixed.replace_range(fix.offset..fix.offset + fix.length, &fix.text);
        assert_eq!(fixed, "throw new CustomError('boom');");
        assert!(NoNewError::new().fixable());
    }
}

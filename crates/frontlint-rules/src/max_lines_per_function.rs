//! Rule to cap the length of functions.
//!
//! # Rationale
//!
//! Long functions mix concerns and are hard to review. The limit counts
//! every physical line of the function, blank lines and comments included.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD (with max = 3): four lines
//! function load() {
//!   const a = 1;
//!   return a;
//! }
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD: split into helpers under the limit
//! const load = () => read(1);
//! ```
//!
//! Methods, accessors and class fields are measured from the start of their
//! declaration, so `static\n[key]\n() {}` counts the modifier line too.

use frontlint_core::{walk, Ast, Diagnostic, FileContext, MessageData, NodeId, Rule, Severity, Visit};
use serde::Deserialize;

use crate::callable::{classify, measure};

/// Rule code for max-lines-per-function.
pub const CODE: &str = "FL001";

/// Rule name for max-lines-per-function.
pub const NAME: &str = "frontlint/max-lines-per-function";

/// Default line limit.
pub const DEFAULT_MAX: usize = 150;

/// Options for [`MaxLinesPerFunction`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaxLinesOptions {
    /// Largest allowed line count.
    pub max: usize,
}

impl Default for MaxLinesOptions {
    fn default() -> Self {
        Self { max: DEFAULT_MAX }
    }
}

/// Reports functions longer than a configured number of lines.
#[derive(Debug, Clone)]
pub struct MaxLinesPerFunction {
    /// Custom severity.
    pub severity: Severity,
    /// Limit used when no options are configured.
    pub defaults: MaxLinesOptions,
}

impl Default for MaxLinesPerFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl MaxLinesPerFunction {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            defaults: MaxLinesOptions::default(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the default limit.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.defaults.max = max;
        self
    }
}

impl Rule for MaxLinesPerFunction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces a maximum number of lines per function"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "exceed",
            "{{name}} has too many lines ({{lineCount}}). Maximum allowed is {{maxLines}}.",
        )]
    }

    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "max": { "type": "integer", "minimum": 0 } },
            "additionalProperties": false
        })
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let Some(options) = ctx.resolve_options(NAME, &self.defaults) else {
            return Vec::new();
        };
        let mut visitor = FunctionLengthVisitor {
            ctx,
            rule: self,
            max: options.max,
            diagnostics: Vec::new(),
        };
        walk(&mut visitor, ast);
        visitor.diagnostics
    }
}

struct FunctionLengthVisitor<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a MaxLinesPerFunction,
    max: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Visit for FunctionLengthVisitor<'_> {
    fn enter(&mut self, ast: &Ast, id: NodeId) {
        let Some(callable) = classify(ast, id) else {
            return;
        };
        let lines = measure(ast, callable.target);
        if lines <= self.max {
            return;
        }
        let data = MessageData::new()
            .with("name", callable.describe())
            .with("lineCount", lines)
            .with("maxLines", self.max);
        self.diagnostics
            .push(self.ctx.report(self.rule, ast, callable.target, "exceed", data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_with};
    use serde_json::json;

    fn names(src: &str, max: usize) -> Vec<(String, String)> {
        run_with(&MaxLinesPerFunction::new(), "a.js", src, &json!({ "max": max }))
            .into_iter()
            .map(|d| {
                (
                    d.data.get("name").unwrap_or_default().to_string(),
                    d.data.get("lineCount").unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn functions_within_the_limit_pass() {
        assert!(names("function name() {\n}", 2).is_empty());
        assert!(names("var x = () => {\n  return 1;\n}", 3).is_empty());
    }

    #[test]
    fn reports_long_declarations() {
        let found = run_with(
            &MaxLinesPerFunction::new(),
            "a.js",
            "function name() {\nvar x = 5;\nvar x = 2;\n}",
            &json!({ "max": 3 }),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message_id, "exceed");
        assert_eq!(
            found[0].message,
            "function 'name' has too many lines (4). Maximum allowed is 3."
        );
        assert_eq!(found[0].location.line, 1);
        assert_eq!(found[0].location.end_line, 4);
    }

    #[test]
    fn default_limit_is_150() {
        let body = "\n".repeat(149);
        let at_limit = format!("(() => {{{body}}})");
        assert!(run(&MaxLinesPerFunction::new(), "a.js", &at_limit).is_empty());

        let over = format!("() => {{{body}\n}}");
        let found = run(&MaxLinesPerFunction::new(), "a.js", &over);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data.get("name"), Some("Arrow function"));
        assert_eq!(found[0].data.get("lineCount"), Some("151"));
    }

    #[test]
    fn names_follow_the_callable() {
        assert_eq!(
            names("(function\n()\n{\n}\n)\n()", 3),
            vec![("function".to_string(), "4".to_string())]
        );
        assert_eq!(
            names("function* generator() {\n\n\n}", 2),
            vec![("generator function 'generator'".to_string(), "4".to_string())]
        );
        assert_eq!(
            names("class A {\n    static\n    foo\n    (a) { return a }\n}", 2),
            vec![("static method 'foo'".to_string(), "3".to_string())]
        );
        assert_eq!(
            names("class A {\n    #privateMethod() {\n        return 1\n    }\n}", 2),
            vec![("private method #privateMethod".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn nested_functions_are_reported_separately() {
        let found = names(
            "function parent() {\nvar x = 0;\nfunction nested() {\nvar y = 0;\nx = 2;\n}\nif ( x === y ) {\nx++;\n}\n}",
            3,
        );
        assert_eq!(
            found,
            vec![
                ("function 'parent'".to_string(), "10".to_string()),
                ("function 'nested'".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn crlf_counts_like_lf() {
        let lf = names("function name() {\nvar x = 5;\n\t\n \n\nvar x = 2;\n}", 6);
        let crlf = names("function name() {\r\nvar x = 5;\r\n\t\r\n \r\n\r\nvar x = 2;\r\n}", 6);
        assert_eq!(lf, vec![("function 'name'".to_string(), "7".to_string())]);
        assert_eq!(crlf, lf);
    }

    #[test]
    fn malformed_options_report_nothing() {
        let found = run_with(
            &MaxLinesPerFunction::new(),
            "a.js",
            "function a() {\n\n\n}",
            &json!({ "max": "two" }),
        );
        assert!(found.is_empty());
    }
}

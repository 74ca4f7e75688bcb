//! Rule to require that a caught error is used.
//!
//! # Rationale
//!
//! Binding the error and then ignoring it loses the cause. Either use the
//! binding (log it, wrap it, rethrow it) or omit it with `catch {}`.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD
//! try { load() } catch (err) { showToast('failed') }
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! try { load() } catch (err) { showToast('failed'); logger.error(err) }
//!
//! // GOOD: no binding
//! try { load() } catch { showToast('failed') }
//! ```
//!
//! Any identifier with the same name in the body counts as a use, including
//! in nested functions. Destructured parameters are not checked.

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Node, Rule, Severity};

use crate::blocks::contains_identifier_use;

/// Rule code for use-error-in-catch.
pub const CODE: &str = "FL003";

/// Rule name for use-error-in-catch.
pub const NAME: &str = "frontlint/use-error-in-catch";

/// Requires the bound catch parameter to be referenced in the handler.
#[derive(Debug, Clone)]
pub struct UseErrorInCatch {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UseErrorInCatch {
    fn default() -> Self {
        Self::new()
    }
}

impl UseErrorInCatch {
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

impl Rule for UseErrorInCatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the caught error to be used in the catch block"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "unusedError",
            "Caught error '{{name}}' is never used. Handle it or drop the binding.",
        )]
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for id in ast.descendants(ast.root()) {
            let Node::CatchClause {
                param: Some(param),
                body,
            } = ast.node(id)
            else {
                continue;
            };
            let Some(name) = ast.node(*param).identifier_name() else {
                continue;
            };
            if !contains_identifier_use(ast, *body, name) {
                diagnostics.push(ctx.report(
                    self,
                    ast,
                    *param,
                    "unusedError",
                    MessageData::new().with("name", name),
                ));
            }
        }
        diagnostics
    }
}

//! Rule to forbid empty `catch` blocks.
//!
//! # Rationale
//!
//! An empty handler silently discards the failure. A comment alone does not
//! count as handling it.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD
//! try { load() } catch (e) {}
//!
//! // BAD: comments and empty statements only
//! try { load() } catch (e) { /* ignore */ ; }
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! try { load() } catch (e) { logger.error(e) }
//! ```

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Node, Rule, Severity};

use crate::blocks::is_effectively_empty;

/// Rule code for no-empty-catch.
pub const CODE: &str = "FL002";

/// Rule name for no-empty-catch.
pub const NAME: &str = "frontlint/no-empty-catch";

/// Forbids catch clauses whose body does nothing.
#[derive(Debug, Clone)]
pub struct NoEmptyCatch {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoEmptyCatch {
    fn default() -> Self {
        Self::new()
    }
}

impl NoEmptyCatch {
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

impl Rule for NoEmptyCatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids empty catch blocks"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "emptyCatch",
            "Empty catch block. Handle the error instead of ignoring it.",
        )]
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        ast.descendants(ast.root())
            .filter_map(|id| match ast.node(id) {
                Node::CatchClause { body, .. } if is_effectively_empty(ast, *body) => Some(*body),
                _ => None,
            })
            .map(|body| ctx.report(self, ast, body, "emptyCatch", MessageData::new()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, run};

    #[test]
    fn reports_empty_handlers() {
        for src in [
            "try { a() } catch (e) {}",
            "try { a() } catch {}",
            "try { a() } catch (e) {\n  // nothing to do\n}",
            "try { a() } catch (e) { ;; }",
        ] {
            let found = run(&NoEmptyCatch::new(), "a.js", src);
            assert_eq!(ids(&found), vec!["emptyCatch"], "{src}");
        }
    }

    #[test]
    fn handled_errors_pass() {
        for src in [
            "try { a() } catch (e) { console.error(e) }",
            "try { a() } catch { retry() }",
            "try { a() } finally {}",
        ] {
            assert!(run(&NoEmptyCatch::new(), "a.js", src).is_empty(), "{src}");
        }
    }

    #[test]
    fn points_at_the_block() {
        let found = run(&NoEmptyCatch::new(), "a.js", "try {\n  a()\n} catch (e) {\n}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, 3);
        assert_eq!(found[0].location.column, 13);
        assert_eq!(found[0].severity, Severity::Error);
    }

    #[test]
    fn nested_handlers_are_checked() {
        let src = "try { a() } catch (e) { try { b(e) } catch (f) {} }";
        assert_eq!(run(&NoEmptyCatch::new(), "a.ts", src).len(), 1);
    }
}

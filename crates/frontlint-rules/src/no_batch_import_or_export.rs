//! Rule to forbid namespace imports and star re-exports.
//!
//! # Rationale
//!
//! `import * as x` and `export *` pull in a module's whole surface, defeat
//! tree shaking and hide which bindings a file actually depends on.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD
//! import * as utils from './utils';
//! export * from './components';
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! import { pick } from './utils';
//! export { Button } from './components';
//! ```

use frontlint_core::{walk, Ast, Diagnostic, FileContext, MessageData, Node, NodeId, Rule, Severity, Visit};

/// Rule code for no-batch-import-or-export.
pub const CODE: &str = "FL009";

/// Rule name for no-batch-import-or-export.
pub const NAME: &str = "frontlint/no-batch-import-or-export";

/// Forbids `import * as` and `export * from`.
#[derive(Debug, Clone)]
pub struct NoBatchImportOrExport {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoBatchImportOrExport {
    fn default() -> Self {
        Self::new()
    }
}

impl NoBatchImportOrExport {
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

impl Rule for NoBatchImportOrExport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids namespace imports and star re-exports"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                "noBatchImport",
                "Import named bindings from '{{source}}' instead of the whole namespace.",
            ),
            (
                "noBatchExport",
                "Re-export named bindings from '{{source}}' instead of 'export *'.",
            ),
        ]
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        let mut visitor = BatchVisitor {
            ctx,
            rule: self,
            diagnostics: Vec::new(),
        };
        walk(&mut visitor, ast);
        visitor.diagnostics
    }
}

struct BatchVisitor<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a NoBatchImportOrExport,
    diagnostics: Vec<Diagnostic>,
}

impl Visit for BatchVisitor<'_> {
    fn enter(&mut self, ast: &Ast, id: NodeId) {
        let (message_id, source) = match ast.node(id) {
            Node::ImportDeclaration {
                source,
                namespace: true,
            } => ("noBatchImport", *source),
            Node::ExportDeclaration {
                source: Some(source),
                all: true,
            } => ("noBatchExport", *source),
            _ => return,
        };
        let text = ast.node(source).string_value().unwrap_or_default();
        self.diagnostics.push(self.ctx.report(
            self.rule,
            ast,
            id,
            message_id,
            MessageData::new().with("source", text),
        ));
    }
}

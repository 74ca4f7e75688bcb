//! The rule trait.

use crate::ast::Ast;
use crate::context::FileContext;
use crate::types::{Diagnostic, Severity};

/// Namespace prefix shared by every built-in rule id.
pub const RULE_NAMESPACE: &str = "frontlint/";

/// A per-file lint rule over the arena syntax tree.
///
/// Rules are stateless: everything they need arrives through the
/// [`FileContext`] (path, configured options) and the [`Ast`].
///
/// # Example
///
/// ```ignore
/// use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Node, Rule};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "frontlint/no-debugger" }
///     fn code(&self) -> &'static str { "FL100" }
///     fn messages(&self) -> &'static [(&'static str, &'static str)] {
///         &[("debugger", "Unexpected 'debugger' statement.")]
///     }
///
///     fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
///         ast.descendants(ast.root())
///             .filter(|&id| matches!(ast.node(id), Node::Other { kind } if kind == "debugger_statement"))
///             .map(|id| ctx.report(self, ast, id, "debugger", MessageData::new()))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the namespaced rule id (e.g., "frontlint/no-empty-catch").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "FL002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Message catalog: `(message_id, template)` pairs.
    ///
    /// Templates reference diagnostic data as `{{field}}`.
    fn messages(&self) -> &'static [(&'static str, &'static str)];

    /// JSON schema of the rule's options object.
    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {}, "additionalProperties": false })
    }

    /// Whether diagnostics from this rule may carry a [`crate::Fix`].
    fn fixable(&self) -> bool {
        false
    }

    /// Looks up a message template by id.
    fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages()
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }

    /// Checks a single parsed file and returns any diagnostics found.
    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

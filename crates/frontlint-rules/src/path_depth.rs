//! Module specifier extraction and relative-depth measurement.

use std::sync::LazyLock;

use frontlint_core::{Ast, Node, NodeId};
use regex::Regex;

static PARENT_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^(?:\.\./)+").ok());

/// Number of leading `../` segments in a specifier.
///
/// `./../x` is depth 0: only a run anchored at the start counts.
#[must_use]
pub fn parent_depth(specifier: &str) -> usize {
    PARENT_RUN
        .as_ref()
        .and_then(|re| re.find(specifier))
        .map_or(0, |m| m.len() / 3)
}

/// Returns true if the specifier climbs `max` or more parent directories.
#[must_use]
pub fn is_too_deep(specifier: &str, max: usize) -> bool {
    parent_depth(specifier) >= max
}

/// A module specifier literal found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSource<'a> {
    /// The string literal node.
    pub node: NodeId,
    /// The specifier text.
    pub specifier: &'a str,
}

/// Collects specifiers of static imports, `require('x')` calls with a single
/// string argument, and `import('x')` expressions with a string source.
///
/// Re-exports (`export ... from`) are not included.
#[must_use]
pub fn module_sources(ast: &Ast) -> Vec<ModuleSource<'_>> {
    ast.descendants(ast.root())
        .filter_map(|id| match ast.node(id) {
            Node::ImportDeclaration { source, .. } => Some(*source),
            Node::ImportExpression { source } => Some(*source),
            Node::CallExpression { callee, arguments }
                if ast.node(*callee).identifier_name() == Some("require")
                    && arguments.len() == 1 =>
            {
                arguments.first().copied()
            }
            _ => None,
        })
        .filter_map(|node| {
            ast.node(node)
                .string_value()
                .map(|specifier| ModuleSource { node, specifier })
        })
        .collect()
}

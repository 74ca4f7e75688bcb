//! Statement-block helpers for catch-clause rules.

use frontlint_core::{Ast, Node, NodeId};

/// Returns true if `block` is a statement block holding nothing but empty
/// statements and comments.
///
/// Any other node (including a non-block) is not considered empty.
#[must_use]
pub fn is_effectively_empty(ast: &Ast, block: NodeId) -> bool {
    match ast.node(block) {
        Node::BlockStatement { body } => body
            .iter()
            .all(|&stmt| matches!(ast.node(stmt), Node::EmptyStatement | Node::Comment { .. })),
        _ => false,
    }
}

/// Returns true if an identifier named `name` occurs anywhere below
/// `subtree`, including in nested functions.
///
/// Property keys are lowered as identifiers too, so `{ err: 1 }` counts as a
/// use. Shadowing is not tracked.
#[must_use]
pub fn contains_identifier_use(ast: &Ast, subtree: NodeId, name: &str) -> bool {
    ast.descendants(subtree)
        .any(|id| ast.node(id).identifier_name() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse;

    fn catch_body(src: &str) -> (frontlint_core::Ast, NodeId) {
        let ast = parse(src);
        let body = ast
            .descendants(ast.root())
            .find_map(|id| match ast.node(id) {
                Node::CatchClause { body, .. } => Some(*body),
                _ => None,
            })
            .expect("no catch clause");
        (ast, body)
    }

    #[test]
    fn empty_and_comment_only_blocks() {
        for src in [
            "try {} catch (e) {}",
            "try {} catch (e) { ; }",
            "try {} catch (e) { /* ignored */ }",
            "try {} catch (e) {\n  // ignored\n  ;\n}",
        ] {
            let (ast, body) = catch_body(src);
            assert!(is_effectively_empty(&ast, body), "{src}");
        }
    }

    #[test]
    fn blocks_with_statements_are_not_empty() {
        for src in [
            "try {} catch (e) { log(e) }",
            "try {} catch (e) { {} }",
            "try {} catch { return; }",
        ] {
            let (ast, body) = catch_body(src);
            assert!(!is_effectively_empty(&ast, body), "{src}");
        }
    }

    #[test]
    fn non_blocks_are_not_empty() {
        let ast = parse("x;");
        assert!(!is_effectively_empty(&ast, ast.root()));
    }

    #[test]
    fn identifier_uses_are_found_in_nested_scopes() {
        let (ast, body) = catch_body("try {} catch (err) { setTimeout(() => report(err)) }");
        assert!(contains_identifier_use(&ast, body, "err"));
        assert!(!contains_identifier_use(&ast, body, "error"));
    }

    #[test]
    fn string_contents_are_not_uses() {
        let (ast, body) = catch_body("try {} catch (err) { log('err') }");
        assert!(!contains_identifier_use(&ast, body, "err"));
    }
}

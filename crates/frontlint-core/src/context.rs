//! Context types for rule execution.

use crate::ast::{Ast, NodeId, Span};
use crate::rule::Rule;
use crate::types::{Diagnostic, Location, MessageData};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

static NO_OPTIONS: Value = Value::Null;

/// File name that marks a package manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Context provided to per-file rules.
///
/// Carries the file path and the options configured for the rule being run.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Path of the file as handed to the analyzer.
    pub path: &'a Path,
    /// Options configured for the current rule (`null` when none).
    pub options: &'a Value,
}

impl<'a> FileContext<'a> {
    /// Creates a context without options.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            options: &NO_OPTIONS,
        }
    }

    /// Sets the rule options.
    #[must_use]
    pub fn with_options(mut self, options: &'a Value) -> Self {
        self.options = options;
        self
    }

    /// Returns the file name component of the path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Returns true if the file is a package manifest (`package.json`).
    #[must_use]
    pub fn is_manifest(&self) -> bool {
        self.file_name() == Some(MANIFEST_FILE_NAME)
    }

    /// Deserializes the rule options.
    ///
    /// Absent options (`null` or an empty object) yield `fallback`.
    /// Malformed options are logged and yield `None`; the caller should then
    /// report nothing.
    #[must_use]
    pub fn resolve_options<T>(&self, rule_id: &str, fallback: &T) -> Option<T>
    where
        T: DeserializeOwned + Clone,
    {
        match self.options {
            Value::Null => return Some(fallback.clone()),
            Value::Object(map) if map.is_empty() => return Some(fallback.clone()),
            _ => {}
        }
        match serde_json::from_value(self.options.clone()) {
            Ok(options) => Some(options),
            Err(e) => {
                warn!(rule = rule_id, error = %e, "ignoring malformed rule options");
                None
            }
        }
    }

    /// Builds a location for a byte range of `ast`.
    #[must_use]
    pub fn location(&self, ast: &Ast, span: Span) -> Location {
        let (line, column) = ast.position(span.start);
        let (end_line, end_column) = ast.position(span.end);
        Location::new(self.path.to_path_buf(), line, column)
            .with_end(end_line, end_column)
            .with_span(span.start, span.len())
    }

    /// Creates a diagnostic for `node`, rendering the rule's message template.
    ///
    /// An unknown message id is used verbatim as the message.
    #[must_use]
    pub fn report<R: Rule + ?Sized>(
        &self,
        rule: &R,
        ast: &Ast,
        node: NodeId,
        message_id: &str,
        data: MessageData,
    ) -> Diagnostic {
        let template = rule.message(message_id).unwrap_or(message_id);
        let message = data.interpolate(template).trim_end().to_string();
        Diagnostic::new(
            rule.name(),
            rule.code(),
            rule.default_severity(),
            self.location(ast, ast.span(node)),
            message_id,
            message,
        )
        .with_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Node};
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    #[serde(default)]
    struct MaxOptions {
        max: usize,
    }

    impl Default for MaxOptions {
        fn default() -> Self {
            Self { max: 3 }
        }
    }

    #[test]
    fn manifest_detection() {
        assert!(FileContext::new(Path::new("packages/a/package.json")).is_manifest());
        assert!(!FileContext::new(Path::new("packages/a/package.jsonc")).is_manifest());
        assert!(!FileContext::new(Path::new("src/index.ts")).is_manifest());
    }

    #[test]
    fn absent_options_use_defaults() {
        let fallback = MaxOptions { max: 7 };
        let ctx = FileContext::new(Path::new("a.js"));
        assert_eq!(ctx.resolve_options("r", &fallback), Some(MaxOptions { max: 7 }));

        let empty = serde_json::json!({});
        let ctx = ctx.with_options(&empty);
        assert_eq!(ctx.resolve_options("r", &fallback), Some(MaxOptions { max: 7 }));
    }

    #[test]
    fn configured_options_are_parsed() {
        let options = serde_json::json!({ "max": 10 });
        let ctx = FileContext::new(Path::new("a.js")).with_options(&options);
        assert_eq!(
            ctx.resolve_options("r", &MaxOptions::default()),
            Some(MaxOptions { max: 10 })
        );
    }

    #[test]
    fn malformed_options_yield_none() {
        let options = serde_json::json!({ "max": "many" });
        let ctx = FileContext::new(Path::new("a.js")).with_options(&options);
        assert_eq!(ctx.resolve_options("r", &MaxOptions::default()), None);
    }

    #[test]
    fn location_covers_span() {
        let mut b = AstBuilder::new("a\nbcd");
        b.push(Node::Program, Span::new(0, 5), None);
        let ast = b.finish();
        let loc = FileContext::new(Path::new("a.js")).location(&ast, Span::new(3, 5));
        assert_eq!((loc.line, loc.column), (2, 2));
        assert_eq!((loc.end_line, loc.end_column), (2, 4));
        assert_eq!((loc.offset, loc.length), (3, 2));
    }
}

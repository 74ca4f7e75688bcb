//! Shared helpers for rule tests.

use std::path::Path;

use frontlint_core::{Ast, Diagnostic, FileContext, Rule};
use frontlint_js::{JavaScriptParser, SourceParser};
use serde_json::Value;

use crate::manifest::MANIFEST_PREFIX;

/// Parses JavaScript source, panicking on syntax errors.
pub(crate) fn parse(src: &str) -> Ast {
    JavaScriptParser::new().parse(src).expect("source should parse")
}

/// Parses `src` with the dialect implied by `path`.
pub(crate) fn parse_for(path: &str, src: &str) -> Ast {
    JavaScriptParser::for_path(Path::new(path))
        .parse(src)
        .expect("source should parse")
}

/// Runs `rule` without options.
pub(crate) fn run(rule: &dyn Rule, path: &str, src: &str) -> Vec<Diagnostic> {
    run_with(rule, path, src, &Value::Null)
}

/// Runs `rule` with `options`.
pub(crate) fn run_with(rule: &dyn Rule, path: &str, src: &str, options: &Value) -> Vec<Diagnostic> {
    let ast = parse_for(path, src);
    let ctx = FileContext::new(Path::new(path)).with_options(options);
    rule.check(&ctx, &ast)
}

/// Runs a manifest rule over `json` as the manifest processor would
/// present it.
pub(crate) fn run_manifest(rule: &dyn Rule, json: &str, options: &Value) -> Vec<Diagnostic> {
    run_with(
        rule,
        "package.json",
        &format!("{MANIFEST_PREFIX}{json}"),
        options,
    )
}

/// Message ids of `diagnostics`, in order.
pub(crate) fn ids(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message_id.as_str()).collect()
}

//! End-to-end linting of `package.json` through the manifest processor.

use std::path::Path;

use frontlint::rules::Preset;
use frontlint::{
    Ast, Config, Diagnostic, FileContext, JavaScriptParser, MessageData, Processor, Rule,
    RuleConfig, RuleSet, SourceParser,
};

/// A non-namespaced rule that reports every file, standing in for generic
/// script rules a host may run alongside ours.
struct EveryFile;

impl Rule for EveryFile {
    fn name(&self) -> &'static str {
        "generic/every-file"
    }
    fn code(&self) -> &'static str {
        "G001"
    }
    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("seen", "seen")]
    }
    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        vec![ctx.report(self, ast, ast.root(), "seen", MessageData::new())]
    }
}

const CLEAN: &str = r#"{
  "name": "@acme/app",
  "author": "dev@bytedance.com",
  "dependencies": { "react": "^18.2.0" },
  "devDependencies": { "jest": "^29.0.0" }
}"#;

const DIRTY: &str = r#"{
  "name": "@acme/app",
  "author": "dev@gmail.com",
  "dependencies": { "react": "^16.8.0", "moment": "2.29.4" },
  "devDependencies": { "react": "^16.8.0" }
}"#;

fn rule_set(config: Config) -> RuleSet {
    RuleSet::builder()
        .preset(Preset::Recommended)
        .rule(EveryFile)
        .config(config)
        .build()
        .expect("rule set")
}

#[test]
fn clean_manifest_yields_nothing_even_with_generic_rules() {
    let set = rule_set(Config::new());
    let result = set
        .lint_text(Path::new("packages/app/package.json"), CLEAN)
        .expect("lint");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.files_checked, 1);
}

#[test]
fn processor_round_trip_drops_foreign_diagnostics() {
    let set = rule_set(Config::new());
    let path = Path::new("package.json");
    let processor = set.processor("package.json").expect("processor");
    let chunks = processor.preprocess(CLEAN, path);
    assert_eq!(chunks.len(), 1);

    let ast = JavaScriptParser::new().parse(&chunks[0]).expect("parse");
    let per_chunk = set.lint_ast(path, &ast).diagnostics;
    assert!(per_chunk.iter().any(|d| d.rule_id == "generic/every-file"));
    assert!(processor.postprocess(vec![per_chunk], path).is_empty());
}

#[test]
fn dirty_manifest_reports_policy_violations() {
    let config = Config::new().with_rule(
        "frontlint/package-disallow-deps",
        RuleConfig::new().option(
            "blocklist",
            serde_json::json!(["moment", ["react", "<17", "Upgrade to React 18."]]),
        ),
    );
    let set = rule_set(config);
    let result = set.lint_text(Path::new("package.json"), DIRTY).expect("lint");

    let found: Vec<(&str, &str)> = result
        .diagnostics
        .iter()
        .map(|d| (d.rule_id.as_str(), d.message_id.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("frontlint/package-require-author", "invalidAuthor"),
            ("frontlint/no-duplicated-deps", "duplicatedDep"),
            ("frontlint/package-disallow-deps", "disallowVersion"),
            ("frontlint/package-disallow-deps", "disallowDep"),
            ("frontlint/package-disallow-deps", "disallowVersion"),
        ]
    );

    let author = &result.diagnostics[0];
    assert_eq!(author.location.line, 3);
    assert_eq!(author.location.column, 13);
    assert_eq!(&DIRTY[author.location.offset..][..15], "\"dev@gmail.com\"");
}

#[test]
fn manifest_rules_ignore_script_files() {
    let set = rule_set(Config::new());
    let result = set
        .lint_text(
            Path::new("src/config.js"),
            "module.exports = { dependencies: { a: '1' }, devDependencies: { a: '1' } };",
        )
        .expect("lint");
    let ids: Vec<_> = result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["generic/every-file"]);
}

#[test]
fn excluded_manifests_are_skipped() {
    let mut config = Config::new();
    config.exclude.push("**/node_modules/**".to_string());
    let set = rule_set(config);
    let result = set
        .lint_text(Path::new("node_modules/dep/package.json"), DIRTY)
        .expect("lint");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.files_checked, 0);
}

#[test]
fn non_object_manifest_is_not_an_error() {
    let set = rule_set(Config::new());
    let result = set.lint_text(Path::new("package.json"), "[]").expect("lint");
    assert!(result.diagnostics.is_empty());
}

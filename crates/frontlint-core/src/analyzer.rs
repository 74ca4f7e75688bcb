//! Single-file analyzer that runs the configured rules over a parsed tree.

use crate::ast::Ast;
use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::types::{Diagnostic, LintResult};

use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while building an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Two rules share an id.
    #[error("Rule {0} is registered twice")]
    DuplicateRule(String),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob or two
    /// rules share an id.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let mut seen = std::collections::BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(AnalyzerError::DuplicateRule(rule.name().to_string()));
            }
        }

        let exclude = self
            .exclude_patterns
            .iter()
            .chain(config.exclude.iter())
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            rules = self.rules.len(),
            excludes = exclude.len(),
            "analyzer built"
        );

        Ok(Analyzer {
            rules: self.rules,
            exclude,
            config,
        })
    }
}

/// Runs rules over one parsed file at a time.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Iterates over the registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| &**r)
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.rules().find(|r| r.name() == rule_id)
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every enabled rule over `ast`.
    ///
    /// Excluded paths yield an empty result with `files_checked == 0`.
    #[must_use]
    pub fn lint(&self, path: &Path, ast: &Ast) -> LintResult {
        let mut result = LintResult::new();
        if self.is_excluded(path) {
            debug!("Excluding: {}", path.display());
            return result;
        }
        result.files_checked = 1;

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                trace!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let options = self.config.options_for(rule.name());
            let ctx = FileContext::new(path).with_options(&options);
            let diagnostics = rule.check(&ctx, ast);
            result
                .diagnostics
                .extend(self.apply_severity_override(rule.name(), diagnostics));
        }

        result.sort();
        debug!(
            "Linted {}: {} diagnostics",
            path.display(),
            result.diagnostics.len()
        );
        result
    }

    /// Checks if a path matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(path))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_id: &str,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Vec<Diagnostic> {
        if let Some(severity) = self.config.rule_severity(rule_id) {
            for d in &mut diagnostics {
                d.severity = severity;
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Node, Span};
    use crate::config::RuleConfig;
    use crate::types::{MessageData, Severity};

    /// Reports the root once, echoing the `tag` option.
    struct EchoRule(&'static str);

    impl Rule for EchoRule {
        fn name(&self) -> &'static str {
            self.0
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn messages(&self) -> &'static [(&'static str, &'static str)] {
            &[("echo", "tag={{tag}}")]
        }
        fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
            let tag = ctx
                .options
                .get("tag")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("none");
            vec![ctx.report(self, ast, ast.root(), "echo", MessageData::new().with("tag", tag))]
        }
    }

    fn tree() -> Ast {
        let mut b = AstBuilder::new("x;");
        b.push(Node::Program, Span::new(0, 2), None);
        b.finish()
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .exclude("**/node_modules/**")
            .exclude("dist/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.is_excluded(Path::new("a/node_modules/b/index.js")));
        assert!(analyzer.is_excluded(Path::new("dist/main.js")));
        assert!(!analyzer.is_excluded(Path::new("src/main.js")));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let err = Analyzer::builder().exclude("a/[").build();
        assert!(matches!(err, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn duplicate_rules_are_rejected() {
        let err = Analyzer::builder()
            .rule(EchoRule("frontlint/echo"))
            .rule(EchoRule("frontlint/echo"))
            .build();
        assert!(matches!(err, Err(AnalyzerError::DuplicateRule(id)) if id == "frontlint/echo"));
    }

    #[test]
    fn excluded_file_is_not_checked() {
        let analyzer = Analyzer::builder()
            .rule(EchoRule("frontlint/echo"))
            .exclude("**/gen/**")
            .build()
            .expect("build");
        let result = analyzer.lint(Path::new("src/gen/a.js"), &tree());
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn config_drives_enablement_severity_and_options() {
        let config = Config::new()
            .with_rule(
                "frontlint/a",
                RuleConfig::new()
                    .severity(Severity::Error)
                    .option("tag", "configured"),
            )
            .with_rule("frontlint/b", RuleConfig::new().enabled(false));
        let analyzer = Analyzer::builder()
            .rule(EchoRule("frontlint/a"))
            .rule(EchoRule("frontlint/b"))
            .rule(EchoRule("frontlint/c"))
            .config(config)
            .build()
            .expect("build");

        let result = analyzer.lint(Path::new("src/a.js"), &tree());
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.diagnostics.len(), 2);

        let a = result.by_rule("frontlint/a");
        assert_eq!(a[0].severity, Severity::Error);
        assert_eq!(a[0].message, "tag=configured");

        let c = result.by_rule("frontlint/c");
        assert_eq!(c[0].severity, Severity::Warning);
        assert_eq!(c[0].message, "tag=none");
        assert!(result.by_rule("frontlint/b").is_empty());
    }

    #[test]
    fn rule_lookup() {
        let analyzer = Analyzer::builder()
            .rule(EchoRule("frontlint/a"))
            .build()
            .expect("build");
        assert_eq!(analyzer.rule_count(), 1);
        assert!(analyzer.rule("frontlint/a").is_some());
        assert!(analyzer.rule("frontlint/z").is_none());
    }
}

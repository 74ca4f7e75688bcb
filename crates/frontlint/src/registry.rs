//! The rule set handed to hosts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use frontlint_core::{
    Analyzer, AnalyzerError, Ast, Config, ConfigError, LintResult, Processor, ProcessorBox, Rule,
    RuleBox, MANIFEST_FILE_NAME,
};
use frontlint_js::{JavaScriptParser, ParseError, SourceParser};
use frontlint_rules::{no_pkg_dir_import, recommended_config, NoPkgDirImport, PackageHost, Preset};
use thiserror::Error;
use tracing::{debug, info};

use crate::processors::ManifestProcessor;

/// Config file names searched by [`load_config`], in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["frontlint.toml", ".frontlint.toml"];

/// Errors from building a rule set or linting text.
#[derive(Debug, Error)]
pub enum LintError {
    /// The source did not parse.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File being linted.
        path: PathBuf,
        /// Parser error.
        source: ParseError,
    },

    /// The analyzer could not be built.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The config names a preset that does not exist.
    #[error("unknown preset `{0}`; valid presets: recommended, all")]
    UnknownPreset(String),
}

/// Loads the first config file found in `root`, or the default config.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(root: &Path) -> Result<Config, LintError> {
    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.is_file() {
            info!("Loading config from {}", path.display());
            return Ok(Config::from_file(&path)?);
        }
    }
    debug!("No config file in {}", root.display());
    Ok(Config::default())
}

/// Builder for [`RuleSet`].
#[derive(Default)]
pub struct RuleSetBuilder {
    preset: Option<Preset>,
    extra: Vec<RuleBox>,
    config: Option<Config>,
    host: Option<Arc<dyn PackageHost>>,
}

impl RuleSetBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the preset, overriding the config's `preset` key.
    #[must_use]
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Adds a rule on top of the preset.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.extra.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule on top of the preset.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.extra.push(rule);
        self
    }

    /// Sets the user configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the module resolution host used by boundary checks.
    #[must_use]
    pub fn host(mut self, host: Arc<dyn PackageHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Builds the rule set.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown preset name, an invalid exclude
    /// glob or a rule registered twice.
    pub fn build(self) -> Result<RuleSet, LintError> {
        let user = self.config.unwrap_or_default();
        let preset = match (self.preset, user.preset.as_deref()) {
            (Some(preset), _) => preset,
            (None, Some(name)) => {
                Preset::from_name(name).ok_or_else(|| LintError::UnknownPreset(name.to_string()))?
            }
            (None, None) => Preset::Recommended,
        };
        let recommended = recommended_config();
        let mut config = recommended.clone();
        config.merge(user);
        config.preset = Some(preset.name().to_string());

        let host = self.host;
        let rules = preset.rules().into_iter().map(|rule| match &host {
            Some(host) if rule.name() == no_pkg_dir_import::NAME => {
                Box::new(NoPkgDirImport::with_host(Arc::clone(host))) as RuleBox
            }
            _ => rule,
        });

        let analyzer = Analyzer::builder()
            .rules(rules)
            .rules(self.extra)
            .config(config)
            .build()?;
        debug!(?preset, rules = analyzer.rule_count(), "Built rule set");

        let mut processors: BTreeMap<&'static str, ProcessorBox> = BTreeMap::new();
        processors.insert(MANIFEST_FILE_NAME, Box::new(ManifestProcessor::new()));

        Ok(RuleSet {
            analyzer,
            processors,
            recommended,
        })
    }
}

/// Rules, processors and configuration, built once and shared by
/// reference across files.
pub struct RuleSet {
    analyzer: Analyzer,
    processors: BTreeMap<&'static str, ProcessorBox>,
    recommended: Config,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules().map(Rule::name).collect::<Vec<_>>())
            .field("processors", &self.processors.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RuleSet {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// The recommended rules with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in rules fail to register.
    pub fn recommended() -> Result<Self, LintError> {
        Self::builder().preset(Preset::Recommended).build()
    }

    /// Builds a rule set from the config file found in `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or names an unknown
    /// preset.
    pub fn discover(root: &Path) -> Result<Self, LintError> {
        Self::builder().config(load_config(root)?).build()
    }

    /// Registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.analyzer.rules()
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.analyzer.rule(rule_id)
    }

    /// The effective configuration: the recommended settings with the user
    /// configuration layered on top.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.analyzer.config()
    }

    /// Severity and options per rule id for the recommended preset.
    #[must_use]
    pub fn recommended_config(&self) -> &Config {
        &self.recommended
    }

    /// The processor registered for a file name (e.g. `package.json`).
    #[must_use]
    pub fn processor(&self, file_type: &str) -> Option<&dyn Processor> {
        self.processors.get(file_type).map(|p| &**p)
    }

    /// Lints an already parsed file.
    #[must_use]
    pub fn lint_ast(&self, path: &Path, ast: &Ast) -> LintResult {
        self.analyzer.lint(path, ast)
    }

    /// Parses and lints one file.
    ///
    /// Files with a registered processor go through it; everything else is
    /// parsed with the dialect implied by the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the text (or a processed chunk) does not parse.
    pub fn lint_text(&self, path: &Path, text: &str) -> Result<LintResult, LintError> {
        let parse_error = |source| LintError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let processor = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| self.processor(name));

        if self.analyzer.is_excluded(path) {
            debug!(path = %path.display(), "Skipping excluded file");
            return Ok(LintResult::new());
        }
        let Some(processor) = processor else {
            let ast = JavaScriptParser::for_path(path)
                .parse(text)
                .map_err(parse_error)?;
            return Ok(self.lint_ast(path, &ast));
        };

        let parser = JavaScriptParser::new();
        let mut chunks = Vec::new();
        for chunk in processor.preprocess(text, path) {
            let ast = parser.parse(&chunk).map_err(parse_error)?;
            chunks.push(self.lint_ast(path, &ast).diagnostics);
        }
        let mut result = LintResult::new();
        result.diagnostics = processor.postprocess(chunks, path);
        result.files_checked = 1;
        result.sort();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontlint_core::RuleConfig;
    use frontlint_rules::Severity;

    #[test]
    fn recommended_set() {
        let set = RuleSet::recommended().unwrap();
        assert_eq!(set.rules().count(), 8);
        assert!(set.rule("frontlint/no-empty-catch").is_some());
        assert!(set.rule("frontlint/no-new-error").is_none());
        assert!(set.processor("package.json").is_some());
        assert!(set.processor("tsconfig.json").is_none());
        assert_eq!(set.recommended_config().rules.len(), 8);
    }

    #[test]
    fn preset_from_config() {
        let mut config = Config::new();
        config.preset = Some("all".to_string());
        let set = RuleSet::builder().config(config).build().unwrap();
        assert_eq!(set.rules().count(), 10);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let mut config = Config::new();
        config.preset = Some("strict".to_string());
        let err = RuleSet::builder().config(config).build().unwrap_err();
        assert!(matches!(err, LintError::UnknownPreset(name) if name == "strict"));
    }

    #[test]
    fn lint_text_picks_the_dialect() {
        let set = RuleSet::recommended().unwrap();
        let result = set
            .lint_text(
                Path::new("src/a.ts"),
                "try { run() } catch (e: unknown) {}",
            )
            .unwrap();
        let ids: Vec<_> = result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["frontlint/use-error-in-catch", "frontlint/no-empty-catch"]);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let set = RuleSet::recommended().unwrap();
        let err = set.lint_text(Path::new("broken.js"), "function (").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse broken.js"));
    }

    #[test]
    fn user_config_is_layered_over_recommended() {
        let mut user = Config::new().with_rule(
            "frontlint/max-lines-per-function",
            RuleConfig::new().option("max", 40),
        );
        user.preset = Some("all".to_string());
        let set = RuleSet::builder().config(user).build().unwrap();
        let config = set.config();
        assert_eq!(config.preset.as_deref(), Some("all"));
        assert_eq!(
            config.options_for("frontlint/max-lines-per-function")["max"],
            serde_json::json!(40)
        );
        assert_eq!(
            config.rule_severity("frontlint/max-lines-per-function"),
            Some(Severity::Warning)
        );
        assert_eq!(
            config.options_for("frontlint/no-deep-relative-import")["max"],
            serde_json::json!(3)
        );
    }

    #[test]
    fn excluded_files_are_not_parsed() {
        let mut config = Config::new();
        config.exclude = vec!["**/dist/**".to_string()];
        let set = RuleSet::builder().config(config).build().unwrap();
        let result = set
            .lint_text(Path::new("pkg/dist/bundle.js"), "function (")
            .unwrap();
        assert!(result.diagnostics.is_empty());
        assert!(set.lint_text(Path::new("pkg/src/a.js"), "function (").is_err());
    }

    #[test]
    fn config_overrides_apply() {
        let config = Config::new().with_rule(
            "frontlint/no-empty-catch",
            RuleConfig::new().severity(Severity::Info),
        );
        let set = RuleSet::builder().config(config).build().unwrap();
        let result = set
            .lint_text(Path::new("a.js"), "try {} catch { }")
            .unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Info);
    }
}

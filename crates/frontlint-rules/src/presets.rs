//! Rule presets for common configurations.

use frontlint_core::{Config, RuleBox, RuleConfig};

use crate::{
    max_lines_per_function, no_deep_relative_import, package_disallow_deps, package_require_author,
    MaxLinesPerFunction, NoBatchImportOrExport, NoDeepRelativeImport, NoDuplicatedDeps,
    NoEmptyCatch, NoNewError, NoPkgDirImport, PackageDisallowDeps, PackageRequireAuthor,
    UseErrorInCatch,
};

/// Preset configurations for frontlint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every built-in rule.
    All,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::All => all_rules(),
        }
    }

    /// Config name of this preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::All => "all",
        }
    }

    /// Looks a preset up by its config name (`"recommended"`, `"all"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `max-lines-per-function` (FL001)
/// - `no-empty-catch` (FL002)
/// - `use-error-in-catch` (FL003)
/// - `no-deep-relative-import` (FL004)
/// - `no-duplicated-deps` (FL005)
/// - `package-disallow-deps` (FL006)
/// - `package-require-author` (FL007)
/// - `no-pkg-dir-import` (FL008)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MaxLinesPerFunction::new()),
        Box::new(NoEmptyCatch::new()),
        Box::new(UseErrorInCatch::new()),
        Box::new(NoDeepRelativeImport::new()),
        Box::new(NoDuplicatedDeps::new()),
        Box::new(PackageDisallowDeps::new()),
        Box::new(PackageRequireAuthor::new()),
        Box::new(NoPkgDirImport::new()),
    ]
}

/// Returns all available rules: the recommended set plus
/// `no-batch-import-or-export` (FL009) and `no-new-error` (FL010).
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    let mut rules = recommended_rules();
    rules.push(Box::new(NoBatchImportOrExport::new()));
    rules.push(Box::new(NoNewError::new()));
    rules
}

/// The recommended configuration: severity and options per rule id.
#[must_use]
pub fn recommended_config() -> Config {
    let mut config = Config::new();
    config.preset = Some(Preset::Recommended.name().to_string());
    for rule in recommended_rules() {
        let mut entry = RuleConfig::new().severity(rule.default_severity());
        entry = match rule.name() {
            max_lines_per_function::NAME => {
                entry.option("max", max_lines_per_function::DEFAULT_MAX)
            }
            no_deep_relative_import::NAME => {
                entry.option("max", no_deep_relative_import::DEFAULT_MAX)
            }
            package_disallow_deps::NAME => {
                entry.option("blocklist", serde_json::Value::Array(Vec::new()))
            }
            package_require_author::NAME => {
                entry.option("domain", package_require_author::DEFAULT_DOMAIN)
            }
            _ => entry,
        };
        config = config.with_rule(rule.name(), entry);
    }
    config
}

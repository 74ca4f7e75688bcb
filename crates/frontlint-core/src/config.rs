//! Configuration types for frontlint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration (`frontlint.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "all").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Glob patterns of files that are never linted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Per-rule configurations keyed by rule id.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Adds or replaces the configuration of one rule.
    #[must_use]
    pub fn with_rule(mut self, rule_id: impl Into<String>, rule: RuleConfig) -> Self {
        self.rules.insert(rule_id.into(), rule);
        self
    }

    /// Checks if a rule is enabled. Unlisted rules are enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<crate::Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Returns the options object configured for a rule, or `null`.
    #[must_use]
    pub fn options_for(&self, rule_id: &str) -> Value {
        self.rules
            .get(rule_id)
            .filter(|c| !c.options.is_empty())
            .map_or(Value::Null, |c| Value::Object(c.options.clone()))
    }

    /// Layers `other` on top of this configuration.
    ///
    /// Excludes are concatenated; per-rule settings from `other` win, and
    /// options are merged key by key.
    pub fn merge(&mut self, other: Config) {
        if other.preset.is_some() {
            self.preset = other.preset;
        }
        self.exclude.extend(other.exclude);
        for (id, rule) in other.rules {
            let entry = self.rules.entry(id).or_default();
            if rule.enabled.is_some() {
                entry.enabled = rule.enabled;
            }
            if rule.severity.is_some() {
                entry.severity = rule.severity;
            }
            entry.options.extend(rule.options);
        }
    }
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options, handed to the rule as a JSON object.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl RuleConfig {
    /// Creates an empty rule configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the severity override.
    #[must_use]
    pub fn severity(mut self, severity: crate::Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Enables or disables the rule.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets one option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

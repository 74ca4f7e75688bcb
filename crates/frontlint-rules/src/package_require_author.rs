//! Rule to require a company author on every package.
//!
//! # Rationale
//!
//! Ownership of a package must be traceable to a person with a company
//! address. `author` is required and must end with the configured domain;
//! if `maintainers` is present every entry must too.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // BAD: no author
//! { "name": "pkg" }
//!
//! // BAD: personal address
//! { "author": "dev@gmail.com" }
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! // GOOD
//! { "author": "dev@bytedance.com", "maintainers": ["ops@bytedance.com"] }
//! // GOOD: person object
//! { "author": { "name": "Dev", "email": "dev@bytedance.com" } }
//! ```

use frontlint_core::{Ast, Diagnostic, FileContext, MessageData, Node, NodeId, Rule, Severity};
use serde::Deserialize;

use crate::manifest::{object_entries, ManifestTree};

/// Rule code for package-require-author.
pub const CODE: &str = "FL007";

/// Rule name for package-require-author.
pub const NAME: &str = "frontlint/package-require-author";

/// Default required e-mail domain.
pub const DEFAULT_DOMAIN: &str = "@bytedance.com";

/// Options for [`PackageRequireAuthor`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorOptions {
    /// Suffix every author address must end with.
    pub domain: String,
}

impl Default for AuthorOptions {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

/// Requires `author` (and `maintainers`, when present) to use a domain.
#[derive(Debug, Clone)]
pub struct PackageRequireAuthor {
    /// Custom severity.
    pub severity: Severity,
    /// Domain used when no options are configured.
    pub defaults: AuthorOptions,
}

impl Default for PackageRequireAuthor {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageRequireAuthor {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            defaults: AuthorOptions::default(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the default domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.defaults.domain = domain.into();
        self
    }
}

/// The address of a person field: a string, or the `email` of an object.
fn person_address<'a>(ast: &'a Ast, value: NodeId) -> Option<&'a str> {
    match ast.node(value) {
        Node::ObjectExpression { .. } => object_entries(ast, value)
            .into_iter()
            .find(|(key, _, _)| key == "email")
            .and_then(|(_, _, email)| ast.node(email).string_value()),
        other => other.string_value(),
    }
}

impl Rule for PackageRequireAuthor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires package authors and maintainers to use the company domain"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("missingAuthor", "package.json must declare an author."),
            (
                "invalidAuthor",
                "Author '{{author}}' must be an address ending with '{{domain}}'.",
            ),
            (
                "invalidMaintainers",
                "Every maintainer must be an address ending with '{{domain}}'.",
            ),
        ]
    }

    fn options_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "domain": { "type": "string" } },
            "additionalProperties": false
        })
    }

    fn check(&self, ctx: &FileContext, ast: &Ast) -> Vec<Diagnostic> {
        if !ctx.is_manifest() {
            return Vec::new();
        }
        let Some(options) = ctx.resolve_options(NAME, &self.defaults) else {
            return Vec::new();
        };
        let Some(manifest) = ManifestTree::locate(ast) else {
            return Vec::new();
        };
        let domain = options.domain.as_str();
        let mut diagnostics = Vec::new();

        match manifest.field_value("author") {
            None => diagnostics.push(ctx.report(
                self,
                ast,
                manifest.object(),
                "missingAuthor",
                MessageData::new(),
            )),
            Some(author) => {
                let address = person_address(ast, author);
                if !address.is_some_and(|a| a.ends_with(domain)) {
                    let shown = address.unwrap_or_else(|| ast.text(author));
                    diagnostics.push(ctx.report(
                        self,
                        ast,
                        author,
                        "invalidAuthor",
                        MessageData::new()
                            .with("author", shown)
                            .with("domain", domain),
                    ));
                }
            }
        }

        if let Some(maintainers) = manifest.field_value("maintainers") {
            let valid = match ast.node(maintainers) {
                Node::ArrayExpression { elements } => elements.iter().all(|&m| {
                    person_address(ast, m).is_some_and(|a| a.ends_with(domain))
                }),
                _ => false,
            };
            if !valid {
                diagnostics.push(ctx.report(
                    self,
                    ast,
                    maintainers,
                    "invalidMaintainers",
                    MessageData::new().with("domain", domain),
                ));
            }
        }
        diagnostics
    }
}

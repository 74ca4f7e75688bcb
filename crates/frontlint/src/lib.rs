//! # frontlint
//!
//! Structural and package-policy linter for JavaScript monorepos.
//!
//! This is the facade crate: it re-exports the core types, wires the
//! built-in rules, the JavaScript parser and the `package.json` processor
//! into a [`RuleSet`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frontlint::RuleSet;
//!
//! let rules = RuleSet::discover(Path::new("."))?; // reads frontlint.toml
//! let result = rules.lint_text(Path::new("src/index.ts"), &source)?;
//! for diagnostic in &result.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```
//!
//! ## Manifests
//!
//! `package.json` files are routed through [`ManifestProcessor`], which
//! lets the manifest rules (`no-duplicated-deps`, `package-disallow-deps`,
//! `package-require-author`) inspect them as an object literal.
//!
//! ## Configuration
//!
//! ```toml
//! preset = "recommended"
//! exclude = ["**/node_modules/**"]
//!
//! [rules."frontlint/max-lines-per-function"]
//! severity = "warning"
//! max = 200
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use frontlint_core::*;

pub use frontlint_js::{Dialect, JavaScriptParser, ParseError, SourceParser};

/// Built-in rules and presets.
pub mod rules {
    pub use frontlint_rules::*;
}

mod processors;
mod registry;

pub use processors::ManifestProcessor;
pub use registry::{load_config, LintError, RuleSet, RuleSetBuilder, CONFIG_CANDIDATES};

//! # frontlint-core
//!
//! Core framework for linting a JavaScript/TypeScript monorepo.
//!
//! This crate provides the foundational traits and types for building
//! rules. It includes:
//!
//! - [`Ast`], the arena syntax tree rules walk, and the [`Visit`] trait
//! - [`Rule`] trait for per-file rules with a message catalog
//! - [`Processor`] trait for file types that are rewritten before parsing
//! - [`Analyzer`] for running configured rules over one file
//! - [`Diagnostic`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use frontlint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(MyRule)
//!     .config(Config::from_file("frontlint.toml".as_ref())?)
//!     .build()?;
//!
//! let result = analyzer.lint(path, &ast);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Arena syntax tree and visitor.
pub mod ast;
mod analyzer;
mod config;
mod context;
mod processor;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use ast::{
    walk, walk_from, Ast, AstBuilder, Function, FunctionKind, Literal, MethodKind, Node, NodeId,
    PropertyKind, Span, Visit,
};
pub use config::{Config, ConfigError, RuleConfig};
pub use context::{FileContext, MANIFEST_FILE_NAME};
pub use processor::{Processor, ProcessorBox};
pub use rule::{Rule, RuleBox, RULE_NAMESPACE};
pub use types::{Diagnostic, Fix, LintResult, Location, MessageData, Severity};

//! # frontlint-js
//!
//! Tree-sitter based parsing layer for frontlint.
//!
//! Lowers JavaScript, TypeScript and TSX sources into the
//! `frontlint-core` [`Ast`](frontlint_core::Ast) so rules never touch
//! tree-sitter types:
//!
//! - [`SourceParser`] trait for pluggable dialects
//! - [`JavaScriptParser`] for the JavaScript family, selected by [`Dialect`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod javascript;
pub mod parser;

pub use javascript::{Dialect, JavaScriptParser};
pub use parser::{ParseError, SourceParser};

//! Parser trait and errors.
//!
//! `SourceParser` is the extension point between source text and the
//! [`Ast`] the rules walk. Implement it to teach frontlint a new dialect.

use frontlint_core::Ast;
use thiserror::Error;

/// Errors produced while parsing a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Dialect being loaded.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The parser returned no tree.
    #[error("{language} parser produced no tree")]
    NoTree {
        /// Dialect being parsed.
        language: &'static str,
    },

    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },
}

/// Turns source text into an [`Ast`].
pub trait SourceParser: Send + Sync {
    /// Identifier of the dialect (e.g. `"javascript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions handled by this parser, with leading dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses a whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the text does not
    /// parse cleanly.
    fn parse(&self, source: &str) -> Result<Ast, ParseError>;
}

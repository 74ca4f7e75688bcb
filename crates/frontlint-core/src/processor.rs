//! File-type processors that rewrite text before parsing.

use crate::types::Diagnostic;
use std::path::Path;

/// Turns a file that is not plain source into parseable chunks and filters
/// the diagnostics reported on them.
///
/// Each chunk returned by [`Processor::preprocess`] is parsed and linted on
/// its own; the diagnostics of chunk `i` arrive at
/// [`Processor::postprocess`] as `chunks[i]`.
pub trait Processor: Send + Sync {
    /// Rewrites `text` into one or more source chunks.
    fn preprocess(&self, text: &str, path: &Path) -> Vec<String>;

    /// Merges per-chunk diagnostics into the final list.
    fn postprocess(&self, chunks: Vec<Vec<Diagnostic>>, path: &Path) -> Vec<Diagnostic>;

    /// Whether fixes computed on the chunks are valid for the original text.
    fn supports_autofix(&self) -> bool {
        false
    }
}

/// Type alias for boxed Processor trait objects.
pub type ProcessorBox = Box<dyn Processor>;

//! File-type processors.

use std::path::Path;

use frontlint_core::{Diagnostic, Location, Processor, RULE_NAMESPACE};
use frontlint_rules::MANIFEST_PREFIX;
use tracing::debug;

/// Lets manifest rules see `package.json` as a script.
///
/// The JSON text is prefixed with `module.exports = ` so it parses as an
/// assignment of an object literal. Afterwards only `frontlint/`
/// diagnostics are kept, since generic script rules have nothing useful
/// to say about a manifest, and locations are mapped back onto the
/// original text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestProcessor;

impl ManifestProcessor {
    /// Creates the processor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Moves a location from the prefixed chunk back onto the manifest.
fn unshift(mut location: Location) -> Location {
    let prefix = MANIFEST_PREFIX.len();
    location.offset = location.offset.saturating_sub(prefix);
    if location.line == 1 {
        location.column = location.column.saturating_sub(prefix).max(1);
    }
    if location.end_line == 1 {
        location.end_column = location.end_column.saturating_sub(prefix).max(1);
    }
    location
}

impl Processor for ManifestProcessor {
    fn preprocess(&self, text: &str, _path: &Path) -> Vec<String> {
        vec![format!("{MANIFEST_PREFIX}{text}")]
    }

    fn postprocess(&self, chunks: Vec<Vec<Diagnostic>>, path: &Path) -> Vec<Diagnostic> {
        let total: usize = chunks.iter().map(Vec::len).sum();
        let kept: Vec<Diagnostic> = chunks
            .into_iter()
            .flatten()
            .filter(|d| d.in_namespace(RULE_NAMESPACE))
            .map(|mut d| {
                d.location = unshift(d.location);
                d.fix = None;
                d
            })
            .collect();
        debug!(
            "Manifest {}: kept {} of {} diagnostics",
            path.display(),
            kept.len(),
            total
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontlint_core::{Fix, Severity};
    use std::path::PathBuf;

    fn diagnostic(rule_id: &str, line: usize, column: usize, offset: usize) -> Diagnostic {
        Diagnostic::new(
            rule_id,
            "X",
            Severity::Error,
            Location::new(PathBuf::from("package.json"), line, column)
                .with_end(line, column + 2)
                .with_span(offset, 2),
            "id",
            "message",
        )
    }

    #[test]
    fn preprocess_prefixes_the_document() {
        let chunks = ManifestProcessor::new().preprocess("{}", Path::new("package.json"));
        assert_eq!(chunks, vec!["module.exports = {}".to_string()]);
    }

    #[test]
    fn postprocess_keeps_only_namespaced_rules() {
        let chunks = vec![vec![
            diagnostic("frontlint/no-duplicated-deps", 3, 5, 40),
            diagnostic("semi", 1, 20, 19),
        ]];
        let kept = ManifestProcessor::new().postprocess(chunks, Path::new("package.json"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rule_id, "frontlint/no-duplicated-deps");
        assert_eq!(kept[0].location.offset, 40 - MANIFEST_PREFIX.len());
        assert_eq!(kept[0].location.column, 5);
    }

    #[test]
    fn first_line_columns_are_unshifted() {
        let chunks = vec![vec![diagnostic("frontlint/x", 1, 18, 17)]];
        let kept = ManifestProcessor::new().postprocess(chunks, Path::new("package.json"));
        assert_eq!(kept[0].location.column, 1);
        assert_eq!(kept[0].location.end_column, 3);
        assert_eq!(kept[0].location.offset, 0);
    }

    #[test]
    fn fixes_are_dropped() {
        let processor = ManifestProcessor::new();
        assert!(!processor.supports_autofix());
        let chunks = vec![vec![diagnostic("frontlint/x", 2, 1, 30).with_fix(Fix::new(30, 1, "y"))]];
        let kept = processor.postprocess(chunks, Path::new("package.json"));
        assert!(kept[0].fix.is_none());
    }
}

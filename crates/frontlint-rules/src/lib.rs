//! # frontlint-rules
//!
//! Built-in lint rules for frontlint, plus the analyses they share.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | FL001 | `max-lines-per-function` | Limits the physical length of functions |
//! | FL002 | `no-empty-catch` | Forbids catch blocks that do nothing |
//! | FL003 | `use-error-in-catch` | Requires the caught error to be used |
//! | FL004 | `no-deep-relative-import` | Limits `../` chains in import specifiers |
//! | FL005 | `no-duplicated-deps` | Forbids a package in both dependency sections |
//! | FL006 | `package-disallow-deps` | Blocks dependencies by name or version range |
//! | FL007 | `package-require-author` | Requires company authors and maintainers |
//! | FL008 | `no-pkg-dir-import` | Forbids imports past a package's exports map |
//! | FL009 | `no-batch-import-or-export` | Forbids `import * as` and `export *` |
//! | FL010 | `no-new-error` | Forbids bare `new Error()` |
//!
//! Every rule id is prefixed with `frontlint/`.
//!
//! ## Usage
//!
//! ```ignore
//! use frontlint_core::Analyzer;
//! use frontlint_rules::{NoEmptyCatch, MaxLinesPerFunction};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(NoEmptyCatch::new())
//!     .rule(MaxLinesPerFunction::new().max(80))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocks;
pub mod boundary;
pub mod callable;
pub mod host;
pub mod manifest;
pub mod path_depth;
pub mod semver_range;

pub mod max_lines_per_function;
pub mod no_batch_import_or_export;
pub mod no_deep_relative_import;
pub mod no_duplicated_deps;
pub mod no_empty_catch;
pub mod no_new_error;
pub mod no_pkg_dir_import;
pub mod package_disallow_deps;
pub mod package_require_author;
pub mod use_error_in_catch;

mod presets;

#[cfg(test)]
pub(crate) mod testing;

pub use host::{FsHost, LocatedManifest, ManifestLookup, ModuleResolver, PackageHost};
pub use manifest::MANIFEST_PREFIX;
pub use max_lines_per_function::MaxLinesPerFunction;
pub use no_batch_import_or_export::NoBatchImportOrExport;
pub use no_deep_relative_import::NoDeepRelativeImport;
pub use no_duplicated_deps::NoDuplicatedDeps;
pub use no_empty_catch::NoEmptyCatch;
pub use no_new_error::NoNewError;
pub use no_pkg_dir_import::NoPkgDirImport;
pub use package_disallow_deps::PackageDisallowDeps;
pub use package_require_author::PackageRequireAuthor;
pub use presets::{all_rules, recommended_config, recommended_rules, Preset};
pub use semver_range::{RangeError, VersionRange};
pub use use_error_in_catch::UseErrorInCatch;

/// Re-export core types for convenience.
pub use frontlint_core::{Diagnostic, Rule, Severity};

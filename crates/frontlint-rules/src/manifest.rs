//! Package manifest views.
//!
//! Manifest rules see `package.json` after the manifest processor has
//! rewritten it to `module.exports = {...}`, so they work on the syntax tree
//! through [`ManifestTree`]. Boundary resolution reads manifests from disk
//! through the serde [`Manifest`] model instead.

use frontlint_core::{Ast, Node, NodeId};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text prepended to a manifest so it parses as a script.
pub const MANIFEST_PREFIX: &str = "module.exports = ";

/// Section of the manifest a dependency is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Dev,
}

impl DependencyKind {
    /// Manifest field holding this section.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Dev => "devDependencies",
        }
    }
}

/// One `"name": "range"` entry of a dependency section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Package name.
    pub name: String,
    /// Declared range, when the value is a string.
    pub range: Option<String>,
    /// Section the entry belongs to.
    pub kind: DependencyKind,
    /// The property node, for reporting.
    pub property: NodeId,
}

/// View over the object literal of a preprocessed manifest.
#[derive(Debug, Clone, Copy)]
pub struct ManifestTree<'a> {
    ast: &'a Ast,
    object: NodeId,
}

impl<'a> ManifestTree<'a> {
    /// Finds the top-level `x = { ... }` assignment.
    ///
    /// Returns `None` when the file has no such statement, e.g. when the
    /// manifest is not an object.
    #[must_use]
    pub fn locate(ast: &'a Ast) -> Option<Self> {
        ast.children(ast.root()).iter().find_map(|&stmt| {
            let Node::ExpressionStatement { expression } = ast.node(stmt) else {
                return None;
            };
            let Node::AssignmentExpression { right, .. } = ast.node(*expression) else {
                return None;
            };
            matches!(ast.node(*right), Node::ObjectExpression { .. }).then_some(Self {
                ast,
                object: *right,
            })
        })
    }

    /// The manifest object node.
    #[must_use]
    pub fn object(&self) -> NodeId {
        self.object
    }

    /// Top-level `(key, property, value)` entries in source order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, NodeId, NodeId)> {
        object_entries(self.ast, self.object)
    }

    /// The property node for `key`; the first one wins on duplicates.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<NodeId> {
        self.entries()
            .into_iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, property, _)| property)
    }

    /// The value node for `key`.
    #[must_use]
    pub fn field_value(&self, key: &str) -> Option<NodeId> {
        self.entries()
            .into_iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, _, value)| value)
    }

    /// The value of `key` when it is a string literal.
    #[must_use]
    pub fn string_field(&self, key: &str) -> Option<&'a str> {
        self.field_value(key)
            .and_then(|value| self.ast.node(value).string_value())
    }

    /// Entries of one dependency section. A missing or non-object section
    /// yields nothing.
    #[must_use]
    pub fn dependencies(&self, kind: DependencyKind) -> Vec<DependencyEntry> {
        let Some(section) = self.field_value(kind.field()) else {
            return Vec::new();
        };
        object_entries(self.ast, section)
            .into_iter()
            .map(|(name, property, value)| DependencyEntry {
                name,
                range: self.ast.node(value).string_value().map(str::to_string),
                kind,
                property,
            })
            .collect()
    }
}

/// Lists `(key, property, value)` for the statically keyed properties of an
/// object literal. Spreads and computed keys are skipped.
#[must_use]
pub fn object_entries(ast: &Ast, object: NodeId) -> Vec<(String, NodeId, NodeId)> {
    let Node::ObjectExpression { properties } = ast.node(object) else {
        return Vec::new();
    };
    properties
        .iter()
        .filter_map(|&property| match ast.node(property) {
            Node::Property {
                key,
                value,
                computed: false,
                ..
            } => {
                let name = match ast.node(*key) {
                    Node::Identifier { name } => Some(name.clone()),
                    other => other.string_value().map(str::to_string),
                }?;
                Some((name, property, *value))
            }
            _ => None,
        })
        .collect()
}

/// The fields of `package.json` that boundary resolution reads.
///
/// Fields of an unexpected JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    /// Package name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Legacy entry point.
    #[serde(default, deserialize_with = "lenient_string")]
    pub main: Option<String>,
    /// The `exports` field as written.
    #[serde(default)]
    pub exports: Option<Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Shape of a package's declared export surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSurface {
    /// No `exports` field, or one of an unusable type.
    Absent,
    /// `"exports": "./index.js"`; only the root is importable.
    Legacy(String),
    /// `"exports": { "./sub": ... }`; the listed keys.
    Map(Vec<String>),
}

impl Manifest {
    /// Parses manifest JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Classifies the `exports` field.
    #[must_use]
    pub fn export_surface(&self) -> ExportSurface {
        match &self.exports {
            Some(Value::String(entry)) => ExportSurface::Legacy(entry.clone()),
            Some(Value::Object(map)) => ExportSurface::Map(map.keys().cloned().collect()),
            _ => ExportSurface::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse;

    fn tree_of(json: &str) -> Ast {
        parse(&format!("{MANIFEST_PREFIX}{json}"))
    }

    #[test]
    fn locates_the_manifest_object() {
        let ast = tree_of(r#"{ "name": "pkg", "private": true }"#);
        let tree = ManifestTree::locate(&ast).expect("manifest");
        assert_eq!(tree.string_field("name"), Some("pkg"));
        assert_eq!(tree.string_field("private"), None);
        assert!(tree.field("version").is_none());
        assert_eq!(tree.entries().len(), 2);
    }

    #[test]
    fn non_object_manifest_has_no_tree() {
        let ast = tree_of("[1, 2]");
        assert!(ManifestTree::locate(&ast).is_none());
    }

    #[test]
    fn lists_dependency_entries() {
        let ast = tree_of(
            r#"{
  "dependencies": { "react": "^18.0.0", "local": { "path": "x" } },
  "devDependencies": { "jest": "29" }
}"#,
        );
        let tree = ManifestTree::locate(&ast).expect("manifest");
        let runtime = tree.dependencies(DependencyKind::Runtime);
        assert_eq!(runtime.len(), 2);
        assert_eq!(runtime[0].name, "react");
        assert_eq!(runtime[0].range.as_deref(), Some("^18.0.0"));
        assert_eq!(runtime[1].range, None);
        let dev = tree.dependencies(DependencyKind::Dev);
        assert_eq!(dev.len(), 1);
        assert_eq!(dev[0].kind, DependencyKind::Dev);
        assert_eq!(ast.text(dev[0].property), r#""jest": "29""#);
    }

    #[test]
    fn non_object_sections_are_empty() {
        let ast = tree_of(r#"{ "dependencies": "react" }"#);
        let tree = ManifestTree::locate(&ast).expect("manifest");
        assert!(tree.dependencies(DependencyKind::Runtime).is_empty());
        assert!(tree.dependencies(DependencyKind::Dev).is_empty());
    }

    #[test]
    fn export_surface_shapes() {
        let legacy = Manifest::from_json(r#"{ "name": "a", "exports": "./index.js" }"#).unwrap();
        assert_eq!(legacy.export_surface(), ExportSurface::Legacy("./index.js".into()));

        let map = Manifest::from_json(r#"{ "exports": { ".": "./i.js", "./sub/*": "./s/*.js" } }"#)
            .unwrap();
        assert_eq!(
            map.export_surface(),
            ExportSurface::Map(vec![".".into(), "./sub/*".into()])
        );

        let absent = Manifest::from_json(r#"{ "name": "a" }"#).unwrap();
        assert_eq!(absent.export_surface(), ExportSurface::Absent);

        let odd = Manifest::from_json(r#"{ "exports": ["./a.js"] }"#).unwrap();
        assert_eq!(odd.export_surface(), ExportSurface::Absent);
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let manifest = Manifest::from_json(r#"{ "name": 42, "main": null }"#).unwrap();
        assert_eq!(manifest.name, None);
        assert_eq!(manifest.main, None);
    }
}

//! Classification and naming of function-like nodes.
//!
//! A function that is the value of a class method, an object method or
//! accessor, or a class field is *embedded*: its own span starts at the
//! parameter list, so naming and measurement use the enclosing declaration
//! instead. Otherwise a getter written as `get\nfoo\n() {}` would be both
//! nameless and undercounted.

use std::fmt;

use frontlint_core::{Ast, FunctionKind, Literal, MethodKind, Node, NodeId, PropertyKind};

/// Syntactic kind of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    /// `function foo() {}` statement.
    Declaration,
    /// `function () {}` expression.
    Expression,
    /// `() => {}`
    Arrow,
    /// Class or object method, or class field initializer.
    Method,
    /// `get x() {}`
    Getter,
    /// `set x(v) {}`
    Setter,
    /// Class constructor.
    Constructor,
}

/// Node that supplied the callable's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Class method definition.
    Method,
    /// Object literal property.
    Property,
    /// Class field.
    Field,
    /// Call whose argument the callable is.
    Call,
    /// `const x = ...` declarator.
    Declarator,
}

/// Resolved name of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableName {
    /// `#name` class member; rendered unquoted.
    Private(String),
    /// Statically known name; rendered as `'name'`.
    Static(String),
}

impl fmt::Display for CallableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private(name) => write!(f, "#{name}"),
            Self::Static(name) => write!(f, "'{name}'"),
        }
    }
}

/// Classification of one function-like node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDescriptor {
    /// Kind token.
    pub kind: CallableKind,
    /// Declared `static`.
    pub is_static: bool,
    /// Keyed by a `#private` name.
    pub is_private: bool,
    /// `async`.
    pub is_async: bool,
    /// Generator.
    pub is_generator: bool,
    /// Resolved name, if any.
    pub name: Option<CallableName>,
    /// Container the name came from.
    pub container: Option<ContainerKind>,
    /// Node whose span is measured: the enclosing declaration when
    /// embedded, the function itself otherwise.
    pub target: NodeId,
}

impl CallableDescriptor {
    /// Renders the descriptor, e.g. `static async method 'load'` or
    /// `Arrow function`.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.kind == CallableKind::Constructor {
            return "constructor".to_string();
        }
        let mut tokens: Vec<String> = Vec::new();
        for (present, token) in [
            (self.is_static, "static"),
            (self.is_private, "private"),
            (self.is_async, "async"),
            (self.is_generator, "generator"),
        ] {
            if present {
                tokens.push(token.to_string());
            }
        }
        tokens.push(
            match self.kind {
                CallableKind::Getter => "getter",
                CallableKind::Setter => "setter",
                CallableKind::Method => "method",
                CallableKind::Arrow => "Arrow function",
                _ => "function",
            }
            .to_string(),
        );
        if let Some(name) = &self.name {
            tokens.push(name.to_string());
        }
        tokens.join(" ")
    }
}

impl fmt::Display for CallableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Classifies a function node. Returns `None` for any other node.
#[must_use]
pub fn classify(ast: &Ast, id: NodeId) -> Option<CallableDescriptor> {
    let function = ast.node(id).as_function()?;
    let parent = ast.parent(id);
    let embedding = parent.filter(|&p| embeds(ast.node(p), id));

    let (is_static, is_private, kind) = match embedding.map(|p| ast.node(p)) {
        Some(Node::MethodDefinition {
            key,
            kind,
            is_static,
            ..
        }) => (
            *is_static,
            is_private_key(ast, *key),
            match kind {
                MethodKind::Constructor => CallableKind::Constructor,
                MethodKind::Get => CallableKind::Getter,
                MethodKind::Set => CallableKind::Setter,
                MethodKind::Method => CallableKind::Method,
            },
        ),
        Some(Node::Property { key, kind, .. }) => (
            false,
            is_private_key(ast, *key),
            match kind {
                PropertyKind::Get => CallableKind::Getter,
                PropertyKind::Set => CallableKind::Setter,
                PropertyKind::Init => CallableKind::Method,
            },
        ),
        Some(Node::PropertyDefinition { key, is_static, .. }) => {
            (*is_static, is_private_key(ast, *key), CallableKind::Method)
        }
        _ => (
            false,
            false,
            match function.kind {
                FunctionKind::Arrow => CallableKind::Arrow,
                FunctionKind::Declaration => CallableKind::Declaration,
                FunctionKind::Expression => CallableKind::Expression,
            },
        ),
    };

    let (container, container_name) = parent
        .and_then(|p| container_name(ast, p, id))
        .map_or((None, None), |(kind, name)| (Some(kind), name));
    let name = container_name.or_else(|| {
        function
            .id
            .and_then(|fid| ast.node(fid).identifier_name())
            .map(|n| CallableName::Static(n.to_string()))
    });

    Some(CallableDescriptor {
        kind,
        is_static,
        is_private,
        is_async: function.is_async,
        is_generator: function.is_generator,
        name,
        container,
        target: embedding.unwrap_or(id),
    })
}

/// Inclusive line count of a node: `end_line - start_line + 1`.
#[must_use]
pub fn measure(ast: &Ast, id: NodeId) -> usize {
    ast.end_line(id).saturating_sub(ast.start_line(id)) + 1
}

/// Returns true if `parent` is a declaration whose value is `child`.
fn embeds(parent: &Node, child: NodeId) -> bool {
    match parent {
        Node::MethodDefinition { value, .. } => *value == child,
        Node::Property {
            value,
            method,
            kind,
            ..
        } => *value == child && (*method || *kind != PropertyKind::Init),
        Node::PropertyDefinition { value, .. } => *value == Some(child),
        _ => false,
    }
}

fn is_private_key(ast: &Ast, key: NodeId) -> bool {
    matches!(ast.node(key), Node::PrivateIdentifier { .. })
}

/// Names the callable from its container, if the parent is one.
///
/// The outer `Option` says whether `parent` is a naming container; the
/// inner one whether a name could be evaluated.
fn container_name(
    ast: &Ast,
    parent: NodeId,
    child: NodeId,
) -> Option<(ContainerKind, Option<CallableName>)> {
    match ast.node(parent) {
        Node::MethodDefinition {
            key,
            value,
            computed,
            ..
        } if *value == child => Some((ContainerKind::Method, key_name(ast, *key, *computed))),
        Node::Property {
            key,
            value,
            computed,
            ..
        } if *value == child => Some((ContainerKind::Property, key_name(ast, *key, *computed))),
        Node::PropertyDefinition {
            key,
            value,
            computed,
            ..
        } if *value == Some(child) => {
            Some((ContainerKind::Field, key_name(ast, *key, *computed)))
        }
        Node::CallExpression { callee, .. } => Some((
            ContainerKind::Call,
            static_name(ast, *callee, false).map(CallableName::Static),
        )),
        Node::VariableDeclarator { id, init } if *init == Some(child) => Some((
            ContainerKind::Declarator,
            static_name(ast, *id, false).map(CallableName::Static),
        )),
        _ => None,
    }
}

fn key_name(ast: &Ast, key: NodeId, computed: bool) -> Option<CallableName> {
    match ast.node(key) {
        Node::PrivateIdentifier { name } => Some(CallableName::Private(name.clone())),
        _ => static_name(ast, key, computed).map(CallableName::Static),
    }
}

/// Evaluates a key, id or callee to a string without running code.
///
/// Succeeds for non-computed identifiers, primitive literals and
/// interpolation-free template literals.
#[must_use]
pub fn static_name(ast: &Ast, id: NodeId, computed: bool) -> Option<String> {
    match ast.node(id) {
        Node::Identifier { name } if !computed => Some(name.clone()),
        Node::Literal(literal) => match literal {
            Literal::String(s) => Some(s.clone()),
            Literal::Number { raw, value } => Some(number_to_string(raw, *value)),
            Literal::Boolean(b) => Some(b.to_string()),
            Literal::Null => Some("null".to_string()),
            Literal::Regex(_) => None,
        },
        Node::TemplateLiteral {
            quasis,
            expressions,
        } if expressions.is_empty() && quasis.len() == 1 => quasis.first().cloned(),
        _ => None,
    }
}

fn number_to_string(raw: &str, value: f64) -> String {
    if value.is_nan() {
        raw.to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse;

    /// Describes every function in source order.
    fn describe_all(src: &str) -> Vec<(String, usize)> {
        let ast = parse(src);
        ast.descendants(ast.root())
            .filter_map(|id| classify(&ast, id))
            .map(|d| (d.describe(), measure(&ast, d.target)))
            .collect()
    }

    fn describe_one(src: &str) -> String {
        describe_all(src)
            .into_iter()
            .next()
            .map(|(name, _)| name)
            .expect("no function")
    }

    #[test]
    fn plain_functions() {
        assert_eq!(describe_one("function name() {}"), "function 'name'");
        assert_eq!(describe_one("var func = function() {\n}"), "function 'func'");
        assert_eq!(describe_one("const bar = () => 2"), "Arrow function 'bar'");
        assert_eq!(describe_one("() => {}"), "Arrow function");
        assert_eq!(describe_one("(function () {})()"), "function");
        assert_eq!(
            describe_one("function* generator() { yield 1; }"),
            "generator function 'generator'"
        );
        assert_eq!(
            describe_one("const load = async () => {}"),
            "async Arrow function 'load'"
        );
    }

    #[test]
    fn call_arguments_are_named_by_callee() {
        assert_eq!(describe_one("describe(() => {})"), "Arrow function 'describe'");
        assert_eq!(describe_one("a.b(function named() {})"), "function 'named'");
    }

    #[test]
    fn class_members() {
        let described: Vec<String> = describe_all(
            "class A {\n  constructor() {}\n  method() {}\n  static foo(a) {}\n  #privateMethod() {}\n  static async *gen() {}\n  handler = () => {};\n  static #hidden = function () {};\n}",
        )
        .into_iter()
        .map(|(name, _)| name)
        .collect();
        assert_eq!(
            described,
            vec![
                "constructor",
                "method 'method'",
                "static method 'foo'",
                "private method #privateMethod",
                "static async generator method 'gen'",
                "method 'handler'",
                "static private method #hidden",
            ]
        );
    }

    #[test]
    fn accessors_are_measured_from_the_declaration() {
        let found = describe_all("var obj = {\n    get\n    foo\n    () {\n        return 1\n    }\n}");
        assert_eq!(found, vec![("getter 'foo'".to_string(), 5)]);

        let found = describe_all("var obj = {\n    set\n    foo\n    ( val ) {\n        this._foo = val;\n    }\n}");
        assert_eq!(found, vec![("setter 'foo'".to_string(), 5)]);
    }

    #[test]
    fn object_members() {
        let described: Vec<String> =
            describe_all("({ run() {}, 'quoted': function () {}, arrow: () => {}, [k]: () => {} })")
                .into_iter()
                .map(|(name, _)| name)
                .collect();
        assert_eq!(
            described,
            vec![
                "method 'run'",
                "function 'quoted'",
                "Arrow function 'arrow'",
                "Arrow function",
            ]
        );
    }

    #[test]
    fn computed_keys() {
        let found = describe_all(
            "class A {\n    static\n    [\n        foo +\n            bar\n    ]\n    (a) {\n        return a\n    }\n}",
        );
        assert_eq!(found, vec![("static method".to_string(), 8)]);

        let found = describe_all("class A {\n  static\n  [\n    `s`\n  ]\n  () {\n\n  }\n}");
        assert_eq!(found, vec![("static method 's'".to_string(), 7)]);

        let found = describe_all("class A {\n  static\n  \"literal\"\n  () {\n\n  }\n}");
        assert_eq!(found, vec![("static method 'literal'".to_string(), 5)]);

        let found = describe_all("class A {\n  static\n  null\n  () {\n\n  }\n}");
        assert_eq!(found, vec![("static method 'null'".to_string(), 5)]);

        assert_eq!(describe_one("class A { [1.5]() {} }"), "method '1.5'");
        assert_eq!(describe_one("class A { [`a${b}`]() {} }"), "method");
    }

    #[test]
    fn measure_is_inclusive_and_ignores_carriage_returns() {
        let lf = describe_all("function name() {\nvar x = 5;\n\t\n \n\nvar x = 2;\n}");
        let crlf = describe_all("function name() {\r\nvar x = 5;\r\n\t\r\n \r\n\r\nvar x = 2;\r\n}");
        assert_eq!(lf, vec![("function 'name'".to_string(), 7)]);
        assert_eq!(crlf, lf);
    }

    #[test]
    fn non_functions_are_not_classified() {
        let ast = parse("const x = 1;");
        assert!(ast
            .descendants(ast.root())
            .all(|id| classify(&ast, id).is_none()));
    }
}

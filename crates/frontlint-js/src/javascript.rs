//! JavaScript and TypeScript parsing using Tree-sitter.
//!
//! The concrete syntax tree is lowered into frontlint's arena [`Ast`]: the
//! shapes rules match on get a typed [`Node`], everything else becomes
//! [`Node::Other`] with its named children kept, so subtree searches still
//! see every identifier.

use std::path::Path;

use frontlint_core::{
    Ast, AstBuilder, Function, FunctionKind, Literal, MethodKind, Node, NodeId, PropertyKind,
    Span,
};
use tracing::debug;
use tree_sitter::{Language, Node as TsNode, Parser};

use crate::parser::{ParseError, SourceParser};

/// Source dialect handled by [`JavaScriptParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `.js`, `.jsx`, `.mjs`, `.cjs` (JSX included).
    #[default]
    JavaScript,
    /// `.ts`, `.mts`, `.cts`
    TypeScript,
    /// `.tsx`
    Tsx,
}

impl Dialect {
    /// Picks the dialect from a file extension; unknown extensions are
    /// treated as JavaScript.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            Some("tsx") => Self::Tsx,
            _ => Self::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &[".js", ".jsx", ".mjs", ".cjs"],
            Self::TypeScript => &[".ts", ".mts", ".cts"],
            Self::Tsx => &[".tsx"],
        }
    }
}

/// Parses JavaScript-family source into an [`Ast`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptParser {
    dialect: Dialect,
}

impl JavaScriptParser {
    /// Creates a parser for plain JavaScript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser for the given dialect.
    #[must_use]
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Creates a parser for the dialect implied by `path`.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self::with_dialect(Dialect::from_path(path))
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl SourceParser for JavaScriptParser {
    fn language_id(&self) -> &'static str {
        self.dialect.id()
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.dialect.extensions()
    }

    fn parse(&self, source: &str) -> Result<Ast, ParseError> {
        let language = self.dialect.id();
        let mut parser = Parser::new();
        parser
            .set_language(&self.dialect.language())
            .map_err(|e| ParseError::Language {
                language,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or(ParseError::NoTree { language })?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, column) = first_error(root).map_or((1, 1), |n| {
                let p = n.start_position();
                (p.row + 1, p.column + 1)
            });
            debug!(language, line, column, "source does not parse");
            return Err(ParseError::Syntax { line, column });
        }

        let mut lowerer = Lowerer {
            src: source,
            builder: AstBuilder::new(source),
        };
        lowerer.lower(root, None);
        Ok(lowerer.builder.finish())
    }
}

/// All children of `node` with their field names.
fn children<'t>(node: TsNode<'t>) -> Vec<(Option<&'static str>, TsNode<'t>)> {
    let mut cursor = node.walk();
    let mut out = Vec::new();
    if cursor.goto_first_child() {
        loop {
            out.push((cursor.field_name(), cursor.node()));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    out
}

/// First named, non-comment child.
fn first_syntax_child<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    children(node)
        .into_iter()
        .map(|(_, c)| c)
        .find(|c| c.is_named() && !c.is_extra())
}

fn first_error<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    children(node)
        .into_iter()
        .map(|(_, c)| c)
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn span(node: TsNode<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// A lowered child together with how it hung off its tree-sitter parent.
struct Lowered {
    field: Option<&'static str>,
    kind: &'static str,
    extra: bool,
    id: NodeId,
}

fn pick(items: &[Lowered], field: &str) -> Option<NodeId> {
    pick_lowered(items, field).map(|l| l.id)
}

fn pick_lowered<'a>(items: &'a [Lowered], field: &str) -> Option<&'a Lowered> {
    items.iter().find(|l| l.field == Some(field))
}

/// Ids of the non-comment children.
fn syntax(items: &[Lowered]) -> Vec<NodeId> {
    items.iter().filter(|l| !l.extra).map(|l| l.id).collect()
}

fn with_field(items: &[Lowered], field: &str) -> Vec<NodeId> {
    items
        .iter()
        .filter(|l| l.field == Some(field))
        .map(|l| l.id)
        .collect()
}

fn has_token(node: TsNode<'_>, token: &str) -> bool {
    children(node)
        .iter()
        .any(|(_, c)| !c.is_named() && c.kind() == token)
}

fn call_shape(node: TsNode<'_>, items: &[Lowered]) -> Option<Node> {
    let callee = pick_lowered(items, "function")?;
    let arguments = with_field(items, "argument");
    // Tagged templates carry a template_string instead of an argument list.
    let has_argument_list = node
        .child_by_field_name("arguments")
        .is_some_and(|a| a.kind() == "arguments");
    if !has_argument_list {
        return None;
    }
    if callee.kind == "import" {
        return arguments
            .first()
            .map(|&source| Node::ImportExpression { source });
    }
    Some(Node::CallExpression {
        callee: callee.id,
        arguments,
    })
}

struct Lowerer<'s> {
    src: &'s str,
    builder: AstBuilder,
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: TsNode<'_>) -> &'s str {
        self.src.get(node.byte_range()).unwrap_or("")
    }

    /// Pushes `node` as [`Node::Other`]; callers refine it once the children
    /// are lowered.
    fn open(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        self.builder.push(
            Node::Other {
                kind: node.kind().to_string(),
            },
            span(node),
            parent,
        )
    }

    fn leaf(&mut self, node: TsNode<'_>, parent: Option<NodeId>, shape: Node) -> NodeId {
        self.builder.push(shape, span(node), parent)
    }

    fn lowered(&mut self, field: Option<&'static str>, child: TsNode<'_>, parent: NodeId) -> Lowered {
        Lowered {
            field,
            kind: child.kind(),
            extra: child.is_extra(),
            id: self.lower(child, Some(parent)),
        }
    }

    /// Lowers the named children of `list` as if they hung directly off
    /// `parent` under `field`.
    fn lower_into(
        &mut self,
        out: &mut Vec<Lowered>,
        list: TsNode<'_>,
        field: &'static str,
        parent: NodeId,
    ) {
        for (_, item) in children(list) {
            if item.is_named() {
                let field = if item.is_extra() { None } else { Some(field) };
                out.push(self.lowered(field, item, parent));
            }
        }
    }

    /// Lowers every named child of `node` under `id`.
    ///
    /// Parameter and argument lists are flattened, and a `finally` clause is
    /// replaced by its block.
    fn lower_fields(&mut self, node: TsNode<'_>, id: NodeId) -> Vec<Lowered> {
        let mut out = Vec::new();
        for (field, child) in children(node) {
            if !child.is_named() {
                continue;
            }
            match (field, child.kind()) {
                (Some("parameters"), "formal_parameters") => {
                    self.lower_into(&mut out, child, "parameter", id);
                }
                (Some("arguments"), "arguments") => {
                    self.lower_into(&mut out, child, "argument", id);
                }
                (Some("finalizer"), "finally_clause") => match child.child_by_field_name("body") {
                    Some(body) => out.push(self.lowered(Some("finalizer"), body, id)),
                    None => out.push(self.lowered(field, child, id)),
                },
                _ => out.push(self.lowered(field, child, id)),
            }
        }
        out
    }

    fn lower(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        match node.kind() {
            "parenthesized_expression" | "computed_property_name" => match first_syntax_child(node) {
                Some(inner) => self.lower(inner, parent),
                None => self.lower_generic(node, parent),
            },
            "comment" | "html_comment" => {
                let block = !self.text(node).starts_with("//");
                self.leaf(node, parent, Node::Comment { block })
            }
            "empty_statement" => self.leaf(node, parent, Node::EmptyStatement),
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier_pattern"
            | "statement_identifier"
            | "undefined" => {
                let name = self.text(node).to_string();
                self.leaf(node, parent, Node::Identifier { name })
            }
            "shorthand_property_identifier" => self.lower_shorthand(node, parent),
            "private_property_identifier" => {
                let name = self.text(node).trim_start_matches('#').to_string();
                self.leaf(node, parent, Node::PrivateIdentifier { name })
            }
            "string" => {
                let value = unescape(strip_quotes(self.text(node)));
                self.leaf(node, parent, Node::Literal(Literal::String(value)))
            }
            "number" => {
                let raw = self.text(node).to_string();
                let value = parse_number(&raw);
                self.leaf(node, parent, Node::Literal(Literal::Number { raw, value }))
            }
            "true" => self.leaf(node, parent, Node::Literal(Literal::Boolean(true))),
            "false" => self.leaf(node, parent, Node::Literal(Literal::Boolean(false))),
            "null" => self.leaf(node, parent, Node::Literal(Literal::Null)),
            "regex" => {
                let raw = self.text(node).to_string();
                self.leaf(node, parent, Node::Literal(Literal::Regex(raw)))
            }
            "template_string" => self.lower_template(node, parent),
            "function_declaration" | "generator_function_declaration" => {
                self.lower_function(node, parent, FunctionKind::Declaration)
            }
            "function_expression" | "function" | "generator_function" => {
                self.lower_function(node, parent, FunctionKind::Expression)
            }
            "arrow_function" => self.lower_function(node, parent, FunctionKind::Arrow),
            "method_definition" => self.lower_method(node, parent),
            _ => self.lower_composite(node, parent),
        }
    }

    /// Shapes whose payload is a selection of their lowered children.
    fn lower_composite(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        let id = self.open(node, parent);
        let items = self.lower_fields(node, id);
        let shape = match node.kind() {
            "program" => Some(Node::Program),
            "statement_block" => Some(Node::BlockStatement {
                body: items.iter().map(|l| l.id).collect(),
            }),
            "expression_statement" => syntax(&items)
                .first()
                .map(|&expression| Node::ExpressionStatement { expression }),
            "lexical_declaration" | "variable_declaration" => Some(Node::VariableDeclaration {
                declarations: items
                    .iter()
                    .filter(|l| l.kind == "variable_declarator")
                    .map(|l| l.id)
                    .collect(),
            }),
            "variable_declarator" => pick(&items, "name").map(|id| Node::VariableDeclarator {
                id,
                init: pick(&items, "value"),
            }),
            "class_declaration" | "class" | "abstract_class_declaration" => {
                pick(&items, "body").map(|body| Node::Class {
                    id: pick(&items, "name"),
                    body,
                })
            }
            "class_body" => Some(Node::ClassBody {
                body: syntax(&items),
            }),
            "field_definition" | "public_field_definition" => {
                let key = pick_lowered(&items, "property").or_else(|| pick_lowered(&items, "name"));
                key.map(|key| Node::PropertyDefinition {
                    key: key.id,
                    value: pick(&items, "value"),
                    is_static: has_token(node, "static"),
                    computed: key.kind == "computed_property_name",
                })
            }
            "pair" => match (pick_lowered(&items, "key"), pick(&items, "value")) {
                (Some(key), Some(value)) => Some(Node::Property {
                    key: key.id,
                    value,
                    kind: PropertyKind::Init,
                    method: false,
                    shorthand: false,
                    computed: key.kind == "computed_property_name",
                }),
                _ => None,
            },
            "object" => Some(Node::ObjectExpression {
                properties: syntax(&items),
            }),
            "array" => Some(Node::ArrayExpression {
                elements: syntax(&items),
            }),
            "assignment_expression" => match (pick(&items, "left"), pick(&items, "right")) {
                (Some(left), Some(right)) => Some(Node::AssignmentExpression { left, right }),
                _ => None,
            },
            "call_expression" => call_shape(node, &items),
            "new_expression" => pick(&items, "constructor").map(|callee| Node::NewExpression {
                callee,
                arguments: with_field(&items, "argument"),
            }),
            "member_expression" => match (pick(&items, "object"), pick(&items, "property")) {
                (Some(object), Some(property)) => Some(Node::MemberExpression {
                    object,
                    property,
                    computed: false,
                }),
                _ => None,
            },
            "subscript_expression" => match (pick(&items, "object"), pick(&items, "index")) {
                (Some(object), Some(property)) => Some(Node::MemberExpression {
                    object,
                    property,
                    computed: true,
                }),
                _ => None,
            },
            "binary_expression" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op).to_string());
                match (operator, pick(&items, "left"), pick(&items, "right")) {
                    (Some(operator), Some(left), Some(right)) => Some(Node::BinaryExpression {
                        operator,
                        left,
                        right,
                    }),
                    _ => None,
                }
            }
            "import_statement" => pick(&items, "source").map(|source| Node::ImportDeclaration {
                source,
                namespace: children(node).iter().any(|(_, clause)| {
                    clause.kind() == "import_clause"
                        && children(*clause)
                            .iter()
                            .any(|(_, c)| c.kind() == "namespace_import")
                }),
            }),
            "export_statement" => Some(Node::ExportDeclaration {
                source: pick(&items, "source"),
                all: children(node).iter().any(|(_, c)| {
                    (!c.is_named() && c.kind() == "*") || c.kind() == "namespace_export"
                }),
            }),
            "try_statement" => pick(&items, "body").map(|block| Node::TryStatement {
                block,
                handler: pick(&items, "handler"),
                finalizer: pick(&items, "finalizer"),
            }),
            "catch_clause" => pick(&items, "body").map(|body| Node::CatchClause {
                param: pick(&items, "parameter"),
                body,
            }),
            _ => None,
        };
        if let Some(shape) = shape {
            self.builder.set(id, shape);
        }
        id
    }

    fn lower_generic(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        let id = self.open(node, parent);
        self.lower_fields(node, id);
        id
    }

    fn lower_function(
        &mut self,
        node: TsNode<'_>,
        parent: Option<NodeId>,
        kind: FunctionKind,
    ) -> NodeId {
        let id = self.open(node, parent);
        let items = self.lower_fields(node, id);
        if let Some(body) = pick(&items, "body") {
            self.builder.set(
                id,
                Node::Function(Function {
                    kind,
                    id: pick(&items, "name"),
                    is_async: has_token(node, "async"),
                    is_generator: has_token(node, "*"),
                    params: with_field(&items, "parameter"),
                    body,
                }),
            );
        }
        id
    }

    /// Lowers a class or object-literal method.
    ///
    /// The declaration keeps the full span; its value is a synthesized
    /// function expression spanning the parameter list and the body.
    fn lower_method(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        let id = self.open(node, parent);
        let in_object = node.parent().is_some_and(|p| p.kind() == "object");

        let mut is_static = false;
        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor: Option<&'static str> = None;
        let mut key: Option<(NodeId, &'static str)> = None;
        let mut function: Option<NodeId> = None;
        let mut params = Vec::new();
        let mut body = None;

        for (field, child) in children(node) {
            match field {
                Some("name") if key.is_none() => {
                    key = Some((self.lower(child, Some(id)), child.kind()));
                }
                Some("parameters") => {
                    let value = self.builder.push(
                        Node::Other {
                            kind: "function".into(),
                        },
                        Span::new(child.start_byte(), node.end_byte()),
                        Some(id),
                    );
                    for (_, param) in children(child) {
                        if param.is_named() {
                            let param_id = self.lower(param, Some(value));
                            if !param.is_extra() {
                                params.push(param_id);
                            }
                        }
                    }
                    function = Some(value);
                }
                Some("body") => body = Some(self.lower(child, Some(function.unwrap_or(id)))),
                _ if child.is_named() => {
                    self.lower(child, Some(function.unwrap_or(id)));
                }
                _ if key.is_none() => match child.kind() {
                    "static" => is_static = true,
                    "static get" => {
                        is_static = true;
                        accessor = Some("get");
                    }
                    "async" => is_async = true,
                    "*" => is_generator = true,
                    "get" => accessor = Some("get"),
                    "set" => accessor = Some("set"),
                    _ => {}
                },
                _ => {}
            }
        }

        let (Some((key, key_kind)), Some(function), Some(body)) = (key, function, body) else {
            return id;
        };
        self.builder.set(
            function,
            Node::Function(Function {
                kind: FunctionKind::Expression,
                id: None,
                is_async,
                is_generator,
                params,
                body,
            }),
        );

        let computed = key_kind == "computed_property_name";
        let shape = if in_object {
            Node::Property {
                key,
                value: function,
                kind: match accessor {
                    Some("get") => PropertyKind::Get,
                    Some("set") => PropertyKind::Set,
                    _ => PropertyKind::Init,
                },
                method: accessor.is_none(),
                shorthand: false,
                computed,
            }
        } else {
            let named_constructor = match self.builder.node(key) {
                Node::Identifier { name } => name == "constructor",
                Node::Literal(Literal::String(s)) => s == "constructor",
                _ => false,
            };
            let kind = match accessor {
                Some("get") => MethodKind::Get,
                Some("set") => MethodKind::Set,
                _ if named_constructor && !is_static && !computed => MethodKind::Constructor,
                _ => MethodKind::Method,
            };
            Node::MethodDefinition {
                key,
                value: function,
                kind,
                is_static,
                computed,
            }
        };
        self.builder.set(id, shape);
        id
    }

    fn lower_shorthand(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        let name = self.text(node).to_string();
        if !node.parent().is_some_and(|p| p.kind() == "object") {
            return self.leaf(node, parent, Node::Identifier { name });
        }
        let id = self.open(node, parent);
        let key = self.leaf(node, Some(id), Node::Identifier { name: name.clone() });
        let value = self.leaf(node, Some(id), Node::Identifier { name });
        self.builder.set(
            id,
            Node::Property {
                key,
                value,
                kind: PropertyKind::Init,
                method: false,
                shorthand: true,
                computed: false,
            },
        );
        id
    }

    fn lower_template(&mut self, node: TsNode<'_>, parent: Option<NodeId>) -> NodeId {
        let id = self.open(node, parent);
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut cursor = node.start_byte() + 1;

        for (_, child) in children(node) {
            if child.kind() != "template_substitution" {
                continue;
            }
            let Some(expression) = first_syntax_child(child) else {
                continue;
            };
            quasis.push(unescape(self.src.get(cursor..child.start_byte()).unwrap_or("")));
            expressions.push(self.lower(expression, Some(id)));
            cursor = child.end_byte();
        }
        let end = node.end_byte().saturating_sub(1).max(cursor);
        quasis.push(unescape(self.src.get(cursor..end).unwrap_or("")));

        self.builder
            .set(id, Node::TemplateLiteral { quasis, expressions });
        id
    }
}

fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 {
        raw.get(1..raw.len() - 1).unwrap_or("")
    } else {
        ""
    }
}

/// Decodes JavaScript string escapes. Invalid escapes are kept verbatim.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, "\\x");
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex, "\\u");
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n' | '\u{2028}' | '\u{2029}') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, prefix: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim_end_matches('n')
        .chars()
        .filter(|&c| c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let radix = match cleaned.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => cleaned
            .get(2..)
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map_or(f64::NAN, |v| v as f64),
        None => cleaned.parse().unwrap_or(f64::NAN),
    }
}

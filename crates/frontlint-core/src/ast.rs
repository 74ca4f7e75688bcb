//! Arena syntax tree shared by the parsing layer and the rules.
//!
//! Nodes are ESTree-shaped: a function that is the value of a class method
//! or an object getter is its own [`Node::Function`] whose span starts at the
//! parameter list, while the surrounding [`Node::MethodDefinition`] or
//! [`Node::Property`] spans the whole declaration. Every node knows its
//! parent and its children in source order.

/// Index of a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for a zero-length span.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Syntactic flavor of a function-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `function foo() {}` in statement position.
    Declaration,
    /// `function () {}` in expression position, including method values.
    Expression,
    /// `() => {}`
    Arrow,
}

/// A function-like node.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Declaration, expression or arrow.
    pub kind: FunctionKind,
    /// Bound identifier (`function foo`), if any.
    pub id: Option<NodeId>,
    /// `async` modifier.
    pub is_async: bool,
    /// `function*` / `*method()`.
    pub is_generator: bool,
    /// Parameter nodes.
    pub params: Vec<NodeId>,
    /// Body: a block, or an expression for concise arrows.
    pub body: NodeId,
}

/// Kind of a class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `constructor() {}`
    Constructor,
    /// Plain method.
    Method,
    /// `get x() {}`
    Get,
    /// `set x(v) {}`
    Set,
}

/// Kind of an object literal property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `key: value`, shorthand, or method shorthand.
    Init,
    /// `get key() {}`
    Get,
    /// `set key(v) {}`
    Set,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String literal with escapes decoded.
    String(String),
    /// Numeric literal.
    Number {
        /// Source text.
        raw: String,
        /// Parsed value (`NaN` if the raw form was not understood).
        value: f64,
    },
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
    /// Regular expression literal, raw source.
    Regex(String),
}

/// Node shapes the rules match on.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root of a file.
    Program,
    /// Expression used as a statement.
    ExpressionStatement {
        /// The expression.
        expression: NodeId,
    },
    /// `{ ... }` statement block.
    BlockStatement {
        /// Statements, including comment placeholders.
        body: Vec<NodeId>,
    },
    /// `;`
    EmptyStatement,
    /// A comment placeholder.
    Comment {
        /// `/* */` rather than `//`.
        block: bool,
    },
    /// `var`/`let`/`const` declaration.
    VariableDeclaration {
        /// Declarators.
        declarations: Vec<NodeId>,
    },
    /// `id = init` inside a variable declaration.
    VariableDeclarator {
        /// Binding target.
        id: NodeId,
        /// Initializer.
        init: Option<NodeId>,
    },
    /// Function declaration, expression or arrow.
    Function(Function),
    /// Class declaration or expression.
    Class {
        /// Class name.
        id: Option<NodeId>,
        /// The [`Node::ClassBody`].
        body: NodeId,
    },
    /// Members of a class.
    ClassBody {
        /// Methods, fields and static blocks.
        body: Vec<NodeId>,
    },
    /// Class method, getter, setter or constructor.
    MethodDefinition {
        /// Key node.
        key: NodeId,
        /// The [`Node::Function`] value.
        value: NodeId,
        /// Method kind.
        kind: MethodKind,
        /// `static` modifier.
        is_static: bool,
        /// `[key]` form.
        computed: bool,
    },
    /// Class field.
    PropertyDefinition {
        /// Key node.
        key: NodeId,
        /// Initializer.
        value: Option<NodeId>,
        /// `static` modifier.
        is_static: bool,
        /// `[key]` form.
        computed: bool,
    },
    /// `{ ... }` object literal.
    ObjectExpression {
        /// [`Node::Property`] entries and spreads.
        properties: Vec<NodeId>,
    },
    /// Object literal entry.
    Property {
        /// Key node.
        key: NodeId,
        /// Value node.
        value: NodeId,
        /// Init, getter or setter.
        kind: PropertyKind,
        /// Method shorthand (`foo() {}`).
        method: bool,
        /// Shorthand (`{ foo }`).
        shorthand: bool,
        /// `[key]` form.
        computed: bool,
    },
    /// `[ ... ]` array literal.
    ArrayExpression {
        /// Elements.
        elements: Vec<NodeId>,
    },
    /// Literal value.
    Literal(Literal),
    /// Template literal.
    TemplateLiteral {
        /// Literal segments with escapes decoded; one more than `expressions`.
        quasis: Vec<String>,
        /// Interpolated expressions.
        expressions: Vec<NodeId>,
    },
    /// Identifier, including property keys.
    Identifier {
        /// Name.
        name: String,
    },
    /// `#name` class member key.
    PrivateIdentifier {
        /// Name without the `#`.
        name: String,
    },
    /// `left = right`
    AssignmentExpression {
        /// Target.
        left: NodeId,
        /// Value.
        right: NodeId,
    },
    /// `callee(arguments)`
    CallExpression {
        /// Callee.
        callee: NodeId,
        /// Arguments.
        arguments: Vec<NodeId>,
    },
    /// `new callee(arguments)`
    NewExpression {
        /// Constructor expression.
        callee: NodeId,
        /// Arguments.
        arguments: Vec<NodeId>,
    },
    /// `import(source)`
    ImportExpression {
        /// Module specifier expression.
        source: NodeId,
    },
    /// `object.property` / `object[property]`
    MemberExpression {
        /// Object.
        object: NodeId,
        /// Property.
        property: NodeId,
        /// `[]` form.
        computed: bool,
    },
    /// `left <op> right`
    BinaryExpression {
        /// Operator text.
        operator: String,
        /// Left operand.
        left: NodeId,
        /// Right operand.
        right: NodeId,
    },
    /// `import ... from 'source'`
    ImportDeclaration {
        /// Source string literal.
        source: NodeId,
        /// `import * as ns from` form.
        namespace: bool,
    },
    /// `export ...` statement.
    ExportDeclaration {
        /// Re-export source, if any.
        source: Option<NodeId>,
        /// `export * from` form.
        all: bool,
    },
    /// `try {} catch {} finally {}`
    TryStatement {
        /// Protected block.
        block: NodeId,
        /// [`Node::CatchClause`].
        handler: Option<NodeId>,
        /// Finally block.
        finalizer: Option<NodeId>,
    },
    /// `catch (param) { body }`
    CatchClause {
        /// Bound parameter.
        param: Option<NodeId>,
        /// Body block.
        body: NodeId,
    },
    /// Any construct the rules never inspect directly.
    Other {
        /// Parser-specific kind name.
        kind: String,
    },
}

impl Node {
    /// Returns the function payload for function-like nodes.
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the name of an identifier node.
    #[must_use]
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            Self::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the value of a string literal node.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Self::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// A node with its tree links.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node shape.
    pub node: Node,
    /// Source range.
    pub span: Span,
    /// Parent node (`None` for the root).
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// A parsed file: the source text and its node arena.
#[derive(Debug, Clone)]
pub struct Ast {
    source: String,
    nodes: Vec<NodeData>,
    line_starts: Vec<usize>,
}

impl Ast {
    /// Returns the source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a finished tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the shape of a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0].node
    }

    /// Returns the source range of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Returns the children of a node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the source text of a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.span(id);
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Returns the 1-based line containing `offset`.
    ///
    /// Lines are split on `\n`, so `\r\n` sources number identically.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Returns the 1-based `(line, column)` of `offset`.
    #[must_use]
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_at(offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        (line, offset.saturating_sub(line_start) + 1)
    }

    /// Returns the line a node starts on.
    #[must_use]
    pub fn start_line(&self, id: NodeId) -> usize {
        self.line_at(self.span(id).start)
    }

    /// Returns the line a node ends on.
    #[must_use]
    pub fn end_line(&self, id: NodeId) -> usize {
        self.line_at(self.span(id).end)
    }

    /// Iterates over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Iterates over a subtree in pre-order, starting with `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.ast.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Incrementally builds an [`Ast`].
///
/// The first pushed node becomes the root. Parents must be pushed before
/// their children, and siblings in source order.
#[derive(Debug)]
pub struct AstBuilder {
    source: String,
    nodes: Vec<NodeData>,
}

impl AstBuilder {
    /// Starts a tree over `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            nodes: Vec::new(),
        }
    }

    /// Returns the source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Appends a node and links it under `parent`.
    pub fn push(&mut self, node: Node, span: Span, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            node,
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Replaces the shape of an already pushed node.
    pub fn set(&mut self, id: NodeId, node: Node) {
        self.nodes[id.0].node = node;
    }

    /// Returns the shape of an already pushed node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0].node
    }

    /// Finishes the tree.
    #[must_use]
    pub fn finish(mut self) -> Ast {
        if self.nodes.is_empty() {
            let end = self.source.len();
            self.push(Node::Program, Span::new(0, end), None);
        }
        let line_starts = std::iter::once(0)
            .chain(
                self.source
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Ast {
            source: self.source,
            nodes: self.nodes,
            line_starts,
        }
    }
}

/// Visitor over an [`Ast`], called in pre-order.
///
/// Implementations typically `match ast.node(id)` and ignore the shapes
/// they do not care about.
pub trait Visit {
    /// Called before the children of `id` are visited.
    fn enter(&mut self, ast: &Ast, id: NodeId);

    /// Called after the children of `id` are visited.
    fn leave(&mut self, _ast: &Ast, _id: NodeId) {}
}

/// Walks the whole tree.
pub fn walk<V: Visit + ?Sized>(visitor: &mut V, ast: &Ast) {
    walk_from(visitor, ast, ast.root());
}

/// Walks the subtree rooted at `id`.
pub fn walk_from<V: Visit + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) {
    visitor.enter(ast, id);
    for &child in ast.children(id) {
        walk_from(visitor, ast, child);
    }
    visitor.leave(ast, id);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `function a() {\n}` built by hand.
    fn sample(source: &str) -> (Ast, NodeId, NodeId) {
        let mut b = AstBuilder::new(source);
        let end = source.len();
        let program = b.push(Node::Program, Span::new(0, end), None);
        let func = b.push(Node::Other { kind: "pending".into() }, Span::new(0, end), Some(program));
        let id = b.push(
            Node::Identifier { name: "a".into() },
            Span::new(9, 10),
            Some(func),
        );
        let body = b.push(
            Node::BlockStatement { body: vec![] },
            Span::new(13, end),
            Some(func),
        );
        b.set(
            func,
            Node::Function(Function {
                kind: FunctionKind::Declaration,
                id: Some(id),
                is_async: false,
                is_generator: false,
                params: vec![],
                body,
            }),
        );
        (b.finish(), func, id)
    }

    #[test]
    fn line_numbers_ignore_carriage_returns() {
        let (lf, func_lf, _) = sample("function a() {\n\n}");
        let (crlf, func_crlf, _) = sample("function a() {\r\n\r\n}");
        assert_eq!(lf.start_line(func_lf), 1);
        assert_eq!(lf.end_line(func_lf), 3);
        assert_eq!(crlf.end_line(func_crlf), 3);
    }

    #[test]
    fn position_is_one_based() {
        let (ast, _, id) = sample("function a() {\n}");
        assert_eq!(ast.position(ast.span(id).start), (1, 10));
        assert_eq!(ast.position(15), (2, 1));
    }

    #[test]
    fn descendants_are_pre_order() {
        let (ast, func, id) = sample("function a() {\n}");
        let order: Vec<NodeId> = ast.descendants(ast.root()).collect();
        assert_eq!(order[0], ast.root());
        assert_eq!(order[1], func);
        assert_eq!(order[2], id);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (ast, func, id) = sample("function a() {\n}");
        let chain: Vec<NodeId> = ast.ancestors(id).collect();
        assert_eq!(chain, vec![func, ast.root()]);
        assert_eq!(ast.text(id), "a");
    }

    #[test]
    fn visitor_sees_enter_and_leave() {
        struct Counter(usize, usize);
        impl Visit for Counter {
            fn enter(&mut self, _ast: &Ast, _id: NodeId) {
                self.0 += 1;
            }
            fn leave(&mut self, _ast: &Ast, _id: NodeId) {
                self.1 += 1;
            }
        }
        let (ast, _, _) = sample("function a() {\n}");
        let mut counter = Counter(0, 0);
        walk(&mut counter, &ast);
        assert_eq!((counter.0, counter.1), (4, 4));
    }

    #[test]
    fn empty_builder_gets_program_root() {
        let ast = AstBuilder::new("").finish();
        assert_eq!(ast.node(ast.root()), &Node::Program);
        assert_eq!(ast.len(), 1);
    }
}

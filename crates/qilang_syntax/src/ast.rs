//! Abstract Syntax Tree definitions for qilang
//!
//! A parsed file is an [`Ast`]: an arena of [`NodeData`] addressed by [`NodeId`], plus the ordered list of
//! top-level (root) nodes. Children are referenced by id, never owned by their parent, so a node can be shared by
//! several analyses without cloning the tree.
//!
//! Every node belongs to exactly one family ([`NodeKind`]) and has exactly one fine-grained tag ([`NodeType`]),
//! both derived from the variant and therefore fixed for the node's lifetime.

use std::fmt;
use std::sync::Arc;

use qilang_core::lang::operators::OperatorId;
use qilang_core::lang::types::BuiltinTypeId;

// ============================================================================
// Locations
// ============================================================================

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Where a node comes from: file name plus begin/end positions.
///
/// Synthesized nodes carry [`Location::none`], which renders as `<no location>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub filename: Option<Arc<str>>,
    pub begin: Position,
    pub end: Position,
}

impl Location {
    pub fn new(filename: Arc<str>, begin: Position, end: Position) -> Self {
        Self {
            filename: Some(filename),
            begin,
            end,
        }
    }

    /// Location of a node that was not parsed from text.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.filename.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(file) => write!(f, "{}:{}:{}", file, self.begin.line, self.begin.column),
            None => write!(f, "<no location>"),
        }
    }
}

/// Maps byte offsets of one source text to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = offset - self.line_starts[line] + 1;
        Position::new(line as u32 + 1, column as u32)
    }
}

// ============================================================================
// Node identity and classification
// ============================================================================

/// Stable index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse node family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Literal,
    Expr,
    TypeExpr,
    Decl,
    Stmt,
}

/// Fine-grained node tag, one per concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    // Literals
    BoolLiteral,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    ListLiteral,
    TupleLiteral,
    DictLiteral,

    // Expressions
    BinaryOp,
    UnaryOp,
    Var,
    LiteralExpr,
    Call,

    // Type expressions
    BuiltinType,
    CustomType,
    ListType,
    MapType,
    TupleType,

    // Declarations
    InterfaceDecl,
    FnDecl,
    EmitDecl,
    PropDecl,
    StructDecl,
    StructFieldDecl,
    ConstDecl,
    TypeDefDecl,
    EnumDecl,
    EnumFieldDecl,

    // Statements
    Package,
    Import,
    ObjectDef,
    PropertyDef,
    At,
    VarDef,
    Comment,
}

impl NodeType {
    pub fn kind(self) -> NodeKind {
        use NodeType::*;
        match self {
            BoolLiteral | IntLiteral | FloatLiteral | StringLiteral | ListLiteral | TupleLiteral | DictLiteral => {
                NodeKind::Literal
            }
            BinaryOp | UnaryOp | Var | LiteralExpr | Call => NodeKind::Expr,
            BuiltinType | CustomType | ListType | MapType | TupleType => NodeKind::TypeExpr,
            InterfaceDecl | FnDecl | EmitDecl | PropDecl | StructDecl | StructFieldDecl | ConstDecl | TypeDefDecl
            | EnumDecl | EnumFieldDecl => NodeKind::Decl,
            Package | Import | ObjectDef | PropertyDef | At | VarDef | Comment => NodeKind::Stmt,
        }
    }
}

// ============================================================================
// Node variants
// ============================================================================

/// Any AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    Expr(Expr),
    TypeExpr(TypeExpr),
    Decl(Decl),
    Stmt(Stmt),
}

/// Constant data.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(u64),
    Float(f64),
    String(String),
    List(Vec<NodeId>),
    Tuple(Vec<NodeId>),
    /// Ordered key/value pairs; keys are literal nodes too.
    Dict(Vec<(NodeId, NodeId)>),
}

/// Value expressions, used by object bodies and initializers.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    BinaryOp { op: OperatorId, left: NodeId, right: NodeId },
    UnaryOp { op: OperatorId, operand: NodeId },
    Var(String),
    /// Wraps a literal node.
    Literal(NodeId),
    Call { name: String, args: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Builtin(BuiltinTypeId),
    /// Unresolved, possibly dotted (`pkg.Name`) reference.
    Custom(String),
    List(NodeId),
    Map { key: NodeId, value: NodeId },
    Tuple(Vec<NodeId>),
}

/// A method, signal or property parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub inherits: Vec<String>,
    pub members: Vec<NodeId>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<NodeId>,
    pub doc: Option<String>,
}

/// Signal (`emit`) or property (`prop`) declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub inherits: Vec<String>,
    pub fields: Vec<NodeId>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructFieldDecl {
    pub name: String,
    pub ty: NodeId,
    pub default: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Option<NodeId>,
    /// Literal node, or expression node for computed values.
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefDecl {
    pub name: String,
    pub ty: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub fields: Vec<NodeId>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldKind {
    Const(NodeId),
    Type(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumFieldDecl {
    pub name: String,
    pub kind: EnumFieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Interface(InterfaceDecl),
    Fn(FnDecl),
    Emit(MemberDecl),
    Prop(MemberDecl),
    Struct(StructDecl),
    StructField(StructFieldDecl),
    Const(ConstDecl),
    TypeDef(TypeDefDecl),
    Enum(EnumDecl),
    EnumField(EnumFieldDecl),
}

impl Decl {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            Decl::Interface(d) => &d.name,
            Decl::Fn(d) => &d.name,
            Decl::Emit(d) | Decl::Prop(d) => &d.name,
            Decl::Struct(d) => &d.name,
            Decl::StructField(d) => &d.name,
            Decl::Const(d) => &d.name,
            Decl::TypeDef(d) => &d.name,
            Decl::Enum(d) => &d.name,
            Decl::EnumField(d) => &d.name,
        }
    }

    /// Attached `##` documentation, if the declaration kind carries any.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Decl::Interface(d) => d.doc.as_deref(),
            Decl::Fn(d) => d.doc.as_deref(),
            Decl::Emit(d) | Decl::Prop(d) => d.doc.as_deref(),
            Decl::Struct(d) => d.doc.as_deref(),
            Decl::Enum(d) => d.doc.as_deref(),
            Decl::StructField(_) | Decl::Const(_) | Decl::TypeDef(_) | Decl::EnumField(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import pkg`
    Package,
    /// `from pkg import A, B`
    List(Vec<String>),
    /// `from pkg import *`
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub package: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    pub ty: NodeId,
    /// String literal node.
    pub name: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtStmt {
    pub sender: NodeId,
    pub receiver: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub ty: Option<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Package(String),
    Import(ImportStmt),
    ObjectDef(ObjectDef),
    PropertyDef(PropertyDef),
    At(AtStmt),
    VarDef(VarDef),
    Comment(String),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Literal(lit) => match lit {
                Literal::Bool(_) => NodeType::BoolLiteral,
                Literal::Int(_) => NodeType::IntLiteral,
                Literal::Float(_) => NodeType::FloatLiteral,
                Literal::String(_) => NodeType::StringLiteral,
                Literal::List(_) => NodeType::ListLiteral,
                Literal::Tuple(_) => NodeType::TupleLiteral,
                Literal::Dict(_) => NodeType::DictLiteral,
            },
            Node::Expr(expr) => match expr {
                Expr::BinaryOp { .. } => NodeType::BinaryOp,
                Expr::UnaryOp { .. } => NodeType::UnaryOp,
                Expr::Var(_) => NodeType::Var,
                Expr::Literal(_) => NodeType::LiteralExpr,
                Expr::Call { .. } => NodeType::Call,
            },
            Node::TypeExpr(ty) => match ty {
                TypeExpr::Builtin(_) => NodeType::BuiltinType,
                TypeExpr::Custom(_) => NodeType::CustomType,
                TypeExpr::List(_) => NodeType::ListType,
                TypeExpr::Map { .. } => NodeType::MapType,
                TypeExpr::Tuple(_) => NodeType::TupleType,
            },
            Node::Decl(decl) => match decl {
                Decl::Interface(_) => NodeType::InterfaceDecl,
                Decl::Fn(_) => NodeType::FnDecl,
                Decl::Emit(_) => NodeType::EmitDecl,
                Decl::Prop(_) => NodeType::PropDecl,
                Decl::Struct(_) => NodeType::StructDecl,
                Decl::StructField(_) => NodeType::StructFieldDecl,
                Decl::Const(_) => NodeType::ConstDecl,
                Decl::TypeDef(_) => NodeType::TypeDefDecl,
                Decl::Enum(_) => NodeType::EnumDecl,
                Decl::EnumField(_) => NodeType::EnumFieldDecl,
            },
            Node::Stmt(stmt) => match stmt {
                Stmt::Package(_) => NodeType::Package,
                Stmt::Import(_) => NodeType::Import,
                Stmt::ObjectDef(_) => NodeType::ObjectDef,
                Stmt::PropertyDef(_) => NodeType::PropertyDef,
                Stmt::At(_) => NodeType::At,
                Stmt::VarDef(_) => NodeType::VarDef,
                Stmt::Comment(_) => NodeType::Comment,
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.node_type().kind()
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        fn params(out: &mut Vec<NodeId>, params: &[Param]) {
            out.extend(params.iter().map(|p| p.ty));
        }

        let mut out = Vec::new();
        match self {
            Node::Literal(lit) => match lit {
                Literal::Bool(_) | Literal::Int(_) | Literal::Float(_) | Literal::String(_) => {}
                Literal::List(items) | Literal::Tuple(items) => out.extend(items),
                Literal::Dict(pairs) => {
                    for (k, v) in pairs {
                        out.push(*k);
                        out.push(*v);
                    }
                }
            },
            Node::Expr(expr) => match expr {
                Expr::BinaryOp { left, right, .. } => out.extend([*left, *right]),
                Expr::UnaryOp { operand, .. } => out.push(*operand),
                Expr::Var(_) => {}
                Expr::Literal(lit) => out.push(*lit),
                Expr::Call { args, .. } => out.extend(args),
            },
            Node::TypeExpr(ty) => match ty {
                TypeExpr::Builtin(_) | TypeExpr::Custom(_) => {}
                TypeExpr::List(elem) => out.push(*elem),
                TypeExpr::Map { key, value } => out.extend([*key, *value]),
                TypeExpr::Tuple(elems) => out.extend(elems),
            },
            Node::Decl(decl) => match decl {
                Decl::Interface(d) => out.extend(&d.members),
                Decl::Fn(d) => {
                    params(&mut out, &d.params);
                    out.extend(d.ret);
                }
                Decl::Emit(d) | Decl::Prop(d) => params(&mut out, &d.params),
                Decl::Struct(d) => out.extend(&d.fields),
                Decl::StructField(d) => {
                    out.push(d.ty);
                    out.extend(d.default);
                }
                Decl::Const(d) => {
                    out.extend(d.ty);
                    out.push(d.value);
                }
                Decl::TypeDef(d) => out.push(d.ty),
                Decl::Enum(d) => out.extend(&d.fields),
                Decl::EnumField(d) => match d.kind {
                    EnumFieldKind::Const(id) | EnumFieldKind::Type(id) => out.push(id),
                },
            },
            Node::Stmt(stmt) => match stmt {
                Stmt::Package(_) | Stmt::Import(_) | Stmt::Comment(_) => {}
                Stmt::ObjectDef(o) => {
                    out.push(o.ty);
                    out.push(o.name);
                    out.extend(&o.body);
                }
                Stmt::PropertyDef(p) => out.push(p.value),
                Stmt::At(a) => out.extend([a.sender, a.receiver]),
                Stmt::VarDef(v) => {
                    out.extend(v.ty);
                    out.extend(v.value);
                }
            },
        }
        out
    }
}

// ============================================================================
// Arena
// ============================================================================

/// A node together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub node: Node,
    pub span: Span,
    pub location: Location,
}

/// One parsed file: node arena plus the ordered top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id. Children must already be in the arena.
    pub fn push(&mut self, node: Node, span: Span, location: Location) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData { node, span, location });
        id
    }

    /// Mark `id` as a top-level node.
    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// ## Panics
    /// - If `id` was not produced by this arena.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.data(id).node
    }

    pub fn location(&self, id: NodeId) -> &Location {
        &self.data(id).location
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.data(id).span
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children()
    }

    pub fn literal(&self, id: NodeId) -> Option<&Literal> {
        match self.node(id) {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match self.node(id) {
            Node::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn type_expr(&self, id: NodeId) -> Option<&TypeExpr> {
        match self.node(id) {
            Node::TypeExpr(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn decl(&self, id: NodeId) -> Option<&Decl> {
        match self.node(id) {
            Node::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn stmt(&self, id: NodeId) -> Option<&Stmt> {
        match self.node(id) {
            Node::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Compare the trees of two files, ignoring ids, spans and locations.
    pub fn same_structure(&self, other: &Ast) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| self.same_subtree(*a, other, *b))
    }

    /// Compare the subtree at `a` with the subtree at `b` of `other`, ignoring ids, spans and locations.
    pub fn same_subtree(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        if left.node_type() != right.node_type() || !same_payload(left, right) {
            return false;
        }
        let (lc, rc) = (left.children(), right.children());
        lc.len() == rc.len() && lc.iter().zip(&rc).all(|(x, y)| self.same_subtree(*x, other, *y))
    }
}

/// Compare the non-child data of two nodes of the same type.
fn same_payload(left: &Node, right: &Node) -> bool {
    fn param_names(a: &[Param], b: &[Param]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
    }

    match (left, right) {
        (Node::Literal(a), Node::Literal(b)) => match (a, b) {
            (Literal::Bool(x), Literal::Bool(y)) => x == y,
            (Literal::Int(x), Literal::Int(y)) => x == y,
            (Literal::Float(x), Literal::Float(y)) => x.to_bits() == y.to_bits(),
            (Literal::String(x), Literal::String(y)) => x == y,
            _ => true,
        },
        (Node::Expr(a), Node::Expr(b)) => match (a, b) {
            (Expr::BinaryOp { op: x, .. }, Expr::BinaryOp { op: y, .. }) => x == y,
            (Expr::UnaryOp { op: x, .. }, Expr::UnaryOp { op: y, .. }) => x == y,
            (Expr::Var(x), Expr::Var(y)) => x == y,
            (Expr::Call { name: x, .. }, Expr::Call { name: y, .. }) => x == y,
            _ => true,
        },
        (Node::TypeExpr(a), Node::TypeExpr(b)) => match (a, b) {
            (TypeExpr::Builtin(x), TypeExpr::Builtin(y)) => x == y,
            (TypeExpr::Custom(x), TypeExpr::Custom(y)) => x == y,
            _ => true,
        },
        (Node::Decl(a), Node::Decl(b)) => {
            a.name() == b.name()
                && a.doc() == b.doc()
                && match (a, b) {
                    (Decl::Interface(x), Decl::Interface(y)) => x.inherits == y.inherits,
                    (Decl::Struct(x), Decl::Struct(y)) => x.inherits == y.inherits,
                    (Decl::Fn(x), Decl::Fn(y)) => param_names(&x.params, &y.params),
                    (Decl::Emit(x), Decl::Emit(y)) | (Decl::Prop(x), Decl::Prop(y)) => {
                        param_names(&x.params, &y.params)
                    }
                    (Decl::EnumField(x), Decl::EnumField(y)) => {
                        matches!(
                            (&x.kind, &y.kind),
                            (EnumFieldKind::Const(_), EnumFieldKind::Const(_))
                                | (EnumFieldKind::Type(_), EnumFieldKind::Type(_))
                        )
                    }
                    _ => true,
                }
        }
        (Node::Stmt(a), Node::Stmt(b)) => match (a, b) {
            (Stmt::Package(x), Stmt::Package(y)) => x == y,
            (Stmt::Import(x), Stmt::Import(y)) => x == y,
            (Stmt::PropertyDef(x), Stmt::PropertyDef(y)) => x.name == y.name,
            (Stmt::VarDef(x), Stmt::VarDef(y)) => {
                x.name == y.name && x.ty.is_some() == y.ty.is_some() && x.value.is_some() == y.value.is_some()
            }
            (Stmt::Comment(x), Stmt::Comment(y)) => x == y,
            _ => true,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(ast: &mut Ast, node: Node) -> NodeId {
        ast.push(node, Span::default(), Location::none())
    }

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(1), Position::new(1, 2));
        assert_eq!(index.position(3), Position::new(2, 1));
        assert_eq!(index.position(6), Position::new(3, 1));
        assert_eq!(index.position(7), Position::new(4, 1));
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new(Arc::from("a/b.qi"), Position::new(3, 5), Position::new(3, 9));
        assert_eq!(loc.to_string(), "a/b.qi:3:5");
        assert_eq!(Location::none().to_string(), "<no location>");
    }

    #[test]
    fn test_kind_follows_type() {
        let mut ast = Ast::new();
        let int = push(&mut ast, Node::TypeExpr(TypeExpr::Builtin(BuiltinTypeId::Int32)));
        let list = push(&mut ast, Node::TypeExpr(TypeExpr::List(int)));
        assert_eq!(ast.node_type(list), NodeType::ListType);
        assert_eq!(ast.kind(list), NodeKind::TypeExpr);
        assert_eq!(ast.children(list), vec![int]);
    }

    #[test]
    fn test_fn_children_are_params_then_return() {
        let mut ast = Ast::new();
        let a = push(&mut ast, Node::TypeExpr(TypeExpr::Builtin(BuiltinTypeId::String)));
        let r = push(&mut ast, Node::TypeExpr(TypeExpr::Builtin(BuiltinTypeId::Bool)));
        let f = push(
            &mut ast,
            Node::Decl(Decl::Fn(FnDecl {
                name: "f".into(),
                params: vec![Param { name: None, ty: a }],
                ret: Some(r),
                doc: None,
            })),
        );
        assert_eq!(ast.children(f), vec![a, r]);
    }

    #[test]
    fn test_same_structure_ignores_locations() {
        let mut left = Ast::new();
        let id = left.push(
            Node::Stmt(Stmt::Package("a".into())),
            Span::new(0, 9),
            Location::new(Arc::from("x.qi"), Position::new(1, 1), Position::new(1, 10)),
        );
        left.add_root(id);

        let mut right = Ast::new();
        let id = push(&mut right, Node::Stmt(Stmt::Package("a".into())));
        right.add_root(id);
        assert!(left.same_structure(&right));

        let mut other = Ast::new();
        let id = push(&mut other, Node::Stmt(Stmt::Package("b".into())));
        other.add_root(id);
        assert!(!left.same_structure(&other));
    }
}

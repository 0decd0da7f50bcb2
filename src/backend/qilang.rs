//! Canonical qilang form
//!
//! Output parses back to a structurally identical tree. Binary operations are fully parenthesized, so precedence never
//! has to be reconstructed; everything else is printed the way it is usually written.

use qilang_core::lang::operators::{self, OperatorId};
use qilang_core::lang::types as builtin_types;
use qilang_syntax::ast::{
    Ast, Decl, EnumFieldKind, Expr, ImportKind, Literal, Node, NodeId, Param, Stmt, TypeExpr,
};

use super::quote;
use super::writer::{CodeWriter, CodegenOptions, ScopedIndent};

/// Print every top-level node of `ast` in canonical form.
pub fn format_qilang(ast: &Ast, options: CodegenOptions) -> String {
    let mut w = CodeWriter::new(options);
    let printer = Printer { ast };
    for &root in ast.roots() {
        printer.top_level(&mut w, root);
    }
    w.finish()
}

/// Canonical spelling of a type expression.
pub fn type_to_string(ast: &Ast, id: NodeId) -> String {
    Printer { ast }.type_expr(id)
}

/// Canonical spelling of a literal or expression node.
pub fn value_to_string(ast: &Ast, id: NodeId) -> String {
    Printer { ast }.value(id)
}

struct Printer<'a> {
    ast: &'a Ast,
}

impl Printer<'_> {
    // ========================================================================
    // Statements and declarations
    // ========================================================================

    fn top_level(&self, w: &mut CodeWriter, id: NodeId) {
        self.node(w, id);
        if matches!(
            self.ast.node(id),
            Node::Decl(Decl::Interface(_) | Decl::Struct(_) | Decl::Enum(_)) | Node::Stmt(Stmt::ObjectDef(_))
        ) {
            w.newline();
        }
    }

    fn node(&self, w: &mut CodeWriter, id: NodeId) {
        match self.ast.node(id) {
            Node::Decl(decl) => self.decl(w, decl),
            Node::Stmt(stmt) => self.stmt(w, stmt),
            Node::Literal(_) | Node::Expr(_) | Node::TypeExpr(_) => w.writeln(&self.value(id)),
        }
    }

    fn doc(&self, w: &mut CodeWriter, doc: Option<&str>) {
        if let Some(doc) = doc {
            for line in doc.split('\n') {
                w.writeln(&format!("## {}", line));
            }
        }
    }

    fn decl(&self, w: &mut CodeWriter, decl: &Decl) {
        self.doc(w, decl.doc());
        match decl {
            Decl::Interface(d) => {
                w.writeln(&format!("interface {}{}", d.name, inherits(&d.inherits)));
                self.block(w, &d.members);
            }
            Decl::Fn(d) => {
                let mut line = format!("fn {}({})", d.name, self.params(&d.params));
                if let Some(ret) = d.ret {
                    line.push(' ');
                    line.push_str(&self.type_expr(ret));
                }
                w.writeln(&line);
            }
            Decl::Emit(d) => w.writeln(&format!("emit {}({})", d.name, self.params(&d.params))),
            Decl::Prop(d) => w.writeln(&format!("prop {}({})", d.name, self.params(&d.params))),
            Decl::Struct(d) => {
                w.writeln(&format!("struct {}{}", d.name, inherits(&d.inherits)));
                self.block(w, &d.fields);
            }
            Decl::StructField(d) => {
                let mut line = format!("{} {}", d.name, self.type_expr(d.ty));
                if let Some(default) = d.default {
                    line.push_str(" = ");
                    line.push_str(&self.value(default));
                }
                w.writeln(&line);
            }
            Decl::Const(d) => {
                let line = match d.ty {
                    Some(ty) => format!("const {} {} = {}", d.name, self.type_expr(ty), self.value(d.value)),
                    None => format!("const {} = {}", d.name, self.value(d.value)),
                };
                w.writeln(&line);
            }
            Decl::TypeDef(d) => w.writeln(&format!("typedef {} {}", self.type_expr(d.ty), d.name)),
            Decl::Enum(d) => {
                w.writeln(&format!("enum {}", d.name));
                self.block(w, &d.fields);
            }
            Decl::EnumField(d) => match d.kind {
                EnumFieldKind::Const(value) => w.writeln(&format!("const {} = {}", d.name, self.value(value))),
                EnumFieldKind::Type(ty) => w.writeln(&format!("typedef {} {}", self.type_expr(ty), d.name)),
            },
        }
    }

    fn stmt(&self, w: &mut CodeWriter, stmt: &Stmt) {
        match stmt {
            Stmt::Package(name) => w.writeln(&format!("package {}", name)),
            Stmt::Import(import) => {
                let line = match &import.kind {
                    ImportKind::Package => format!("import {}", import.package),
                    ImportKind::List(names) => format!("from {} import {}", import.package, names.join(", ")),
                    ImportKind::All => format!("from {} import *", import.package),
                };
                w.writeln(&line);
            }
            Stmt::ObjectDef(def) => {
                w.writeln(&format!("object {} {}", self.type_expr(def.ty), self.value(def.name)));
                self.block(w, &def.body);
            }
            Stmt::PropertyDef(def) => w.writeln(&format!("prop {} {}", def.name, self.value(def.value))),
            Stmt::At(at) => w.writeln(&format!("at {} {}", self.value(at.sender), self.value(at.receiver))),
            Stmt::VarDef(def) => {
                let mut line = format!("var {}", def.name);
                if let Some(ty) = def.ty {
                    line.push(' ');
                    line.push_str(&self.type_expr(ty));
                }
                if let Some(value) = def.value {
                    line.push_str(" = ");
                    line.push_str(&self.value(value));
                }
                w.writeln(&line);
            }
            Stmt::Comment(text) => w.writeln(&format!("# {}", text)),
        }
    }

    /// Indented children followed by `end`.
    fn block(&self, w: &mut CodeWriter, children: &[NodeId]) {
        {
            let mut body = ScopedIndent::new(w);
            for &child in children {
                self.node(&mut body, child);
            }
        }
        w.writeln("end");
    }

    fn params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|p| match &p.name {
                Some(name) => format!("{} {}", name, self.type_expr(p.ty)),
                None => self.type_expr(p.ty),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_expr(&self, id: NodeId) -> String {
        match self.ast.type_expr(id) {
            Some(TypeExpr::Builtin(builtin)) => builtin_types::as_str(*builtin).to_string(),
            Some(TypeExpr::Custom(name)) => name.clone(),
            Some(TypeExpr::List(element)) => format!("[]{}", self.type_expr(*element)),
            Some(TypeExpr::Map { key, value }) => format!("[{}]{}", self.type_expr(*key), self.type_expr(*value)),
            Some(TypeExpr::Tuple(elements)) => format!("({})", self.join(elements, |id| self.type_expr(id))),
            None => self.value(id),
        }
    }

    // ========================================================================
    // Values
    // ========================================================================

    fn value(&self, id: NodeId) -> String {
        match self.ast.node(id) {
            Node::Literal(literal) => self.literal(literal),
            Node::Expr(expr) => self.expr(expr),
            Node::TypeExpr(_) => self.type_expr(id),
            Node::Decl(decl) => decl.name().to_string(),
            Node::Stmt(_) => String::new(),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Bool(v) => v.to_string(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => format!("{:?}", v),
            Literal::String(s) => quote(s),
            Literal::List(items) => format!("[{}]", self.join(items, |id| self.value(id))),
            Literal::Tuple(items) if items.len() == 1 => format!("({},)", self.value(items[0])),
            Literal::Tuple(items) => format!("({})", self.join(items, |id| self.value(id))),
            Literal::Dict(pairs) => {
                let entries: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", self.value(*k), self.value(*v)))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::BinaryOp {
                op: OperatorId::FetchArray,
                left,
                right,
            } => {
                let target = match self.ast.expr(*left) {
                    Some(Expr::UnaryOp { .. }) => format!("({})", self.value(*left)),
                    _ => self.value(*left),
                };
                format!("{}[{}]", target, self.value(*right))
            }
            Expr::BinaryOp { op, left, right } => {
                format!("({} {} {})", self.value(*left), operators::as_str(*op), self.value(*right))
            }
            Expr::UnaryOp { op, operand } => format!("{}{}", operators::as_str(*op), self.value(*operand)),
            Expr::Var(name) => name.clone(),
            Expr::Literal(literal) => self.value(*literal),
            Expr::Call { name, args } => format!("{}({})", name, self.join(args, |id| self.value(id))),
        }
    }

    fn join(&self, ids: &[NodeId], render: impl Fn(NodeId) -> String) -> String {
        ids.iter().map(|id| render(*id)).collect::<Vec<_>>().join(", ")
    }
}

fn inherits(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!("({})", names.join(", "))
    }
}

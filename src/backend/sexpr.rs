//! S-expression dump of the AST
//!
//! Every node becomes `(tag ...)`; blocks put their children on indented lines and close on a line of their own.

use qilang_core::lang::operators;
use qilang_core::lang::types as builtin_types;
use qilang_syntax::ast::{
    Ast, Decl, EnumFieldKind, Expr, ImportKind, Literal, Node, NodeId, Param, Stmt, TypeExpr,
};

use super::quote;
use super::writer::{CodeWriter, CodegenOptions, ScopedIndent};

pub fn format_sexpr(ast: &Ast, options: CodegenOptions) -> String {
    let mut w = CodeWriter::new(options);
    let dumper = Dumper { ast };
    for &root in ast.roots() {
        dumper.node(&mut w, root);
    }
    w.finish()
}

struct Dumper<'a> {
    ast: &'a Ast,
}

impl Dumper<'_> {
    fn node(&self, w: &mut CodeWriter, id: NodeId) {
        match self.ast.node(id) {
            Node::Decl(decl) => self.decl(w, decl),
            Node::Stmt(stmt) => self.stmt(w, stmt),
            Node::Literal(_) | Node::Expr(_) | Node::TypeExpr(_) => w.writeln(&self.value(id)),
        }
    }

    /// `header` on one line, children indented, `)` on its own line.
    fn block(&self, w: &mut CodeWriter, header: &str, children: &[NodeId]) {
        w.writeln(header);
        {
            let mut body = ScopedIndent::new(w);
            for &child in children {
                self.node(&mut body, child);
            }
        }
        w.writeln(")");
    }

    fn decl(&self, w: &mut CodeWriter, decl: &Decl) {
        match decl {
            Decl::Interface(d) => {
                self.block(w, &format!("(interface {}{}", d.name, inherit(&d.inherits)), &d.members)
            }
            Decl::Fn(d) => {
                let mut line = format!("(fn {} ({})", d.name, self.params(&d.params));
                if let Some(ret) = d.ret {
                    line.push(' ');
                    line.push_str(&self.type_expr(ret));
                }
                line.push(')');
                w.writeln(&line);
            }
            Decl::Emit(d) => w.writeln(&format!("(emit {} ({}))", d.name, self.params(&d.params))),
            Decl::Prop(d) => w.writeln(&format!("(prop {} ({}))", d.name, self.params(&d.params))),
            Decl::Struct(d) => self.block(w, &format!("(struct {}{}", d.name, inherit(&d.inherits)), &d.fields),
            Decl::StructField(d) => {
                let mut line = format!("(field {} {}", d.name, self.type_expr(d.ty));
                if let Some(default) = d.default {
                    line.push(' ');
                    line.push_str(&self.value(default));
                }
                line.push(')');
                w.writeln(&line);
            }
            Decl::Const(d) => {
                let mut line = format!("(defconst {}", d.name);
                if let Some(ty) = d.ty {
                    line.push(' ');
                    line.push_str(&self.type_expr(ty));
                }
                line.push(' ');
                line.push_str(&self.value(d.value));
                line.push(')');
                w.writeln(&line);
            }
            Decl::TypeDef(d) => w.writeln(&format!("(typedef {} {})", self.type_expr(d.ty), d.name)),
            Decl::Enum(d) => self.block(w, &format!("(enum {}", d.name), &d.fields),
            Decl::EnumField(d) => match d.kind {
                EnumFieldKind::Const(value) => w.writeln(&format!("(const {} {})", d.name, self.value(value))),
                EnumFieldKind::Type(ty) => w.writeln(&format!("(typedef {} {})", self.type_expr(ty), d.name)),
            },
        }
    }

    fn stmt(&self, w: &mut CodeWriter, stmt: &Stmt) {
        match stmt {
            Stmt::Package(name) => w.writeln(&format!("(package {})", name)),
            Stmt::Import(import) => {
                let line = match &import.kind {
                    ImportKind::Package => format!("(import {})", import.package),
                    ImportKind::List(names) => format!("(from {} (import {}))", import.package, names.join(" ")),
                    ImportKind::All => format!("(from {} (import *))", import.package),
                };
                w.writeln(&line);
            }
            Stmt::ObjectDef(def) => {
                let header = format!("(object {} {}", self.type_expr(def.ty), self.value(def.name));
                self.block(w, &header, &def.body);
            }
            Stmt::PropertyDef(def) => w.writeln(&format!("(prop {} {})", def.name, self.value(def.value))),
            Stmt::At(at) => w.writeln(&format!("(at {} {})", self.value(at.sender), self.value(at.receiver))),
            Stmt::VarDef(def) => {
                let mut line = format!("(defvar {}", def.name);
                for part in [def.ty.map(|t| self.type_expr(t)), def.value.map(|v| self.value(v))]
                    .into_iter()
                    .flatten()
                {
                    line.push(' ');
                    line.push_str(&part);
                }
                line.push(')');
                w.writeln(&line);
            }
            Stmt::Comment(text) => w.writeln(&format!("(comment {})", quote(text))),
        }
    }

    fn params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|p| match &p.name {
                Some(name) => format!("(param {} {})", name, self.type_expr(p.ty)),
                None => self.type_expr(p.ty),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn type_expr(&self, id: NodeId) -> String {
        match self.ast.type_expr(id) {
            Some(TypeExpr::Builtin(builtin)) => format!("(type {})", builtin_types::as_str(*builtin)),
            Some(TypeExpr::Custom(name)) => format!("(type {})", name),
            Some(TypeExpr::List(element)) => format!("(listtype {})", self.type_expr(*element)),
            Some(TypeExpr::Map { key, value }) => {
                format!("(maptype {} {})", self.type_expr(*key), self.type_expr(*value))
            }
            Some(TypeExpr::Tuple(elements)) => format!("(tupletype{})", self.spaced(elements, |id| self.type_expr(id))),
            None => self.value(id),
        }
    }

    fn value(&self, id: NodeId) -> String {
        match self.ast.node(id) {
            Node::Literal(literal) => match literal {
                Literal::Bool(v) => format!("(bool {})", v),
                Literal::Int(v) => format!("(int {})", v),
                Literal::Float(v) => format!("(float {:?})", v),
                Literal::String(s) => format!("(string {})", quote(s)),
                Literal::List(items) => format!("(list{})", self.spaced(items, |id| self.value(id))),
                Literal::Tuple(items) => format!("(tuple{})", self.spaced(items, |id| self.value(id))),
                Literal::Dict(pairs) => {
                    let entries: String = pairs
                        .iter()
                        .map(|(k, v)| format!(" ({} {})", self.value(*k), self.value(*v)))
                        .collect();
                    format!("(dict{})", entries)
                }
            },
            Node::Expr(expr) => match expr {
                Expr::BinaryOp { op, left, right } => format!(
                    "({} {} {})",
                    operators::as_str(*op),
                    self.value(*left),
                    self.value(*right)
                ),
                Expr::UnaryOp { op, operand } => format!("({} {})", operators::as_str(*op), self.value(*operand)),
                Expr::Var(name) => format!("(var {})", name),
                Expr::Literal(literal) => self.value(*literal),
                Expr::Call { name, args } => format!("(call {}{})", name, self.spaced(args, |id| self.value(id))),
            },
            Node::TypeExpr(_) => self.type_expr(id),
            Node::Decl(decl) => decl.name().to_string(),
            Node::Stmt(_) => String::new(),
        }
    }

    /// Each rendered item preceded by a space.
    fn spaced(&self, ids: &[NodeId], render: impl Fn(NodeId) -> String) -> String {
        ids.iter().map(|id| format!(" {}", render(*id))).collect()
    }
}

fn inherit(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(" (inherit {})", names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(source: &str) -> String {
        let ast = qilang_syntax::parse_source(source, "test/test.qi").unwrap();
        format_sexpr(&ast, CodegenOptions::default())
    }

    #[test]
    fn test_interface_block() {
        let out = dump("package test\ninterface X(Base)\n  fn ping() int32\n  fn set(v str, int32)\n  emit sig(bool)\nend\n");
        assert_eq!(
            out,
            "(package test)\n(interface X (inherit Base)\n  (fn ping () (type int32))\n  (fn set ((param v (type str)) (type int32)))\n  (emit sig ((type bool)))\n)\n"
        );
    }

    #[test]
    fn test_types() {
        let out = dump("package test\ntypedef [str][]pkg.T M\ntypedef (int32, float) T\n");
        assert!(out.contains("(typedef (maptype (type str) (listtype (type pkg.T))) M)"));
        assert!(out.contains("(typedef (tupletype (type int32) (type float)) T)"));
    }

    #[test]
    fn test_values_and_statements() {
        let out = dump("package test\nfrom a import X, Y\n# note\nconst C = {\"k\": (1, 2.5)}\nobject T \"o\"\n  prop p -x + f(1)\n  at s r\nend\n");
        assert!(out.contains("(from a (import X Y))\n"));
        assert!(out.contains("(comment \"note\")\n"));
        assert!(out.contains("(defconst C (dict ((string \"k\") (tuple (int 1) (float 2.5)))))\n"));
        assert!(out.contains("(object (type T) (string \"o\")\n  (prop p (+ (- (var x)) (call f (int 1))))\n  (at (var s) (var r))\n)\n"));
    }

    #[test]
    fn test_every_builtin_has_one_rendering() {
        for info in builtin_types::BUILTIN_TYPES {
            let out = dump(&format!("package test\ntypedef {} T\n", info.canonical));
            assert!(out.contains(&format!("(typedef (type {}) T)", info.canonical)));
        }
    }
}

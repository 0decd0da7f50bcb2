//! Include extraction for generated C++ files.

use qilang_core::lang::types::{BuiltinCategory, BuiltinTypeId, category};
use qilang_syntax::ast::{Ast, Decl, ImportKind, Node, NodeId, Stmt, TypeExpr};
use qilang_syntax::visitor::{Visitor, Walk, walk};

use super::{header_include, own_include};
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

fn builtin_include(id: BuiltinTypeId) -> Option<&'static str> {
    use BuiltinTypeId::*;
    match id {
        Int8 | UInt8 | Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 => return Some("<qi/types.hpp>"),
        _ => {}
    }
    match category(id) {
        BuiltinCategory::String => Some("<string>"),
        BuiltinCategory::Value => Some("<qi/anyvalue.hpp>"),
        BuiltinCategory::Object => Some("<qi/anyobject.hpp>"),
        BuiltinCategory::Buffer => Some("<qi/buffer.hpp>"),
        BuiltinCategory::Duration | BuiltinCategory::TimePoint => Some("<qi/clock.hpp>"),
        _ => None,
    }
}

/// Every header needed by the declarations of `file`, deduplicated, in order of first occurrence.
///
/// Custom types declared in another file, in this package or another one, pull in that file's interface header.
/// With `include_self` the file's own interface header comes first.
pub fn extract_includes(pm: &PackageManager, file: &ParsedFile, include_self: bool) -> Vec<String> {
    let mut collector = IncludeCollector {
        pm,
        file,
        includes: Vec::new(),
    };
    if include_self {
        collector.add(own_include(file));
    }
    walk(&file.ast, &mut collector, file.ast.roots());
    tracing::debug!(count = collector.includes.len(), file = %file.filename, "extracted includes");
    collector.includes
}

struct IncludeCollector<'a> {
    pm: &'a PackageManager,
    file: &'a ParsedFile,
    includes: Vec<String>,
}

impl IncludeCollector<'_> {
    fn add(&mut self, header: impl Into<String>) {
        let header = header.into();
        if !self.includes.contains(&header) {
            self.includes.push(header);
        }
    }

    /// Header of the file declaring `package.name`, unless it is this file.
    fn header_of(&mut self, package: &str, name: &str) {
        if let Some(export) = self.pm.find_export(package, name) {
            if export.file.path != self.file.path {
                self.add(header_include(&export.file.package, export.file.stem()));
            }
        }
    }
}

impl Visitor for IncludeCollector<'_> {
    fn enter(&mut self, ast: &Ast, _parent: Option<NodeId>, node: NodeId) -> Walk {
        match ast.node(node) {
            Node::TypeExpr(ty) => match ty {
                TypeExpr::Builtin(builtin) => {
                    if let Some(header) = builtin_include(*builtin) {
                        self.add(header);
                    }
                }
                TypeExpr::List(_) => self.add("<vector>"),
                TypeExpr::Map { .. } => self.add("<map>"),
                TypeExpr::Tuple(_) => self.add("<utility>"),
                TypeExpr::Custom(_) => {
                    if let Some(resolved) = self.pm.resolution(&self.file.path, node) {
                        let (package, name) = (resolved.package.clone(), resolved.name.clone());
                        self.header_of(&package, &name);
                    }
                }
            },
            Node::Decl(Decl::Interface(_)) => self.add("<qi/anyobject.hpp>"),
            Node::Decl(Decl::Emit(_)) => self.add("<qi/signal.hpp>"),
            Node::Decl(Decl::Prop(_)) => self.add("<qi/property.hpp>"),
            Node::Stmt(Stmt::Import(import)) => {
                if let ImportKind::List(names) = &import.kind {
                    for name in names {
                        self.header_of(&import.package, name);
                    }
                }
            }
            _ => {}
        }
        Walk::Continue
    }
}

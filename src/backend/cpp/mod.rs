//! C++ generators.
//!
//! Every generator renders one parsed file against the package manager's resolution table. Type and value rendering
//! is shared in [`types`], include extraction in [`includes`]; this module only holds the file-level helpers
//! (banner, guards, namespaces) that all generators agree on.
//!
//! ## See also
//! - [`interface`]: abstract sync/async interface classes (`cppi`)
//! - [`local`]: local async/sync wrappers and the registration macro (`cppl`)
//! - [`remote`]: remote proxies (`cppr`)
//! - [`bind`]: type registration glue (`cppb`)
//! - [`gmock`]: gmock classes (`cppg`)

pub mod bind;
pub mod gmock;
pub mod includes;
pub mod interface;
pub mod local;
pub mod remote;
pub mod types;

use qilang_syntax::ast::{Ast, Decl, FnDecl, InterfaceDecl, Location, MemberDecl, NodeId, Stmt};

use super::writer::CodeWriter;
use super::{Backend, GenError};
use crate::frontend::package::ParsedFile;

pub(crate) const BANNER: [&str; 3] = ["/*", "** qiLang generated file. DO NOT EDIT", "*/"];

pub(crate) fn unsupported(backend: Backend, construct: impl Into<String>, location: &Location) -> GenError {
    GenError::Unsupported {
        backend,
        construct: construct.into(),
        location: location.clone(),
    }
}

/// `::a::b` for package `a.b`.
pub fn namespace_path(package: &str) -> String {
    package.split('.').map(|segment| format!("::{}", segment)).collect()
}

/// `::a::b::Name`
pub fn qualified(package: &str, name: &str) -> String {
    format!("{}::{}", namespace_path(package), name)
}

/// Inherited interface as written in the source, spelled with `::`.
pub fn base_name(name: &str) -> String {
    name.replace('.', "::")
}

/// Fully qualified base interface: dotted names are absolute, plain names belong to `package`.
pub fn qualified_base(package: &str, name: &str) -> String {
    if name.contains('.') {
        format!("::{}", base_name(name))
    } else {
        qualified(package, name)
    }
}

/// Fail on the first top-level statement that only describes object instances.
pub(crate) fn reject_object_statements(backend: Backend, ast: &Ast) -> Result<(), GenError> {
    for &root in ast.roots() {
        let construct = match ast.stmt(root) {
            Some(Stmt::ObjectDef(_)) => "object definition",
            Some(Stmt::PropertyDef(_)) => "property definition",
            Some(Stmt::At(_)) => "at statement",
            _ => continue,
        };
        return Err(unsupported(backend, construct, ast.location(root)));
    }
    Ok(())
}

/// `A_B_ROBOT` for package `a.b`, file `robot.qi`.
pub fn guard_base(package: &str, stem: &str) -> String {
    format!("{}_{}", package, stem)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Header of the interface file generated for `file`: `<a/b/robot.hpp>`.
pub fn header_include(package: &str, stem: &str) -> String {
    format!("<{}/{}.hpp>", package.replace('.', "/"), stem)
}

pub(crate) fn own_include(file: &ParsedFile) -> String {
    header_include(&file.package, file.stem())
}

pub(crate) fn write_banner(w: &mut CodeWriter) {
    for line in BANNER {
        w.writeln(line);
    }
}

pub(crate) fn open_namespaces(w: &mut CodeWriter, package: &str) {
    for segment in package.split('.') {
        w.writeln(&format!("namespace {} {{", segment));
    }
    w.newline();
}

pub(crate) fn close_namespaces(w: &mut CodeWriter, package: &str) {
    for segment in package.rsplit('.') {
        w.writeln(&format!("}} // namespace {}", segment));
    }
}

/// Top-level interfaces of a file, in source order.
pub(crate) fn interfaces(ast: &Ast) -> impl Iterator<Item = (NodeId, &InterfaceDecl)> {
    ast.roots().iter().filter_map(|&id| match ast.decl(id) {
        Some(Decl::Interface(iface)) => Some((id, iface)),
        _ => None,
    })
}

/// Members of an interface, split by kind.
#[derive(Debug, Default)]
pub(crate) struct Members<'a> {
    pub methods: Vec<(NodeId, &'a FnDecl)>,
    pub signals: Vec<(NodeId, &'a MemberDecl)>,
    pub properties: Vec<(NodeId, &'a MemberDecl)>,
}

impl<'a> Members<'a> {
    pub fn of(ast: &'a Ast, iface: &'a InterfaceDecl) -> Self {
        let mut members = Members::default();
        for &id in &iface.members {
            match ast.decl(id) {
                Some(Decl::Fn(f)) => members.methods.push((id, f)),
                Some(Decl::Emit(m)) => members.signals.push((id, m)),
                Some(Decl::Prop(m)) => members.properties.push((id, m)),
                _ => {}
            }
        }
        members
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    use crate::backend::{Backend, CodegenOptions, GenError, generate};
    use crate::frontend::diagnostics::DiagnosticManager;
    use crate::frontend::package::FileRef;
    use crate::frontend::package_manager::PackageManager;

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    pub fn temp_root() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("qilang_cpp_test_{}_{}", std::process::id(), id))
    }

    /// Write `files` (`(relative path, text)`) under a fresh root and analyse the package of the first one.
    pub fn analysed(files: &[(&str, &str)]) -> (PackageManager, FileRef) {
        let root = temp_root();
        for (relative, text) in files {
            let path = root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, text).unwrap();
        }
        let mut pm = PackageManager::new();
        pm.add_include(&root);
        let target = pm.parse_file(&root.join(files[0].0)).unwrap();
        pm.anal(Some(&target.package)).unwrap();
        fs::remove_dir_all(&root).unwrap();
        (pm, target)
    }

    /// Run `backend` on the first of `files`.
    pub fn generate_files(backend: Backend, files: &[(&str, &str)]) -> (Result<String, GenError>, DiagnosticManager) {
        let (pm, target) = analysed(files);
        let mut diagnostics = DiagnosticManager::new();
        let result = generate(backend, &pm, &target, &mut diagnostics, CodegenOptions::default());
        (result, diagnostics)
    }

    /// Generate `backend` output for a single file `test/robot.qi`.
    pub fn generate_one(backend: Backend, source: &str) -> Result<String, GenError> {
        generate_files(backend, &[("test/robot.qi", source)]).0
    }
}

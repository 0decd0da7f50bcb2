//! Type registration glue (`cpp_bind`).
//!
//! Every interface gets a static `initTypeN()` function that builds its `qi::ObjectTypeBuilder` and a static
//! initializer calling it at load time.

use qilang_syntax::ast::{Decl, InterfaceDecl, Stmt};

use super::includes::extract_includes;
use super::types::{CppTypes, ParamsFormat};
use super::{
    Members, close_namespaces, open_namespaces, qualified, qualified_base, reject_object_statements, unsupported,
    write_banner,
};
use crate::backend::writer::{CodeWriter, CodegenOptions, ScopedIndent};
use crate::backend::{Backend, GenError};
use crate::frontend::diagnostics::DiagnosticManager;
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

const BACKEND: Backend = Backend::CppBind;

pub fn generate(
    pm: &PackageManager,
    file: &ParsedFile,
    diagnostics: &mut DiagnosticManager,
    options: CodegenOptions,
) -> Result<String, GenError> {
    reject_object_statements(BACKEND, &file.ast)?;
    let types = CppTypes::new(pm, file, BACKEND);
    let ast = &file.ast;
    let mut w = CodeWriter::new(options);

    write_banner(&mut w);
    w.writeln("#include <qi/type/objecttypebuilder.hpp>");
    for include in extract_includes(pm, file, true) {
        w.writeln(&format!("#include {}", include));
    }
    w.newline();
    open_namespaces(&mut w, &file.package);

    let mut counter = 0;
    for &root in ast.roots() {
        let location = ast.location(root);
        match (ast.decl(root), ast.stmt(root)) {
            (Some(Decl::Interface(iface)), _) => {
                register_interface(&mut w, &types, file, iface, counter)?;
                counter += 1;
            }
            (Some(Decl::Fn(f)), _) => {
                w.writeln(&format!("//QI_REGISTER_OBJECT_FACTORY({});", f.name));
            }
            (Some(Decl::Struct(s)), _) => {
                diagnostics.warning(location.clone(), format!("struct '{}' is not registered", s.name));
            }
            (Some(Decl::Enum(e)), _) => {
                diagnostics.warning(location.clone(), format!("enum '{}' is not registered", e.name));
            }
            (Some(Decl::TypeDef(t)), _) => {
                diagnostics.warning(location.clone(), format!("typedef '{}' is not registered", t.name));
            }
            (Some(Decl::Const(_)), _) => return Err(unsupported(BACKEND, "const declaration", location)),
            (_, Some(Stmt::VarDef(_))) => return Err(unsupported(BACKEND, "var definition", location)),
            _ => {}
        }
    }

    close_namespaces(&mut w, &file.package);
    Ok(w.finish())
}

fn register_interface(
    w: &mut CodeWriter,
    types: &CppTypes<'_>,
    file: &ParsedFile,
    iface: &InterfaceDecl,
    counter: usize,
) -> Result<(), GenError> {
    let full = qualified(&file.package, &iface.name);
    let members = Members::of(&file.ast, iface);

    w.writeln(&format!("static int initType{}() {{", counter));
    {
        let mut body = ScopedIndent::new(&mut *w);
        body.writeln(&format!("qi::ObjectTypeBuilder< {} > builder;", full));
        for base in &iface.inherits {
            body.writeln(&format!("builder.inherits< {} >();", qualified_base(&file.package, base)));
        }
        for (_, f) in &members.methods {
            let ret = types.return_type(f.ret)?;
            let params = types.params(&f.params, ParamsFormat::TypeOnly)?;
            body.writeln(&format!(
                "builder.advertiseMethod(\"{name}\", static_cast< {ret}({full}::*)({params}) >(&{full}::{name}));",
                name = f.name
            ));
        }
        for (_, signal) in &members.signals {
            body.writeln(&format!("builder.advertiseSignal(\"{0}\", &{1}::{0});", signal.name, full));
        }
        for (_, prop) in &members.properties {
            body.writeln(&format!("builder.advertiseProperty(\"{0}\", &{1}::{0});", prop.name, full));
        }
        body.writeln("builder.registerType();");
        body.writeln("return 42;");
    }
    w.writeln("}");
    w.writeln(&format!("static int myinittype{0} = initType{0}();", counter));
    w.newline();
    Ok(())
}

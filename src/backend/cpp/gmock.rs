//! gmock classes (`cpp_gmock`).
//!
//! Mocks implement the asynchronous contract: every method is a `MOCK_METHODn` returning `::qi::Future<R>`. Each
//! mock type registers itself (and its `Nice`/`Strict` variants) with the type system the first time one is built.

use qilang_syntax::ast::InterfaceDecl;

use super::types::{CppTypes, ParamsFormat};
use super::{Members, guard_base, interfaces, own_include, reject_object_statements};
use crate::backend::writer::{CodeWriter, CodegenOptions, ScopedIndent};
use crate::backend::{Backend, GenError};
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

const BACKEND: Backend = Backend::CppGmock;

pub fn header_guard(file: &ParsedFile) -> String {
    format!("_QILANG_GEN_GMOCK_{}_HPP", guard_base(&file.package, file.stem()))
}

pub fn generate(pm: &PackageManager, file: &ParsedFile, options: CodegenOptions) -> Result<String, GenError> {
    reject_object_statements(BACKEND, &file.ast)?;
    let types = CppTypes::new(pm, file, BACKEND);
    let guard = header_guard(file);
    let mut w = CodeWriter::new(options);

    w.writeln("// QiLang-generated file. DO NOT EDIT.");
    w.writeln("#pragma once");
    w.writeln(&format!("#ifndef {}", guard));
    w.writeln(&format!("#define {}", guard));
    w.newline();
    w.writeln("#include <gmock/gmock.h>");
    w.writeln(&format!("#include {}", own_include(file)));
    w.newline();

    let mut namespaces: Vec<&str> = file.package.split('.').collect();
    namespaces.push("gmock");
    for ns in &namespaces {
        w.writeln(&format!("namespace {}", ns));
        w.writeln("{");
    }
    for (_, iface) in interfaces(&file.ast) {
        mock_interface(&mut w, &types, file, iface)?;
    }
    for ns in namespaces.iter().rev() {
        w.writeln(&format!("}} // ends namespace {}", ns));
    }
    w.newline();
    w.writeln(&format!("#endif // {}", guard));
    Ok(w.finish())
}

fn mock_interface(
    w: &mut CodeWriter,
    types: &CppTypes<'_>,
    file: &ParsedFile,
    iface: &InterfaceDecl,
) -> Result<(), GenError> {
    let members = Members::of(&file.ast, iface);
    let register = format!("register{}InTypeBuilder", iface.name);
    let mock = format!("{}GMock", iface.name);
    let nice = format!("{}NiceGMock", iface.name);
    let strict = format!("{}StrictGMock", iface.name);

    w.writeln("namespace detail");
    w.writeln("{");
    w.writeln("template <typename T>");
    w.writeln(&format!("void {}(::qi::ObjectTypeBuilder<T>&& typeBuilder)", register));
    w.writeln("{");
    {
        let mut body = ScopedIndent::new(&mut *w);
        for (_, f) in &members.methods {
            body.writeln(&format!(
                "typeBuilder.advertiseMethod(\"{0}\", static_cast<::qi::Future<{1}>(T::*)({2})>(&T::{0}));",
                f.name,
                types.return_type(f.ret)?,
                types.params(&f.params, ParamsFormat::TypeOnly)?
            ));
        }
        for (_, signal) in &members.signals {
            body.writeln(&format!(
                "typeBuilder.advertiseSignal(\"{0}\", static_cast<::qi::Signal<{1}> T::*>(&T::{0}));",
                signal.name,
                types.value_types(&signal.params)?
            ));
        }
        for (_, prop) in &members.properties {
            body.writeln(&format!(
                "typeBuilder.advertiseProperty(\"{0}\", static_cast<::qi::Property<{1}> T::*>(&T::{0}));",
                prop.name,
                types.value_types(&prop.params)?
            ));
        }
        body.writeln("typeBuilder.registerType();");
    }
    w.writeln("}");
    w.writeln("} // ends namespace detail");
    w.newline();

    w.writeln(&format!("struct {};", mock));
    w.writeln(&format!("using {} = ::testing::NiceMock<{}>;", nice, mock));
    w.writeln(&format!("using {} = ::testing::StrictMock<{}>;", strict, mock));
    w.newline();

    w.writeln(&format!("struct {}", mock));
    w.writeln("{");
    {
        let mut class = ScopedIndent::new(&mut *w);
        class.writeln(&format!("{}()", mock));
        class.writeln("{");
        {
            let mut ctor = ScopedIndent::new(&mut *class);
            ctor.writeln("static bool _typeRegistered_ = []");
            ctor.writeln("{");
            {
                let mut registration = ScopedIndent::new(&mut *ctor);
                for name in [&mock, &nice, &strict] {
                    registration.writeln(&format!("detail::{}(::qi::ObjectTypeBuilder<{}>{{}});", register, name));
                }
                registration.writeln("return true;");
            }
            ctor.writeln("}();");
            ctor.writeln("QI_UNUSED(_typeRegistered_);");
        }
        class.writeln("}");
        class.newline();

        for (_, f) in &members.methods {
            class.writeln(&format!(
                "MOCK_METHOD{}({}, ::qi::Future<{}>({}));",
                f.params.len(),
                f.name,
                types.return_type(f.ret)?,
                types.params(&f.params, ParamsFormat::TypeOnly)?
            ));
        }
        for (_, signal) in &members.signals {
            class.writeln(&format!("qi::Signal<{}> {};", types.value_types(&signal.params)?, signal.name));
        }
        for (_, prop) in &members.properties {
            class.writeln(&format!("qi::Property<{}> {};", types.value_types(&prop.params)?, prop.name));
        }
    }
    w.writeln("};");
    w.newline();
    Ok(())
}

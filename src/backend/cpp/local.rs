//! Local wrappers (`cpp_local`).
//!
//! For each interface `Name`:
//! - `NameLocalAsync<ImplPtr>` runs every method of the wrapped implementation asynchronously and returns a future,
//!   whatever the implementation itself returns;
//! - `NameLocalSync<ImplPtr>` forwards to the async wrapper and waits for the value;
//! - `REGISTER_NAME(impl__)` registers an implementation type with the type system, advertising every method through
//!   a static bounce function and attaching the method documentation.
//!
//! The macros are emitted after the namespaces are closed so they can be expanded anywhere.

use qilang_syntax::ast::{FnDecl, InterfaceDecl, NodeId};

use super::includes::extract_includes;
use super::interface::header_guard;
use super::types::{CppTypes, ParamsFormat};
use super::{
    Members, close_namespaces, interfaces, open_namespaces, qualified, qualified_base, reject_object_statements,
    write_banner,
};
use crate::backend::doc::documentation;
use crate::backend::writer::{CodeWriter, CodegenOptions, FormatAttr, ScopedFormatAttrActivate, ScopedIndent};
use crate::backend::{Backend, GenError, quote};
use crate::frontend::diagnostics::DiagnosticManager;
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

const BACKEND: Backend = Backend::CppLocal;

/// Name of the implementation type parameter of the registration macros.
const IMPL_TYPE_NAME: &str = "impl__";

pub fn generate(
    pm: &PackageManager,
    file: &ParsedFile,
    diagnostics: &mut DiagnosticManager,
    options: CodegenOptions,
) -> Result<String, GenError> {
    reject_object_statements(BACKEND, &file.ast)?;
    let generator = LocalGenerator {
        file,
        types: CppTypes::new(pm, file, BACKEND),
        bounce: FormatAttr::new(),
    };
    let mut w = CodeWriter::new(options);
    let guard = format!("{}_P", header_guard(file));

    write_banner(&mut w);
    w.writeln(&format!("#ifndef {}", guard));
    w.writeln(&format!("#define {}", guard));
    w.newline();
    w.writeln("#include <qi/future.hpp>");
    w.writeln("#include <qi/assert.hpp>");
    w.writeln("#include <qilang/detail/gencodeutility.hpp>");
    for include in extract_includes(pm, file, true) {
        w.writeln(&format!("#include {}", include));
    }
    w.newline();

    open_namespaces(&mut w, &file.package);
    for (_, iface) in interfaces(&file.ast) {
        generator.local_async(&mut w, iface)?;
        generator.local_sync(&mut w, iface)?;
    }
    close_namespaces(&mut w, &file.package);
    w.newline();

    for (id, iface) in interfaces(&file.ast) {
        generator.register_macro(&mut w, id, iface, diagnostics)?;
    }
    w.writeln(&format!("#endif // {}", guard));
    Ok(w.finish())
}

struct LocalGenerator<'a> {
    file: &'a ParsedFile,
    types: CppTypes<'a>,
    /// Set while emitting the static bounce functions of a registration macro.
    bounce: FormatAttr,
}

/// `, a, b` or nothing.
fn trailing(list: String) -> String {
    if list.is_empty() { list } else { format!(", {}", list) }
}

impl LocalGenerator<'_> {
    // ========================================================================
    // Wrappers
    // ========================================================================

    fn local_async(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        w.writeln("template <typename ImplPtr>");
        w.writeln(&format!("class {0}LocalAsync : public {0}Async", iface.name));
        w.writeln("{");
        w.writeln("public:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln(&format!("explicit {}LocalAsync(ImplPtr impl)", iface.name));
            body.writeln("  : _p(std::move(impl))");
            body.writeln("{}");
            body.newline();
            for (_, f) in &members.methods {
                self.async_method(&mut body, f)?;
            }
        }
        w.writeln("private:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln("ImplPtr _p;");
            body.writeln("using ImplType = typename ImplPtr::element_type;");
        }
        w.writeln("};");
        w.newline();
        Ok(())
    }

    fn async_method(&self, w: &mut CodeWriter, f: &FnDecl) -> Result<(), GenError> {
        let ret = self.types.return_type(f.ret)?;
        let params = self.types.params(&f.params, ParamsFormat::Normal)?;
        let names = self.types.params(&f.params, ParamsFormat::NameOnly)?;
        w.writeln(&format!("::qi::Future< {} > {}({})", ret, f.name, params));
        w.writeln("{");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln(&format!(
                "static auto f = [](const ImplPtr& self{}){{ QI_ASSERT_NOT_NULL(self); return self->{}({}); }};",
                trailing(params),
                f.name,
                names
            ));
            body.writeln(&format!("using ReturnType = decltype(f(_p{}));", trailing(names.clone())));
            body.writeln(&format!(
                "return qi::detail::tryUnwrap(qilang::detail::safeMemberAsync<ReturnType, ImplType>(f, _p{}));",
                trailing(names)
            ));
        }
        w.writeln("}");
        w.newline();
        Ok(())
    }

    fn local_sync(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        let fields: Vec<String> = members
            .signals
            .iter()
            .chain(members.properties.iter())
            .map(|(_, m)| format!("impl->{}", m.name))
            .collect();

        w.writeln("template <typename ImplPtr>");
        w.writeln(&format!("class {0}LocalSync : public {0}, public qi::Proxy", iface.name));
        w.writeln("{");
        w.writeln("public:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln(&format!("explicit {}LocalSync(ImplPtr impl)", iface.name));
            body.writeln(&format!("  : {}({})", iface.name, fields.join(", ")));
            body.writeln("  , _async(impl)");
            body.writeln("{}");
            body.newline();
            for (_, f) in &members.methods {
                let ret = self.types.return_type(f.ret)?;
                let params = self.types.params(&f.params, ParamsFormat::Normal)?;
                let names = self.types.params(&f.params, ParamsFormat::NameOnly)?;
                body.writeln(&format!("{} {}({})", ret, f.name, params));
                body.writeln("{");
                let call = format!("_async.{}({}).value();", f.name, names);
                if self.types.is_void(f.ret) {
                    body.writeln(&format!("  {}", call));
                } else {
                    body.writeln(&format!("  return {}", call));
                }
                body.writeln("}");
            }
            body.newline();
            body.writeln(&format!("{}Async& async()", iface.name));
            body.writeln("{");
            body.writeln(&format!("  return *static_cast<{}Async*>(&_async);", iface.name));
            body.writeln("}");
        }
        w.newline();
        w.writeln("private:");
        w.writeln(&format!("  {}LocalAsync<ImplPtr> _async;", iface.name));
        w.writeln("};");
        w.newline();
        Ok(())
    }

    // ========================================================================
    // Registration macro
    // ========================================================================

    fn register_macro(
        &self,
        w: &mut CodeWriter,
        id: NodeId,
        iface: &InterfaceDecl,
        diagnostics: &mut DiagnosticManager,
    ) -> Result<(), GenError> {
        let ast = &self.file.ast;
        let members = Members::of(ast, iface);
        let full = qualified(&self.file.package, &iface.name);
        let traits = format!("qi::detail::InterfaceImplTraits< {} >", full);
        if let Some(brief) = documentation(iface.doc.as_deref(), ast.location(id), diagnostics).and_then(|d| d.brief) {
            w.writeln(&format!("// {}", brief));
        }

        let mut lines = vec![
            format!("#define REGISTER_{}({})", iface.name.to_uppercase(), IMPL_TYPE_NAME),
            "static_assert(".to_string(),
            format!("    {}::Defined::value,", traits),
            format!(
                "    \"Missing QI_REGISTER_IMPLEMENTATION_H({}, \" #{} \") in the header of the implementation\");",
                full, IMPL_TYPE_NAME
            ),
            format!("QI_REGISTER_IMPLEMENTATION({}, {}::SyncType)", full, traits),
        ];
        {
            let _bounce = ScopedFormatAttrActivate::new(&self.bounce);
            for (member, f) in &members.methods {
                self.macro_method(&mut lines, *member, iface, f, diagnostics)?;
            }
        }
        lines.push(format!("static int initType{}() {{", iface.name));
        lines.push(format!("  qi::ObjectTypeBuilder< {} > builder;", full));
        for base in &iface.inherits {
            lines.push(format!("  builder.inherits< {} >();", qualified_base(&self.file.package, base)));
        }
        for (member, f) in &members.methods {
            self.macro_method(&mut lines, *member, iface, f, diagnostics)?;
        }
        for (_, signal) in &members.signals {
            lines.push(format!("  builder.advertiseSignal(\"{0}\", &{1}::{0});", signal.name, full));
        }
        for (_, prop) in &members.properties {
            lines.push(format!("  builder.advertiseProperty(\"{0}\", &{1}::{0});", prop.name, full));
        }
        lines.push("  builder.registerType();".to_string());
        lines.push("  return 42;".to_string());
        lines.push("}".to_string());

        for line in &lines {
            w.writeln(&format!("{} \\", line));
        }
        w.writeln(&format!("static int myinittype{0} = initType{0}();", iface.name));
        w.newline();
        Ok(())
    }

    /// Bounce function while `bounce` is active, advertisement block otherwise.
    fn macro_method(
        &self,
        lines: &mut Vec<String>,
        id: NodeId,
        iface: &InterfaceDecl,
        f: &FnDecl,
        diagnostics: &mut DiagnosticManager,
    ) -> Result<(), GenError> {
        let full = qualified(&self.file.package, &iface.name);
        let ret = self.types.return_type(f.ret)?;
        let bounce = format!("{}{}", iface.name, f.name);

        if self.bounce.is_active() {
            let params = self.types.params(&f.params, ParamsFormat::Normal)?;
            let names = self.types.params(&f.params, ParamsFormat::NameOnly)?;
            lines.push(format!(
                "static ::qi::Future< {} > {}({}* obj{}) {{",
                ret,
                bounce,
                full,
                trailing(params)
            ));
            lines.push(format!(
                "  return static_cast<qi::detail::InterfaceImplTraits< {} >::SyncType*>(obj)->async().{}({});",
                full, f.name, names
            ));
            lines.push("}".to_string());
            return Ok(());
        }

        let doc = documentation(f.doc.as_deref(), self.file.ast.location(id), diagnostics);
        let types = self.types.params(&f.params, ParamsFormat::TypeOnly)?;
        lines.push("  {".to_string());
        lines.push("    qi::MetaMethodBuilder mmb;".to_string());
        lines.push(format!("    mmb.setName(\"{}\");", f.name));
        if let Some(doc) = &doc {
            for (name, description) in &doc.params {
                lines.push(format!("    mmb.appendParameter({}, {});", quote(name), quote(description)));
            }
            if let Some(ret) = &doc.ret {
                lines.push(format!("    mmb.setReturnDescription({});", quote(ret)));
            }
            if let Some(description) = &doc.description {
                lines.push(format!("    mmb.setDescription({});", quote(description)));
            }
        }
        lines.push(format!(
            "    const auto callType = std::is_base_of<qi::Actor, {} >::value ? qi::MetaCallType_Direct : qi::MetaCallType_Auto;",
            IMPL_TYPE_NAME
        ));
        lines.push(format!(
            "    builder.advertiseMethod(mmb, static_cast<::qi::Future< {} > (*)({}*{})>(&{}), callType);",
            ret,
            full,
            trailing(types),
            bounce
        ));
        lines.push("  }".to_string());
        Ok(())
    }
}

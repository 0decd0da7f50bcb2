//! C++ interface header (`cpp_interface`).
//!
//! Every interface becomes two abstract classes: `Name` with blocking methods and `NameAsync` returning futures. Both
//! are forward declared, with their `Ptr` typedefs, before any body so that interfaces of one file can refer to each
//! other in any order.

use qilang_syntax::ast::{Decl, EnumFieldKind, InterfaceDecl, NodeId, Stmt};

use super::includes::extract_includes;
use super::types::{CppTypes, ParamsFormat};
use super::{Members, base_name, close_namespaces, guard_base, interfaces, open_namespaces, unsupported, write_banner};
use crate::backend::writer::{CodeWriter, CodegenOptions, ScopedIndent};
use crate::backend::{Backend, GenError};
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

const BACKEND: Backend = Backend::CppInterface;

pub fn header_guard(file: &ParsedFile) -> String {
    format!("QILANG_GEN_{}_HPP_", guard_base(&file.package, file.stem()))
}

pub fn generate(pm: &PackageManager, file: &ParsedFile, options: CodegenOptions) -> Result<String, GenError> {
    let generator = InterfaceGenerator {
        file,
        types: CppTypes::new(pm, file, BACKEND),
    };
    let mut w = CodeWriter::new(options);
    let guard = header_guard(file);

    write_banner(&mut w);
    w.writeln("#pragma once");
    w.writeln(&format!("#ifndef {}", guard));
    w.writeln(&format!("#define {}", guard));
    w.newline();
    for include in extract_includes(pm, file, false) {
        w.writeln(&format!("#include {}", include));
    }
    w.newline();

    open_namespaces(&mut w, &file.package);
    generator.forward_declarations(&mut w);
    for &root in file.ast.roots() {
        generator.top_level(&mut w, root)?;
    }
    close_namespaces(&mut w, &file.package);
    w.newline();
    w.writeln(&format!("#endif // {}", guard));
    Ok(w.finish())
}

struct InterfaceGenerator<'a> {
    file: &'a ParsedFile,
    types: CppTypes<'a>,
}

impl InterfaceGenerator<'_> {
    fn forward_declarations(&self, w: &mut CodeWriter) {
        let mut any = false;
        for (_, iface) in interfaces(&self.file.ast) {
            for class in [iface.name.clone(), format!("{}Async", iface.name)] {
                w.writeln(&format!("class {};", class));
                w.writeln(&format!("typedef qi::Object<{}> {}Ptr;", class, class));
            }
            any = true;
        }
        if any {
            w.newline();
        }
    }

    fn top_level(&self, w: &mut CodeWriter, id: NodeId) -> Result<(), GenError> {
        let ast = &self.file.ast;
        let location = ast.location(id);
        if let Some(stmt) = ast.stmt(id) {
            return match stmt {
                Stmt::Package(_) | Stmt::Import(_) => Ok(()),
                Stmt::Comment(text) => {
                    for line in text.lines() {
                        w.writeln(&format!("// {}", line));
                    }
                    Ok(())
                }
                Stmt::VarDef(def) => {
                    let ty = match (def.ty, def.value) {
                        (Some(ty), _) => self.types.type_name(ty)?,
                        (None, Some(value)) => self.types.inferred_type(value)?,
                        (None, None) => return Err(unsupported(BACKEND, "untyped variable without value", location)),
                    };
                    match def.value {
                        Some(value) => w.writeln(&format!("{} {} = {};", ty, def.name, self.types.value(value)?)),
                        None => w.writeln(&format!("{} {};", ty, def.name)),
                    }
                    Ok(())
                }
                Stmt::ObjectDef(_) => Err(unsupported(BACKEND, "object definition", location)),
                Stmt::PropertyDef(_) => Err(unsupported(BACKEND, "property definition", location)),
                Stmt::At(_) => Err(unsupported(BACKEND, "at statement", location)),
            };
        }

        match ast.decl(id) {
            Some(Decl::Interface(iface)) => {
                self.sync_class(w, iface)?;
                w.newline();
                self.async_class(w, iface)?;
                w.newline();
            }
            Some(Decl::Fn(f)) => {
                let ret = self.types.return_type(f.ret)?;
                let params = self.types.params(&f.params, ParamsFormat::Normal)?;
                w.writeln(&format!("{} {}({});", ret, f.name, params));
            }
            Some(Decl::Struct(s)) => {
                let mut header = format!("struct {}", s.name);
                if !s.inherits.is_empty() {
                    let bases: Vec<String> = s.inherits.iter().map(|b| format!("public {}", base_name(b))).collect();
                    header.push_str(": ");
                    header.push_str(&bases.join(", "));
                }
                w.writeln(&header);
                w.writeln("{");
                {
                    let mut body = ScopedIndent::new(w);
                    for &field in &s.fields {
                        let Some(Decl::StructField(f)) = ast.decl(field) else {
                            continue;
                        };
                        let ty = self.types.type_name(f.ty)?;
                        match f.default {
                            Some(default) => body.writeln(&format!("{} {} = {};", ty, f.name, self.types.value(default)?)),
                            None => body.writeln(&format!("{} {};", ty, f.name)),
                        }
                    }
                }
                w.writeln("};");
                w.newline();
            }
            Some(Decl::Const(c)) => {
                let value = self.types.value(c.value)?;
                let ty = match c.ty {
                    Some(ty) => self.types.type_name(ty)?,
                    None => self.types.inferred_type(c.value)?,
                };
                w.writeln(&format!("const {} {} = {};", ty, c.name, value));
            }
            Some(Decl::TypeDef(def)) => {
                w.writeln(&format!("typedef {} {};", self.types.type_name(def.ty)?, def.name));
            }
            Some(Decl::Enum(e)) => {
                w.writeln(&format!("enum {}", e.name));
                w.writeln("{");
                {
                    let mut body = ScopedIndent::new(w);
                    for &field in &e.fields {
                        let Some(Decl::EnumField(f)) = ast.decl(field) else {
                            continue;
                        };
                        match f.kind {
                            EnumFieldKind::Const(value) => {
                                body.writeln(&format!("{} = {},", f.name, self.types.value(value)?));
                            }
                            EnumFieldKind::Type(_) => {
                                return Err(unsupported(BACKEND, "type field in enum", ast.location(field)));
                            }
                        }
                    }
                }
                w.writeln("};");
                w.newline();
            }
            Some(Decl::Emit(_) | Decl::Prop(_) | Decl::StructField(_) | Decl::EnumField(_)) | None => {}
        }
        Ok(())
    }

    /// `class Name: virtual public Base` with one base per inherited interface.
    fn class_header(name: &str, inherits: &[String], suffix: &str) -> String {
        let mut header = format!("class {}{}", name, suffix);
        if !inherits.is_empty() {
            let bases: Vec<String> = inherits
                .iter()
                .map(|b| format!("virtual public {}{}", base_name(b), suffix))
                .collect();
            header.push_str(": ");
            header.push_str(&bases.join(", "));
        }
        header
    }

    fn sync_class(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        let mut fields = Vec::new();
        for (_, signal) in &members.signals {
            fields.push((format!("qi::Signal< {} >", self.types.value_types(&signal.params)?), &signal.name));
        }
        for (_, prop) in &members.properties {
            fields.push((format!("qi::Property< {} >", self.types.value_types(&prop.params)?), &prop.name));
        }

        w.writeln(&Self::class_header(&iface.name, &iface.inherits, ""));
        w.writeln("{");
        w.writeln("public:");
        let mut body = ScopedIndent::new(w);
        if !fields.is_empty() {
            let args: Vec<String> = fields.iter().map(|(ty, name)| format!("{}& {}", ty, name)).collect();
            body.writeln(&format!("{}({})", iface.name, args.join(", ")));
            for (index, (_, name)) in fields.iter().enumerate() {
                let sep = if index == 0 { ":" } else { "," };
                body.writeln(&format!("  {} {}({})", sep, name, name));
            }
            body.writeln("{");
            body.writeln("}");
        }
        body.writeln(&format!("virtual ~{}() {{}}", iface.name));
        for (_, f) in &members.methods {
            let ret = self.types.return_type(f.ret)?;
            let params = self.types.params(&f.params, ParamsFormat::Normal)?;
            body.writeln(&format!("virtual {} {}({}) = 0;", ret, f.name, params));
        }
        for (ty, name) in &fields {
            body.writeln(&format!("{}& {};", ty, name));
        }
        drop(body);
        w.writeln("};");
        Ok(())
    }

    fn async_class(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        w.writeln(&Self::class_header(&iface.name, &iface.inherits, "Async"));
        w.writeln("{");
        w.writeln("public:");
        {
            let mut body = ScopedIndent::new(w);
            body.writeln(&format!("virtual ~{}Async() {{}}", iface.name));
            for (_, f) in &members.methods {
                let ret = self.types.return_type(f.ret)?;
                let params = self.types.params(&f.params, ParamsFormat::Normal)?;
                body.writeln(&format!("virtual qi::Future< {} > {}({}) = 0;", ret, f.name, params));
            }
        }
        w.writeln("};");
        Ok(())
    }
}

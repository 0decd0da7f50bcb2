//! Remote proxies (`cpp_remote`).
//!
//! `NameAsyncRemote` and `NameRemote` forward every call by name through a `qi::AnyObject`. Proxies of inherited
//! interfaces are chained: `RobotRemote` derives from `BaseRemote` and constructs it from the same object, so
//! `qi::Proxy` is only a direct base of interfaces without parents.
//!
//! Interfaces are virtual bases of their proxies, so the most derived proxy constructs every inherited interface that
//! has signals or properties, binding it to the proxy fields declared (protected) by the matching base proxy.

use qilang_syntax::ast::{Decl, FnDecl, InterfaceDecl};

use super::includes::extract_includes;
use super::types::{CppTypes, ParamsFormat};
use super::{
    Members, base_name, close_namespaces, interfaces, open_namespaces, qualified, reject_object_statements,
    write_banner,
};
use crate::backend::writer::{CodeWriter, CodegenOptions, ScopedIndent};
use crate::backend::{Backend, GenError};
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

const BACKEND: Backend = Backend::CppRemote;

pub fn generate(pm: &PackageManager, file: &ParsedFile, options: CodegenOptions) -> Result<String, GenError> {
    reject_object_statements(BACKEND, &file.ast)?;
    let generator = RemoteGenerator {
        pm,
        file,
        types: CppTypes::new(pm, file, BACKEND),
    };
    let mut w = CodeWriter::new(options);

    write_banner(&mut w);
    w.writeln("#include <qi/type/objecttypebuilder.hpp>");
    for include in extract_includes(pm, file, true) {
        w.writeln(&format!("#include {}", include));
    }
    w.newline();

    open_namespaces(&mut w, &file.package);
    for (_, iface) in interfaces(&file.ast) {
        generator.async_remote(&mut w, iface)?;
        generator.sync_remote(&mut w, iface)?;
    }
    close_namespaces(&mut w, &file.package);

    for (_, iface) in interfaces(&file.ast) {
        w.newline();
        w.writeln(&format!(
            "bool qi::detail::ForceProxyInclusion< {} >::dummyCall() {{",
            qualified(&file.package, &iface.name)
        ));
        w.writeln("  return true;");
        w.writeln("}");
    }
    Ok(w.finish())
}

struct RemoteGenerator<'a> {
    pm: &'a PackageManager,
    file: &'a ParsedFile,
    types: CppTypes<'a>,
}

/// `"name", a, b` as the argument list of a by-name call.
fn call_args(name: &str, names: &str) -> String {
    if names.is_empty() {
        format!("\"{}\"", name)
    } else {
        format!("\"{}\", {}", name, names)
    }
}

impl RemoteGenerator<'_> {
    /// Constructor initializer list, one entry per line.
    fn initializers(w: &mut CodeWriter, entries: &[String]) {
        for (index, entry) in entries.iter().enumerate() {
            let sep = if index == 0 { ":" } else { "," };
            w.writeln(&format!("  {} {}", sep, entry));
        }
    }

    /// Interfaces inherited by `iface` (declared in `package`), transitively and each once, that have signals or
    /// properties: `(qualified name, bound field names)`. Bases that are not exported by a loaded package are skipped.
    fn inherited_fields(&self, package: &str, iface: &InterfaceDecl, out: &mut Vec<(String, Vec<String>)>) {
        for base in &iface.inherits {
            let (base_package, name) = base.rsplit_once('.').unwrap_or((package, base.as_str()));
            let Some(export) = self.pm.find_export(base_package, name) else {
                continue;
            };
            let Some(Decl::Interface(base_iface)) = export.decl() else {
                continue;
            };
            self.inherited_fields(&export.file.package, base_iface, out);

            let full = qualified(&export.file.package, name);
            let members = Members::of(&export.file.ast, base_iface);
            let fields: Vec<String> = members
                .signals
                .iter()
                .chain(&members.properties)
                .map(|(_, member)| format!("_{}", member.name))
                .collect();
            if !fields.is_empty() && !out.iter().any(|(known, _)| *known == full) {
                out.push((full, fields));
            }
        }
    }

    fn async_remote(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        let mut header = format!("class {0}AsyncRemote: public {0}Async", iface.name);
        for base in &iface.inherits {
            header.push_str(&format!(", public {}AsyncRemote", base_name(base)));
        }
        w.writeln(&header);
        w.writeln("{");
        w.writeln("public:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln(&format!("{}AsyncRemote(const qi::AnyObject& ao)", iface.name));
            let mut inits: Vec<String> = iface
                .inherits
                .iter()
                .map(|base| format!("{}AsyncRemote(ao)", base_name(base)))
                .collect();
            inits.push("_obj(ao)".to_string());
            Self::initializers(&mut body, &inits);
            body.writeln("{}");
            for (_, f) in &members.methods {
                self.async_method(&mut body, f)?;
            }
        }
        w.newline();
        w.writeln("private:");
        w.writeln("  qi::AnyObject _obj;");
        w.writeln("};");
        w.newline();
        Ok(())
    }

    fn async_method(&self, w: &mut CodeWriter, f: &FnDecl) -> Result<(), GenError> {
        let ret = self.types.return_type(f.ret)?;
        let params = self.types.params(&f.params, ParamsFormat::Normal)?;
        let names = self.types.params(&f.params, ParamsFormat::NameOnly)?;
        w.writeln(&format!("::qi::Future< {} > {}({}) {{", ret, f.name, params));
        w.writeln(&format!("  return _obj.async< {} >({});", ret, call_args(&f.name, &names)));
        w.writeln("}");
        Ok(())
    }

    fn sync_remote(&self, w: &mut CodeWriter, iface: &InterfaceDecl) -> Result<(), GenError> {
        let members = Members::of(&self.file.ast, iface);
        let mut fields = Vec::new();
        for (_, signal) in &members.signals {
            fields.push(("Signal", "makeProxySignal", self.types.value_types(&signal.params)?, &signal.name));
        }
        for (_, prop) in &members.properties {
            fields.push(("Property", "makeProxyProperty", self.types.value_types(&prop.params)?, &prop.name));
        }

        let mut header = format!("class {0}Remote: virtual public {0}", iface.name);
        if iface.inherits.is_empty() {
            header.push_str(", public qi::Proxy");
        }
        for base in &iface.inherits {
            header.push_str(&format!(", public {}Remote", base_name(base)));
        }
        w.writeln(&header);
        w.writeln("{");
        w.writeln("public:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln(&format!("{}Remote(const qi::AnyObject& ao)", iface.name));
            let mut inits: Vec<String> = iface
                .inherits
                .iter()
                .map(|base| format!("{}Remote(ao)", base_name(base)))
                .collect();
            let mut inherited = Vec::new();
            self.inherited_fields(&self.file.package, iface, &mut inherited);
            for (base, fields) in &inherited {
                inits.push(format!("{}({})", base, fields.join(", ")));
            }
            let bound: Vec<String> = fields.iter().map(|(_, _, _, name)| format!("_{}", name)).collect();
            inits.push(format!("{}({})", iface.name, bound.join(", ")));
            if iface.inherits.is_empty() {
                inits.push("qi::Proxy(ao)".to_string());
            }
            inits.push("_obj(ao)".to_string());
            inits.push("_async(ao)".to_string());
            Self::initializers(&mut body, &inits);
            body.writeln("{");
            for (_, bind, _, name) in &fields {
                body.writeln(&format!("  qi::{}(_{1}, ao, \"{1}\");", bind, name));
            }
            body.writeln("}");

            for (_, f) in &members.methods {
                let ret = self.types.return_type(f.ret)?;
                let params = self.types.params(&f.params, ParamsFormat::Normal)?;
                let names = self.types.params(&f.params, ParamsFormat::NameOnly)?;
                body.writeln(&format!("{} {}({}) {{", ret, f.name, params));
                if self.types.is_void(f.ret) {
                    body.writeln(&format!("  _obj.call<void>({});", call_args(&f.name, &names)));
                } else {
                    body.writeln(&format!("  return _obj.call< {} >({});", ret, call_args(&f.name, &names)));
                }
                body.writeln("}");
            }
            for (kind, _, types, name) in &fields {
                body.writeln(&format!("::qi::{}< {} >& {}() {{", kind, types, name));
                body.writeln(&format!("  return _{};", name));
                body.writeln("}");
            }
            body.writeln(&format!("{}Async& async() {{", iface.name));
            body.writeln("  return _async;");
            body.writeln("}");
        }
        w.newline();
        if !fields.is_empty() {
            w.writeln("protected:");
            let mut body = ScopedIndent::new(&mut *w);
            for (kind, _, types, name) in &fields {
                body.writeln(&format!("::qi::{}< {} > _{};", kind, types, name));
            }
        }
        w.writeln("private:");
        {
            let mut body = ScopedIndent::new(&mut *w);
            body.writeln("qi::AnyObject _obj;");
            body.writeln(&format!("{}AsyncRemote _async;", iface.name));
        }
        w.writeln("};");
        w.writeln(&format!("QI_REGISTER_PROXY_INTERFACE({0}Remote, {0});", iface.name));
        w.newline();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::cpp::test_support::generate_one;

    #[test]
    fn test_remote_proxies() {
        let out = generate_one(
            BACKEND,
            "package test\ninterface Robot\n  fn move(x str) float64\n  fn stop()\n  emit moved(int32)\n  prop speed(float64)\nend\n",
        )
        .unwrap();
        insta::assert_snapshot!(out, @r#"
        /*
        ** qiLang generated file. DO NOT EDIT
        */
        #include <qi/type/objecttypebuilder.hpp>
        #include <test/robot.hpp>
        #include <qi/anyobject.hpp>
        #include <string>
        #include <qi/signal.hpp>
        #include <qi/types.hpp>
        #include <qi/property.hpp>

        namespace test {

        class RobotAsyncRemote: public RobotAsync
        {
        public:
          RobotAsyncRemote(const qi::AnyObject& ao)
            : _obj(ao)
          {}
          ::qi::Future< double > move(const std::string& x) {
            return _obj.async< double >("move", x);
          }
          ::qi::Future< void > stop() {
            return _obj.async< void >("stop");
          }

        private:
          qi::AnyObject _obj;
        };

        class RobotRemote: virtual public Robot, public qi::Proxy
        {
        public:
          RobotRemote(const qi::AnyObject& ao)
            : Robot(_moved, _speed)
            , qi::Proxy(ao)
            , _obj(ao)
            , _async(ao)
          {
            qi::makeProxySignal(_moved, ao, "moved");
            qi::makeProxyProperty(_speed, ao, "speed");
          }
          double move(const std::string& x) {
            return _obj.call< double >("move", x);
          }
          void stop() {
            _obj.call<void>("stop");
          }
          ::qi::Signal< qi::int32_t >& moved() {
            return _moved;
          }
          ::qi::Property< double >& speed() {
            return _speed;
          }
          RobotAsync& async() {
            return _async;
          }

        protected:
          ::qi::Signal< qi::int32_t > _moved;
          ::qi::Property< double > _speed;
        private:
          qi::AnyObject _obj;
          RobotAsyncRemote _async;
        };
        QI_REGISTER_PROXY_INTERFACE(RobotRemote, Robot);

        } // namespace test

        bool qi::detail::ForceProxyInclusion< ::test::Robot >::dummyCall() {
          return true;
        }
        "#);
    }

    #[test]
    fn test_inherited_remotes_are_chained() {
        let out = generate_one(
            BACKEND,
            "package test\ninterface Base\n  fn ping()\nend\ninterface Robot(Base)\n  fn go() int32\nend\n",
        )
        .unwrap();
        assert!(out.contains("class RobotAsyncRemote: public RobotAsync, public BaseAsyncRemote\n"));
        assert!(out.contains("  RobotAsyncRemote(const qi::AnyObject& ao)\n    : BaseAsyncRemote(ao)\n    , _obj(ao)\n"));
        assert!(out.contains("class RobotRemote: virtual public Robot, public BaseRemote\n"));
        assert!(out.contains("    : BaseRemote(ao)\n    , Robot()\n    , _obj(ao)\n    , _async(ao)\n"));
        assert!(out.contains("class BaseRemote: virtual public Base, public qi::Proxy\n"));
        assert!(!out.contains("protected:"));
        assert!(out.contains("    return _obj.call< qi::int32_t >(\"go\");\n"));
    }

    #[test]
    fn test_inherited_interfaces_with_fields_are_bound() {
        let out = generate_one(
            BACKEND,
            "package test\ninterface Root\n  prop level(int32)\nend\ninterface Base(Root)\n  emit ready()\nend\ninterface Robot(Base)\n  emit moved(int32)\nend\n",
        )
        .unwrap();
        assert!(out.contains(
            "  RobotRemote(const qi::AnyObject& ao)\n    : BaseRemote(ao)\n    , ::test::Root(_level)\n    , ::test::Base(_ready)\n    , Robot(_moved)\n    , _obj(ao)\n"
        ));
        assert!(out.contains("    : RootRemote(ao)\n    , ::test::Root(_level)\n    , Base(_ready)\n"));
        assert!(out.contains("protected:\n  ::qi::Property< qi::int32_t > _level;\nprivate:\n"));
    }

    #[test]
    fn test_data_declarations_are_skipped() {
        let out = generate_one(BACKEND, "package test\nstruct P\nend\nconst C = 1\nenum E\n  const A = 1\nend\ntypedef int32 T\n").unwrap();
        assert!(!out.contains("struct"));
        assert!(!out.contains("class"));
    }

    #[test]
    fn test_object_statements_are_rejected() {
        let err = generate_one(BACKEND, "package test\ninterface Robot\nend\nobject Robot \"r\"\nend\n").unwrap_err();
        assert!(matches!(err, GenError::Unsupported { backend: Backend::CppRemote, .. }));
    }
}

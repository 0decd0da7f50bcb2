//! JSON documentation map
//!
//! One entry per interface, keyed by name:
//!
//! ```json
//! {"Robot": {"type": "interface", "inherits": [], "members": {
//!     "move": {"type": "method", "brief": "Move", "return": "int32",
//!              "parameters": {"x": {"type": "int32", "description": "the x"}}}}}}
//! ```
//!
//! Other declarations carry no documentation and are left out.

use qilang_syntax::ast::{Ast, Decl, InterfaceDecl, Location, NodeId, Param};
use serde_json::{Map, Value, json};

use super::param_name;
use super::qilang::type_to_string;
use crate::frontend::diagnostics::DiagnosticManager;
use crate::frontend::docparser::{Doc, parse_doc};

pub fn generate_doc(ast: &Ast, diagnostics: &mut DiagnosticManager) -> String {
    let mut root = Map::new();
    for &id in ast.roots() {
        if let Some(Decl::Interface(iface)) = ast.decl(id) {
            root.insert(iface.name.clone(), interface(ast, id, iface, diagnostics));
        }
    }
    format!("{:#}\n", Value::Object(root))
}

/// Parse the documentation attached to a declaration, reporting problems as warnings.
pub(crate) fn documentation(
    text: Option<&str>,
    location: &Location,
    diagnostics: &mut DiagnosticManager,
) -> Option<Doc> {
    let text = text?;
    match parse_doc(text) {
        Ok(doc) => {
            for warning in &doc.warnings {
                diagnostics.warning(location.clone(), warning.clone());
            }
            Some(doc)
        }
        Err(err) => {
            diagnostics.warning(location.clone(), format!("invalid documentation: {}", err));
            None
        }
    }
}

fn interface(ast: &Ast, id: NodeId, iface: &InterfaceDecl, diagnostics: &mut DiagnosticManager) -> Value {
    let mut entry = Map::new();
    entry.insert("type".into(), json!("interface"));
    if let Some(doc) = documentation(iface.doc.as_deref(), ast.location(id), diagnostics) {
        describe(&mut entry, &doc);
    }
    entry.insert("inherits".into(), json!(iface.inherits));

    let mut members = Map::new();
    for &member in &iface.members {
        let Some(decl) = ast.decl(member) else {
            continue;
        };
        let doc = documentation(decl.doc(), ast.location(member), diagnostics);
        let value = match decl {
            Decl::Fn(f) => {
                let mut method = Map::new();
                method.insert("type".into(), json!("method"));
                if let Some(doc) = &doc {
                    describe(&mut method, doc);
                    if let Some(ret) = &doc.ret {
                        method.insert("returnDescription".into(), json!(ret));
                    }
                }
                let ret = f.ret.map_or_else(|| "nothing".to_string(), |r| type_to_string(ast, r));
                method.insert("return".into(), json!(ret));
                method.insert("parameters".into(), parameters(ast, &f.params, doc.as_ref()));
                Value::Object(method)
            }
            Decl::Emit(m) => json!({"type": "signal", "parameters": parameters(ast, &m.params, doc.as_ref())}),
            Decl::Prop(m) => json!({"type": "property", "parameters": parameters(ast, &m.params, doc.as_ref())}),
            _ => continue,
        };
        members.insert(decl.name().to_string(), value);
    }
    entry.insert("members".into(), Value::Object(members));
    Value::Object(entry)
}

fn describe(entry: &mut Map<String, Value>, doc: &Doc) {
    if let Some(brief) = &doc.brief {
        entry.insert("brief".into(), json!(brief));
    }
    if let Some(description) = &doc.description {
        entry.insert("description".into(), json!(description));
    }
}

fn parameters(ast: &Ast, params: &[Param], doc: Option<&Doc>) -> Value {
    let mut out = Map::new();
    for (index, param) in params.iter().enumerate() {
        let name = param_name(param, index);
        let mut entry = Map::new();
        entry.insert("type".into(), json!(type_to_string(ast, param.ty)));
        match doc.and_then(|d| d.param(&name)) {
            Some(description) => {
                entry.insert("description".into(), json!(description));
            }
            None if doc.is_some() => tracing::warn!(parameter = %name, "undocumented parameter"),
            None => {}
        }
        out.insert(name, Value::Object(entry));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_json(source: &str) -> (Value, DiagnosticManager) {
        let ast = qilang_syntax::parse_source(source, "test/test.qi").unwrap();
        let mut diagnostics = DiagnosticManager::new();
        let text = generate_doc(&ast, &mut diagnostics);
        (serde_json::from_str(&text).unwrap(), diagnostics)
    }

    #[test]
    fn test_interface_members() {
        let source = "package test\n## A robot. Moves around.\ninterface Robot(Base)\n  ## Move.\n  ## \\param x the x\n  ## \\return the distance\n  fn move(x int32, []str) float64\n  emit moved(int32)\n  prop speed(float64)\nend\nstruct Ignored\nend\n";
        let (value, diagnostics) = doc_json(source);
        assert!(diagnostics.is_empty());
        assert!(value.get("Ignored").is_none());

        let robot = &value["Robot"];
        assert_eq!(robot["type"], "interface");
        assert_eq!(robot["brief"], "A robot");
        assert_eq!(robot["inherits"], json!(["Base"]));

        let method = &robot["members"]["move"];
        assert_eq!(method["type"], "method");
        assert_eq!(method["brief"], "Move");
        assert_eq!(method["returnDescription"], "the distance");
        assert_eq!(method["return"], "float64");
        assert_eq!(method["parameters"]["x"], json!({"type": "int32", "description": "the x"}));
        assert_eq!(method["parameters"]["p1"], json!({"type": "[]str"}));

        assert_eq!(robot["members"]["moved"]["type"], "signal");
        assert_eq!(robot["members"]["speed"]["parameters"]["p0"]["type"], "float64");
    }

    #[test]
    fn test_method_without_return_is_nothing() {
        let (value, _) = doc_json("package test\ninterface I\n  fn stop()\nend\n");
        assert_eq!(value["I"]["members"]["stop"]["return"], "nothing");
    }

    #[test]
    fn test_bad_documentation_is_a_warning() {
        let (value, diagnostics) = doc_json("package test\ninterface I\n  ## \\param\n  fn stop()\nend\n");
        assert_eq!(value["I"]["members"]["stop"]["type"], "method");
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.diagnostics().len(), 1);
        assert!(diagnostics.diagnostics()[0].message.starts_with("invalid documentation"));
    }
}

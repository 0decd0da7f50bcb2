//! Rendering of qilang types, values and parameter lists as C++.
//!
//! Parameters are passed by const reference when they are not scalars. The `const_ref` attribute switches that on;
//! nested element types always block it, so `[]str` becomes `const std::vector< std::string >&`.

use qilang_core::lang::types::{BuiltinCategory, BuiltinTypeId, category};
use qilang_syntax::ast::{Expr, Literal, Node, NodeId, Param, TypeExpr};

use super::{qualified, unsupported};
use crate::backend::writer::{FormatAttr, ScopedFormatAttrActivate, ScopedFormatAttrBlock};
use crate::backend::{Backend, GenError, param_name, quote};
use crate::frontend::package::{ParsedFile, SymbolKind};
use crate::frontend::package_manager::PackageManager;

/// How a parameter list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsFormat {
    /// `const std::string& name, int p1`
    Normal,
    /// `const std::string&, int`
    TypeOnly,
    /// `name, p1`
    NameOnly,
}

/// C++ spelling of a builtin type.
pub fn builtin_to_cpp(id: BuiltinTypeId) -> &'static str {
    use BuiltinTypeId::*;
    match id {
        Nothing => "void",
        Bool => "bool",
        Char => "char",
        Int => "int",
        UInt => "unsigned int",
        Int8 => "qi::int8_t",
        UInt8 => "qi::uint8_t",
        Int16 => "qi::int16_t",
        UInt16 => "qi::uint16_t",
        Int32 => "qi::int32_t",
        UInt32 => "qi::uint32_t",
        Int64 => "qi::int64_t",
        UInt64 => "qi::uint64_t",
        Float | Float32 => "float",
        Float64 => "double",
        String => "std::string",
        Value => "qi::AnyValue",
        Object => "qi::AnyObject",
        Raw => "qi::Buffer",
        NanoSeconds => "qi::NanoSeconds",
        MicroSeconds => "qi::MicroSeconds",
        MilliSeconds => "qi::MilliSeconds",
        Seconds => "qi::Seconds",
        Minutes => "qi::Minutes",
        Hours => "qi::Hours",
        QiTimePoint => "qi::ClockTimePoint",
        SteadyTimePoint => "qi::SteadyClockTimePoint",
        SystemTimePoint => "qi::SystemClockTimePoint",
    }
}

fn passed_by_ref(id: BuiltinTypeId) -> bool {
    matches!(
        category(id),
        BuiltinCategory::String | BuiltinCategory::Value | BuiltinCategory::Object | BuiltinCategory::Buffer
    )
}

/// Type renderer bound to one file and its resolution results.
pub struct CppTypes<'a> {
    pm: &'a PackageManager,
    file: &'a ParsedFile,
    backend: Backend,
    pub const_ref: FormatAttr,
}

impl<'a> CppTypes<'a> {
    pub fn new(pm: &'a PackageManager, file: &'a ParsedFile, backend: Backend) -> Self {
        Self {
            pm,
            file,
            backend,
            const_ref: FormatAttr::new(),
        }
    }

    fn unsupported(&self, construct: impl Into<String>, id: NodeId) -> GenError {
        unsupported(self.backend, construct, self.file.ast.location(id))
    }

    pub fn type_name(&self, id: NodeId) -> Result<String, GenError> {
        let ast = &self.file.ast;
        let (name, by_ref) = match ast.type_expr(id) {
            Some(TypeExpr::Builtin(builtin)) => (builtin_to_cpp(*builtin).to_string(), passed_by_ref(*builtin)),
            Some(TypeExpr::Custom(name)) => (self.custom(id, name)?, true),
            Some(TypeExpr::List(element)) => (format!("std::vector< {} >", self.element(*element)?), true),
            Some(TypeExpr::Map { key, value }) => (
                format!("std::map< {}, {} >", self.element(*key)?, self.element(*value)?),
                true,
            ),
            Some(TypeExpr::Tuple(elements)) => match elements.as_slice() {
                [first, second] => (
                    format!("std::pair< {}, {} >", self.element(*first)?, self.element(*second)?),
                    true,
                ),
                _ => return Err(self.unsupported(format!("tuple of {} elements", elements.len()), id)),
            },
            None => return Err(self.unsupported("value in type position", id)),
        };
        if by_ref && self.const_ref.is_active() {
            Ok(format!("const {}&", name))
        } else {
            Ok(name)
        }
    }

    fn element(&self, id: NodeId) -> Result<String, GenError> {
        let _block = ScopedFormatAttrBlock::new(&self.const_ref);
        self.type_name(id)
    }

    fn custom(&self, id: NodeId, name: &str) -> Result<String, GenError> {
        let resolved = self
            .pm
            .resolution(&self.file.path, id)
            .ok_or_else(|| GenError::Unresolved {
                name: name.to_string(),
                location: self.file.ast.location(id).clone(),
            })?;
        let mut out = qualified(&resolved.package, &resolved.name);
        if resolved.kind == SymbolKind::Interface {
            out.push_str("Ptr");
        }
        Ok(out)
    }

    /// Whether a method with this return type returns nothing.
    pub fn is_void(&self, ret: Option<NodeId>) -> bool {
        match ret {
            None => true,
            Some(id) => matches!(self.file.ast.type_expr(id), Some(TypeExpr::Builtin(BuiltinTypeId::Nothing))),
        }
    }

    /// Return type by value, `void` for a missing or `nothing` return.
    pub fn return_type(&self, ret: Option<NodeId>) -> Result<String, GenError> {
        match ret {
            Some(id) if !self.is_void(ret) => self.element(id),
            _ => Ok("void".to_string()),
        }
    }

    pub fn params(&self, params: &[Param], format: ParamsFormat) -> Result<String, GenError> {
        let _const = ScopedFormatAttrActivate::new(&self.const_ref);
        let rendered = params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                Ok(match format {
                    ParamsFormat::Normal => format!("{} {}", self.type_name(param.ty)?, param_name(param, index)),
                    ParamsFormat::TypeOnly => self.type_name(param.ty)?,
                    ParamsFormat::NameOnly => param_name(param, index),
                })
            })
            .collect::<Result<Vec<_>, GenError>>()?;
        Ok(rendered.join(", "))
    }

    /// Parameter types by value, as template arguments of signals and properties.
    pub fn value_types(&self, params: &[Param]) -> Result<String, GenError> {
        let _block = ScopedFormatAttrBlock::new(&self.const_ref);
        let rendered = params
            .iter()
            .map(|param| self.type_name(param.ty))
            .collect::<Result<Vec<_>, GenError>>()?;
        Ok(rendered.join(", "))
    }

    /// Type inferred for a constant or variable declared without one.
    pub fn inferred_type(&self, value: NodeId) -> Result<String, GenError> {
        let ast = &self.file.ast;
        let literal = match ast.node(value) {
            Node::Expr(Expr::Literal(inner)) => ast.literal(*inner),
            _ => ast.literal(value),
        };
        match literal {
            Some(Literal::Bool(_)) => Ok("bool".to_string()),
            Some(Literal::Int(_)) => Ok("int".to_string()),
            Some(Literal::Float(_)) => Ok("double".to_string()),
            Some(Literal::String(_)) => Ok("std::string".to_string()),
            _ => Err(self.unsupported("untyped container value", value)),
        }
    }

    /// C++ initializer for a constant value.
    pub fn value(&self, id: NodeId) -> Result<String, GenError> {
        let ast = &self.file.ast;
        match ast.node(id) {
            Node::Literal(literal) => match literal {
                Literal::Bool(v) => Ok(v.to_string()),
                Literal::Int(v) => Ok(v.to_string()),
                Literal::Float(v) => Ok(format!("{:?}", v)),
                Literal::String(s) => Ok(quote(s)),
                Literal::List(items) => Ok(format!("{{{}}}", self.values(items)?)),
                Literal::Tuple(items) if items.len() == 2 => Ok(format!("{{{}}}", self.values(items)?)),
                Literal::Tuple(items) => Err(self.unsupported(format!("tuple of {} elements", items.len()), id)),
                Literal::Dict(pairs) => {
                    let entries = pairs
                        .iter()
                        .map(|(k, v)| Ok(format!("{{{}, {}}}", self.value(*k)?, self.value(*v)?)))
                        .collect::<Result<Vec<_>, GenError>>()?;
                    Ok(format!("{{{}}}", entries.join(", ")))
                }
            },
            Node::Expr(expr) => match expr {
                Expr::Literal(inner) => self.value(*inner),
                Expr::Call { name, args } => Ok(format!("{}({})", name, self.values(args)?)),
                Expr::BinaryOp { .. } | Expr::UnaryOp { .. } => Err(self.unsupported("operator in constant value", id)),
                Expr::Var(name) => Err(self.unsupported(format!("variable '{}' in constant value", name), id)),
            },
            Node::TypeExpr(_) | Node::Decl(_) | Node::Stmt(_) => Err(self.unsupported("non-value in value position", id)),
        }
    }

    fn values(&self, ids: &[NodeId]) -> Result<String, GenError> {
        let rendered = ids
            .iter()
            .map(|id| self.value(*id))
            .collect::<Result<Vec<_>, GenError>>()?;
        Ok(rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::cpp::test_support::analysed;
    use qilang_core::lang::types::BUILTIN_TYPES;
    use qilang_syntax::ast::{ConstDecl, Decl};
    use std::collections::HashSet;

    fn consts(file: &ParsedFile) -> Vec<&ConstDecl> {
        file.ast
            .roots()
            .iter()
            .filter_map(|&id| match file.ast.decl(id) {
                Some(Decl::Const(c)) => Some(c),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Types
    // ========================================================================

    #[test]
    fn test_every_builtin_has_one_spelling() {
        let mut seen = HashSet::new();
        for info in BUILTIN_TYPES {
            let cpp = builtin_to_cpp(info.id);
            assert!(!cpp.is_empty());
            seen.insert(cpp);
        }
        // float and float32 share `float`
        assert_eq!(seen.len(), BUILTIN_TYPES.len() - 1);
    }

    #[test]
    fn test_const_ref_applies_to_outer_type_only() {
        let (pm, file) = analysed(&[(
            "test/t.qi",
            "package test\ninterface Foo\nend\nconst A []str = []\nconst B [str]Foo = {}\nconst C (int32, str) = (1, \"x\")\nconst D int32 = 1\n",
        )]);
        let types = CppTypes::new(&pm, &file, Backend::CppInterface);
        let tys: Vec<NodeId> = consts(&file).iter().filter_map(|c| c.ty).collect();

        assert_eq!(types.type_name(tys[0]).unwrap(), "std::vector< std::string >");
        let _c = ScopedFormatAttrActivate::new(&types.const_ref);
        assert_eq!(types.type_name(tys[0]).unwrap(), "const std::vector< std::string >&");
        assert_eq!(types.type_name(tys[1]).unwrap(), "const std::map< std::string, ::test::FooPtr >&");
        assert_eq!(types.type_name(tys[2]).unwrap(), "const std::pair< qi::int32_t, std::string >&");
        assert_eq!(types.type_name(tys[3]).unwrap(), "qi::int32_t");
    }

    #[test]
    fn test_tuple_of_three_is_unsupported() {
        let (pm, file) = analysed(&[("test/t.qi", "package test\ntypedef (int32, str, bool) T\n")]);
        let types = CppTypes::new(&pm, &file, Backend::CppInterface);
        let Some(Decl::TypeDef(def)) = file.ast.decl(file.ast.roots()[1]) else {
            panic!("expected typedef");
        };
        let err = types.type_name(def.ty).unwrap_err();
        assert!(matches!(err, GenError::Unsupported { ref construct, .. } if construct == "tuple of 3 elements"));
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    #[test]
    fn test_params_formats() {
        let (pm, file) = analysed(&[("test/t.qi", "package test\ninterface I\n  fn f(name str, int32, []bool)\nend\n")]);
        let types = CppTypes::new(&pm, &file, Backend::CppLocal);
        let Some(Decl::Interface(iface)) = file.ast.decl(file.ast.roots()[1]) else {
            panic!("expected interface");
        };
        let Some(Decl::Fn(f)) = file.ast.decl(iface.members[0]) else {
            panic!("expected fn");
        };
        assert_eq!(
            types.params(&f.params, ParamsFormat::Normal).unwrap(),
            "const std::string& name, qi::int32_t p1, const std::vector< bool >& p2"
        );
        assert_eq!(
            types.params(&f.params, ParamsFormat::TypeOnly).unwrap(),
            "const std::string&, qi::int32_t, const std::vector< bool >&"
        );
        assert_eq!(types.params(&f.params, ParamsFormat::NameOnly).unwrap(), "name, p1, p2");
        assert_eq!(types.value_types(&f.params).unwrap(), "std::string, qi::int32_t, std::vector< bool >");
        assert!(!types.const_ref.is_active());
        assert_eq!(types.return_type(f.ret).unwrap(), "void");
    }

    // ========================================================================
    // Values
    // ========================================================================

    #[test]
    fn test_values() {
        let (pm, file) = analysed(&[(
            "test/t.qi",
            "package test\nconst A = [1, 2]\nconst B = {\"k\": 1.5}\nconst C = \"a\\\"b\"\nconst D = 1 + 2\nconst E = (1, 2, 3)\n",
        )]);
        let types = CppTypes::new(&pm, &file, Backend::CppInterface);
        let values: Vec<NodeId> = consts(&file).iter().map(|c| c.value).collect();
        assert_eq!(types.value(values[0]).unwrap(), "{1, 2}");
        assert_eq!(types.value(values[1]).unwrap(), "{{\"k\", 1.5}}");
        assert_eq!(types.value(values[2]).unwrap(), "\"a\\\"b\"");
        assert_eq!(types.inferred_type(values[2]).unwrap(), "std::string");
        assert!(types.value(values[3]).is_err());
        assert!(types.value(values[4]).is_err());
        assert!(types.inferred_type(values[0]).is_err());
    }
}

#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on correctness of specific syntactic forms and on the parser’s
/// error recovery behavior (one error per broken line, no cascades).
mod tests {
    use super::*;
    use crate::lexer;
    use qilang_core::lang::types::BuiltinTypeId;

    fn parse_str(source: &str) -> Result<Ast, Vec<CompileError>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens, source, "test/test.qi")
    }

    fn root_decl(ast: &Ast, index: usize) -> &Decl {
        match ast.decl(ast.roots()[index]) {
            Some(decl) => decl,
            None => panic!("root {} is not a declaration", index),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_parse_package_and_imports() {
        let source = "package a.b\nimport c.d\nfrom e import X, Y\nfrom f import *\n";
        let ast = parse_str(source).unwrap();
        assert_eq!(ast.roots().len(), 4);
        assert_eq!(ast.stmt(ast.roots()[0]), Some(&Stmt::Package("a.b".to_string())));

        let imports: Vec<&ImportStmt> = ast.roots()[1..]
            .iter()
            .map(|id| match ast.stmt(*id) {
                Some(Stmt::Import(import)) => import,
                other => panic!("Expected import, got {:?}", other),
            })
            .collect();
        assert_eq!(imports[0].package, "c.d");
        assert_eq!(imports[0].kind, ImportKind::Package);
        assert_eq!(imports[1].kind, ImportKind::List(vec!["X".to_string(), "Y".to_string()]));
        assert_eq!(imports[2].package, "f");
        assert_eq!(imports[2].kind, ImportKind::All);
    }

    #[test]
    fn test_top_level_comment_is_a_statement() {
        let ast = parse_str("# hello world\npackage a # trailing\n").unwrap();
        assert_eq!(ast.roots().len(), 2);
        assert_eq!(ast.stmt(ast.roots()[0]), Some(&Stmt::Comment("hello world".to_string())));
    }

    #[test]
    fn test_parse_object_definition() {
        let source = r#"
object Robot "nao"
  prop name "nao" + suffix
  at sig slot
  object Arm "left"
  end
end
"#;
        let ast = parse_str(source).unwrap();
        let Some(Stmt::ObjectDef(def)) = ast.stmt(ast.roots()[0]) else {
            panic!("Expected object definition");
        };
        assert_eq!(ast.literal(def.name), Some(&Literal::String("nao".to_string())));
        assert_eq!(def.body.len(), 3);
        assert_eq!(ast.node_type(def.body[0]), NodeType::PropertyDef);
        assert_eq!(ast.node_type(def.body[1]), NodeType::At);
        assert_eq!(ast.node_type(def.body[2]), NodeType::ObjectDef);

        let Some(Stmt::PropertyDef(prop)) = ast.stmt(def.body[0]) else {
            panic!("Expected property definition");
        };
        assert_eq!(ast.node_type(prop.value), NodeType::BinaryOp);
    }

    #[test]
    fn test_parse_var_def() {
        let ast = parse_str("var a int32 = 4\nvar b\nvar c = \"x\"\n").unwrap();
        let vars: Vec<&VarDef> = ast
            .roots()
            .iter()
            .map(|id| match ast.stmt(*id) {
                Some(Stmt::VarDef(v)) => v,
                other => panic!("Expected var, got {:?}", other),
            })
            .collect();
        assert!(vars[0].ty.is_some() && vars[0].value.is_some());
        assert!(vars[1].ty.is_none() && vars[1].value.is_none());
        assert!(vars[2].ty.is_none());
        assert_eq!(
            vars[2].value.and_then(|v| ast.literal(v)),
            Some(&Literal::String("x".to_string()))
        );
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_parse_interface() {
        let source = r#"
## A robot.
interface Robot(Base, other.Thing)
  ## Say something.
  fn say(text str, int32) -> bool
  fn stop()
  emit moved(float64)
  out alias(str)
  prop battery(int32)
end
"#;
        let ast = parse_str(source).unwrap();
        let Decl::Interface(iface) = root_decl(&ast, 0) else {
            panic!("Expected interface");
        };
        assert_eq!(iface.name, "Robot");
        assert_eq!(iface.inherits, vec!["Base".to_string(), "other.Thing".to_string()]);
        assert_eq!(iface.doc.as_deref(), Some("A robot."));
        assert_eq!(iface.members.len(), 5);

        let Some(Decl::Fn(say)) = ast.decl(iface.members[0]) else {
            panic!("Expected fn");
        };
        assert_eq!(say.doc.as_deref(), Some("Say something."));
        assert_eq!(say.params.len(), 2);
        assert_eq!(say.params[0].name.as_deref(), Some("text"));
        assert_eq!(say.params[1].name, None);
        assert_eq!(
            say.ret.and_then(|r| ast.type_expr(r)),
            Some(&TypeExpr::Builtin(BuiltinTypeId::Bool))
        );

        let Some(Decl::Fn(stop)) = ast.decl(iface.members[1]) else {
            panic!("Expected fn");
        };
        assert!(stop.ret.is_none());
        assert_eq!(ast.node_type(iface.members[2]), NodeType::EmitDecl);
        assert_eq!(ast.node_type(iface.members[3]), NodeType::EmitDecl);
        assert_eq!(ast.node_type(iface.members[4]), NodeType::PropDecl);
    }

    #[test]
    fn test_multiline_doc_is_joined() {
        let ast = parse_str("## first\n## second\nstruct S\nend\n").unwrap();
        assert_eq!(root_decl(&ast, 0).doc(), Some("first\nsecond"));
    }

    #[test]
    fn test_doc_attaches_to_next_declaration_only() {
        let ast = parse_str("## doc\nstruct A\nend\nstruct B\nend\n").unwrap();
        assert_eq!(root_decl(&ast, 0).doc(), Some("doc"));
        assert_eq!(root_decl(&ast, 1).doc(), None);
    }

    #[test]
    fn test_parse_struct_with_defaults() {
        let source = "struct Point(Base)\n  x float64 = 1.5\n  tags []str\n  meta [str]any\nend\n";
        let ast = parse_str(source).unwrap();
        let Decl::Struct(s) = root_decl(&ast, 0) else {
            panic!("Expected struct");
        };
        assert_eq!(s.fields.len(), 3);
        let Some(Decl::StructField(x)) = ast.decl(s.fields[0]) else {
            panic!("Expected field");
        };
        assert_eq!(x.default.and_then(|d| ast.literal(d)), Some(&Literal::Float(1.5)));
        let Some(Decl::StructField(meta)) = ast.decl(s.fields[2]) else {
            panic!("Expected field");
        };
        assert_eq!(ast.node_type(meta.ty), NodeType::MapType);
    }

    #[test]
    fn test_parse_enum_const_and_typedef() {
        let source = "enum Color\n  const Red = 1\n  typedef int32 Code\nend\nconst X uint8 = 0x1F\ntypedef (str, int32) Pair\n";
        let ast = parse_str(source).unwrap();
        let Decl::Enum(e) = root_decl(&ast, 0) else {
            panic!("Expected enum");
        };
        assert_eq!(e.fields.len(), 2);
        assert!(matches!(
            ast.decl(e.fields[0]),
            Some(Decl::EnumField(EnumFieldDecl { kind: EnumFieldKind::Const(_), .. }))
        ));
        assert!(matches!(
            ast.decl(e.fields[1]),
            Some(Decl::EnumField(EnumFieldDecl { kind: EnumFieldKind::Type(_), .. }))
        ));

        let Decl::Const(c) = root_decl(&ast, 1) else {
            panic!("Expected const");
        };
        assert_eq!(ast.literal(c.value), Some(&Literal::Int(31)));
        assert!(c.ty.is_some());

        let Decl::TypeDef(t) = root_decl(&ast, 2) else {
            panic!("Expected typedef");
        };
        assert_eq!(t.name, "Pair");
        assert_eq!(ast.node_type(t.ty), NodeType::TupleType);
    }

    #[test]
    fn test_top_level_emit_is_rejected() {
        let err = parse_str("emit sig(int32)\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("only valid inside an interface"), "got: {}", err[0].message);
    }

    // ========================================================================
    // Expressions and literals
    // ========================================================================

    fn const_value(source: &str) -> (Ast, NodeId) {
        let ast = parse_str(source).unwrap();
        let value = match root_decl(&ast, 0) {
            Decl::Const(c) => c.value,
            other => panic!("Expected const, got {:?}", other),
        };
        (ast, value)
    }

    #[test]
    fn test_binary_precedence() {
        let (ast, value) = const_value("const X = 1 + 2 * 3\n");
        let Some(Expr::BinaryOp { op, right, .. }) = ast.expr(value) else {
            panic!("Expected binary op");
        };
        assert_eq!(*op, OperatorId::Plus);
        assert!(matches!(ast.expr(*right), Some(Expr::BinaryOp { op: OperatorId::Multiply, .. })));
    }

    #[test]
    fn test_binary_is_left_associative() {
        let (ast, value) = const_value("const X = 1 - 2 - 3\n");
        let Some(Expr::BinaryOp { left, .. }) = ast.expr(value) else {
            panic!("Expected binary op");
        };
        assert!(matches!(ast.expr(*left), Some(Expr::BinaryOp { op: OperatorId::Minus, .. })));
    }

    #[test]
    fn test_unary_and_index() {
        let (ast, value) = const_value("const X = -a[0]\n");
        let Some(Expr::UnaryOp { op, operand }) = ast.expr(value) else {
            panic!("Expected unary op");
        };
        assert_eq!(*op, OperatorId::Minus);
        assert!(matches!(ast.expr(*operand), Some(Expr::BinaryOp { op: OperatorId::FetchArray, .. })));
    }

    #[test]
    fn test_grouping_and_call() {
        let (ast, value) = const_value("const X = (a || b) && f(1, c)\n");
        let Some(Expr::BinaryOp { op, left, right }) = ast.expr(value) else {
            panic!("Expected binary op");
        };
        assert_eq!(*op, OperatorId::BoolAnd);
        assert!(matches!(ast.expr(*left), Some(Expr::BinaryOp { op: OperatorId::BoolOr, .. })));
        let Some(Expr::Call { name, args }) = ast.expr(*right) else {
            panic!("Expected call");
        };
        assert_eq!(name, "f");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_literal_containers() {
        let (ast, value) = const_value("const X = {\"a\": [1, 2], \"b\": (true,)}\n");
        let Some(Literal::Dict(entries)) = ast.literal(value) else {
            panic!("Expected dict literal");
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(ast.literal(entries[0].1), Some(Literal::List(items)) if items.len() == 2));
        assert!(matches!(ast.literal(entries[1].1), Some(Literal::Tuple(items)) if items.len() == 1));
    }

    #[test]
    fn test_tuple_expression_forms() {
        let (ast, value) = const_value("const X = ()\n");
        assert_eq!(ast.literal(value), Some(&Literal::Tuple(Vec::new())));

        let (ast, value) = const_value("const X = (1, \"two\", 3.0)\n");
        assert!(matches!(ast.literal(value), Some(Literal::Tuple(items)) if items.len() == 3));

        let (ast, value) = const_value("const X = (1)\n");
        assert_eq!(ast.literal(value), Some(&Literal::Int(1)));
    }

    #[test]
    fn test_tuple_elements_must_be_literals() {
        let err = parse_str("const X = (a, 1)\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("Tuple elements must be literals"));
    }

    // ========================================================================
    // Errors and recovery
    // ========================================================================

    #[test]
    fn test_recovers_once_per_broken_line() {
        let source = "interface Foo\n  fn (int32)\n  fn ok() int32\n  emit 12\nend\nstruct = 3\n";
        let err = parse_str(source).unwrap_err();
        assert_eq!(err.len(), 3, "got: {:?}", err);
    }

    #[test]
    fn test_missing_end_is_reported() {
        let err = parse_str("interface Foo\n  fn ping()\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("Expected 'end' to close interface 'Foo'"));
    }

    #[test]
    fn test_unknown_top_level_token() {
        let err = parse_str("12\n").unwrap_err();
        assert!(err[0].message.starts_with("Expected declaration"));
    }

    #[test]
    fn test_locations_are_recorded() {
        let ast = parse_str("package a\n\ninterface Foo\nend\n").unwrap();
        let loc = ast.location(ast.roots()[1]);
        assert_eq!(loc.filename.as_deref(), Some("test/test.qi"));
        assert_eq!(loc.begin, Position::new(3, 1));
        assert_eq!(loc.end.line, 4);
    }
}

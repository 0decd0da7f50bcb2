/// Statement parsing: `package`, imports, object definitions and variables.
impl<'a> Parser<'a> {
    // ========================================================================
    // Package and imports
    // ========================================================================

    /// `package a.b.c`
    fn package_stmt(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Package, "Expected 'package'")?.span;
        let name = self.dotted_name("Expected package name")?;
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(self.push(Node::Stmt(Stmt::Package(name)), span))
    }

    /// `import a.b`, `from a.b import X, Y` or `from a.b import *`
    fn import_stmt(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let stmt = if self.match_keyword(KeywordId::Import) {
            let package = self.dotted_name("Expected package name after 'import'")?;
            ImportStmt {
                package,
                kind: ImportKind::Package,
            }
        } else {
            self.expect_keyword(KeywordId::From, "Expected 'import' or 'from'")?;
            let package = self.dotted_name("Expected package name after 'from'")?;
            self.expect_keyword(KeywordId::Import, "Expected 'import' after package name")?;
            let kind = if self.check_op(OperatorId::Multiply) {
                self.advance();
                ImportKind::All
            } else {
                let mut names = vec![self.identifier("Expected imported name or '*'")?];
                while self.match_token(&TokenKind::Comma) {
                    names.push(self.identifier("Expected imported name")?);
                }
                ImportKind::List(names)
            };
            ImportStmt { package, kind }
        };
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(self.push(Node::Stmt(Stmt::Import(stmt)), span))
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// `object Type "name"` body `end`
    fn object_def(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Object, "Expected 'object'")?.span;
        let ty = self.type_expr()?;
        let name = match &self.peek().kind {
            TokenKind::String(_) => self.literal()?,
            _ => return Err(self.unexpected("Expected object name string")),
        };
        self.expect_line_end()?;

        let (body, end) = self.block("object definition", |p| p.object_item())?;
        let def = ObjectDef { ty, name, body };
        Ok(self.push(Node::Stmt(Stmt::ObjectDef(def)), start.merge(end)))
    }

    fn object_item(&mut self) -> Result<NodeId, CompileError> {
        match &self.peek().kind {
            TokenKind::Keyword(KeywordId::Prop) => self.property_def(),
            TokenKind::Keyword(KeywordId::At) => self.at_stmt(),
            TokenKind::Keyword(KeywordId::Object) => self.object_def(),
            _ => Err(self.unexpected("Expected 'prop', 'at', 'object' or 'end' in object body")),
        }
    }

    /// `prop name value`
    fn property_def(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Prop, "Expected 'prop'")?.span;
        let name = self.identifier("Expected property name")?;
        let value = self.value()?;
        let span = self.span_from(start);
        self.expect_line_end()?;

        let def = PropertyDef { name, value };
        Ok(self.push(Node::Stmt(Stmt::PropertyDef(def)), span))
    }

    /// `at sender receiver`
    fn at_stmt(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::At, "Expected 'at'")?.span;
        let sender = self.value()?;
        let receiver = self.value()?;
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(self.push(Node::Stmt(Stmt::At(AtStmt { sender, receiver })), span))
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// `var name [type] [= value]`
    fn var_def(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Var, "Expected 'var'")?.span;
        let name = self.identifier("Expected variable name")?;
        let ty = if self.check(&TokenKind::Eq) || self.at_line_end() {
            None
        } else {
            Some(self.type_expr()?)
        };
        let value = if self.match_token(&TokenKind::Eq) {
            Some(self.value()?)
        } else {
            None
        };
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(self.push(Node::Stmt(Stmt::VarDef(VarDef { name, ty, value })), span))
    }
}

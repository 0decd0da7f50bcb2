/// Declaration parsing.
///
/// Interfaces and their members (`fn`, `emit`, `prop`), structs and fields, enums and enum fields, constants and
/// typedefs. Block declarations share [`Parser::block`], which handles layout, `end` and per-line recovery.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parse block items until `end`, recovering at line boundaries.
    ///
    /// Returns the item ids and the span of the `end` keyword.
    fn block(
        &mut self,
        what: &str,
        mut item: impl FnMut(&mut Self) -> Result<NodeId, CompileError>,
    ) -> Result<(Vec<NodeId>, Span), CompileError> {
        let mut items = Vec::new();
        loop {
            self.skip_layout(true);
            if self.check_keyword(KeywordId::End) {
                self.pending_doc = None;
                let end = self.advance().span;
                self.expect_line_end()?;
                return Ok((items, end));
            }
            if self.is_at_end() {
                return Err(CompileError::syntax(
                    format!("Expected 'end' to close {}", what),
                    self.current_span(),
                ));
            }
            match item(self) {
                Ok(id) => items.push(id),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.pending_doc = None;
        }
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    /// `interface Name(Base, ...)` members `end`
    fn interface_decl(&mut self) -> Result<NodeId, CompileError> {
        let doc = self.pending_doc.take();
        let start = self.expect_keyword(KeywordId::Interface, "Expected 'interface'")?.span;
        let name = self.identifier("Expected interface name")?;
        let inherits = self.inherits_list()?;
        self.expect_line_end()?;

        let what = format!("interface '{}'", name);
        let (members, end) = self.block(&what, |p| p.interface_member())?;

        let decl = InterfaceDecl {
            name,
            inherits,
            members,
            doc,
        };
        Ok(self.push(Node::Decl(Decl::Interface(decl)), start.merge(end)))
    }

    fn interface_member(&mut self) -> Result<NodeId, CompileError> {
        match &self.peek().kind {
            TokenKind::Keyword(KeywordId::Fn) => self.fn_decl(),
            TokenKind::Keyword(KeywordId::Emit) => self.member_decl(KeywordId::Emit),
            TokenKind::Keyword(KeywordId::Prop) => self.member_decl(KeywordId::Prop),
            _ => Err(self.unexpected("Expected 'fn', 'emit', 'prop' or 'end' in interface body")),
        }
    }

    /// `fn name(params) [->] [ret]`
    fn fn_decl(&mut self) -> Result<NodeId, CompileError> {
        let doc = self.pending_doc.take();
        let start = self.expect_keyword(KeywordId::Fn, "Expected 'fn'")?.span;
        let name = self.identifier("Expected function name")?;
        let params = self.params()?;
        let has_arrow = self.match_token(&TokenKind::Arrow);
        let ret = if has_arrow || !self.at_line_end() {
            Some(self.type_expr()?)
        } else {
            None
        };
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = FnDecl { name, params, ret, doc };
        Ok(self.push(Node::Decl(Decl::Fn(decl)), span))
    }

    /// `emit name(params)` or `prop name(params)`
    fn member_decl(&mut self, keyword: KeywordId) -> Result<NodeId, CompileError> {
        let doc = self.pending_doc.take();
        let start = self.expect_keyword(keyword, "Expected member keyword")?.span;
        let name = self.identifier("Expected member name")?;
        let params = self.params()?;
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = MemberDecl { name, params, doc };
        let node = if keyword == KeywordId::Emit {
            Decl::Emit(decl)
        } else {
            Decl::Prop(decl)
        };
        Ok(self.push(Node::Decl(node), span))
    }

    /// `(name type, type, ...)`
    ///
    /// A parameter is named when an identifier is directly followed by something that starts a type.
    fn params(&mut self) -> Result<Vec<Param>, CompileError> {
        self.expect(&TokenKind::LParen, "Expected '(' before parameters")?;
        let mut params = Vec::new();
        if self.match_token(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let name = match &self.peek().kind {
                TokenKind::Ident(name) if starts_type(&self.peek_next().kind) => {
                    self.advance();
                    Some(name.clone())
                }
                _ => None,
            };
            let ty = self.type_expr()?;
            params.push(Param { name, ty });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "Expected ')' after parameters")?;
        Ok(params)
    }

    // ========================================================================
    // Structs
    // ========================================================================

    /// `struct Name(Base, ...)` fields `end`
    fn struct_decl(&mut self) -> Result<NodeId, CompileError> {
        let doc = self.pending_doc.take();
        let start = self.expect_keyword(KeywordId::Struct, "Expected 'struct'")?.span;
        let name = self.identifier("Expected struct name")?;
        let inherits = self.inherits_list()?;
        self.expect_line_end()?;

        let what = format!("struct '{}'", name);
        let (fields, end) = self.block(&what, |p| p.struct_field())?;

        let decl = StructDecl {
            name,
            inherits,
            fields,
            doc,
        };
        Ok(self.push(Node::Decl(Decl::Struct(decl)), start.merge(end)))
    }

    /// `name type [= value]`
    fn struct_field(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let name = self.identifier("Expected field name or 'end' in struct body")?;
        let ty = self.type_expr()?;
        let default = if self.match_token(&TokenKind::Eq) {
            Some(self.value()?)
        } else {
            None
        };
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = StructFieldDecl { name, ty, default };
        Ok(self.push(Node::Decl(Decl::StructField(decl)), span))
    }

    // ========================================================================
    // Enums
    // ========================================================================

    /// `enum Name` fields `end`
    fn enum_decl(&mut self) -> Result<NodeId, CompileError> {
        let doc = self.pending_doc.take();
        let start = self.expect_keyword(KeywordId::Enum, "Expected 'enum'")?.span;
        let name = self.identifier("Expected enum name")?;
        self.expect_line_end()?;

        let what = format!("enum '{}'", name);
        let (fields, end) = self.block(&what, |p| p.enum_field())?;

        let decl = EnumDecl { name, fields, doc };
        Ok(self.push(Node::Decl(Decl::Enum(decl)), start.merge(end)))
    }

    /// `const NAME = value` or `typedef type NAME`
    fn enum_field(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let (name, kind) = if self.match_keyword(KeywordId::Const) {
            let name = self.identifier("Expected enum constant name")?;
            self.expect(&TokenKind::Eq, "Expected '=' after enum constant name")?;
            (name, EnumFieldKind::Const(self.value()?))
        } else if self.match_keyword(KeywordId::Typedef) {
            let ty = self.type_expr()?;
            let name = self.identifier("Expected enum type name")?;
            (name, EnumFieldKind::Type(ty))
        } else {
            return Err(self.unexpected("Expected 'const', 'typedef' or 'end' in enum body"));
        };
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = EnumFieldDecl { name, kind };
        Ok(self.push(Node::Decl(Decl::EnumField(decl)), span))
    }

    // ========================================================================
    // Constants and typedefs
    // ========================================================================

    /// `const NAME [type] = value`
    fn const_decl(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Const, "Expected 'const'")?.span;
        let name = self.identifier("Expected constant name")?;
        let ty = if self.check(&TokenKind::Eq) {
            None
        } else {
            Some(self.type_expr()?)
        };
        self.expect(&TokenKind::Eq, "Expected '=' in constant declaration")?;
        let value = self.value()?;
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = ConstDecl { name, ty, value };
        Ok(self.push(Node::Decl(Decl::Const(decl)), span))
    }

    /// `typedef type NAME`
    fn typedef_decl(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect_keyword(KeywordId::Typedef, "Expected 'typedef'")?.span;
        let ty = self.type_expr()?;
        let name = self.identifier("Expected typedef name")?;
        let span = self.span_from(start);
        self.expect_line_end()?;

        let decl = TypeDefDecl { name, ty };
        Ok(self.push(Node::Decl(Decl::TypeDef(decl)), span))
    }
}

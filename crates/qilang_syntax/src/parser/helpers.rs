/// Token-stream helpers, node construction and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Layout handling (`skip_layout`, `expect_line_end`)
/// - Arena helpers (`push`, `location`)
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.pos.min(tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[(self.pos + 1).min(tokens.len() - 1)]
    }

    /// Return the most recently consumed token.
    fn previous(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.pos.saturating_sub(1)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Return `true` if the current token has the same variant as `kind` (payloads are ignored).
    fn check(&self, kind: &TokenKind) -> bool {
        match (kind, &self.peek().kind) {
            (TokenKind::Keyword(k1), TokenKind::Keyword(k2)) => k1 == k2,
            (TokenKind::Operator(o1), TokenKind::Operator(o2)) => o1 == o2,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    /// If the current token matches `kind`, consume it and return `true`.
    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Build a "`msg`, found X" syntax error at the current token.
    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(format!("{}, found {:?}", msg, self.peek().kind), self.peek().span)
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous().span)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Consume a newline, or accept end of input.
    fn expect_line_end(&mut self) -> Result<(), CompileError> {
        if self.match_token(&TokenKind::Newline) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("Expected end of line"))
        }
    }

    /// Return `true` if the current token ends the logical line.
    fn at_line_end(&self) -> bool {
        self.peek().kind.is_line_end()
    }

    /// Skip newlines and collect `##` documentation.
    ///
    /// `# ...` comments are skipped too when `skip_comments` is set (inside blocks they carry no meaning).
    fn skip_layout(&mut self, skip_comments: bool) {
        loop {
            match &self.peek().kind {
                TokenKind::Newline => {
                    self.advance();
                }
                TokenKind::Comment(_) if skip_comments => {
                    self.advance();
                }
                TokenKind::DocComment(text) => {
                    self.pending_doc = Some(match self.pending_doc.take() {
                        Some(mut doc) => {
                            doc.push('\n');
                            doc.push_str(text);
                            doc
                        }
                        None => text.clone(),
                    });
                    self.advance();
                }
                _ => return,
            }
        }
    }

    /// Skip to the start of the next line.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(self.advance().kind, TokenKind::Newline) {
                return;
            }
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn identifier(&mut self, msg: &str) -> Result<String, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name.clone())
            }
            _ => Err(self.unexpected(msg)),
        }
    }

    /// Parse `a.b.c`.
    fn dotted_name(&mut self, msg: &str) -> Result<String, CompileError> {
        let mut name = self.identifier(msg)?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.identifier("Expected identifier after '.'")?);
        }
        Ok(name)
    }

    /// Parse `(A, b.B, ...)` if present.
    fn inherits_list(&mut self) -> Result<Vec<String>, CompileError> {
        let mut inherits = Vec::new();
        if self.match_token(&TokenKind::LParen) {
            if !self.check(&TokenKind::RParen) {
                loop {
                    inherits.push(self.dotted_name("Expected base name")?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen, "Expected ')' after base list")?;
        }
        Ok(inherits)
    }

    // ========================================================================
    // Arena
    // ========================================================================

    fn location(&self, span: Span) -> Location {
        Location::new(
            Arc::clone(&self.filename),
            self.lines.position(span.start),
            self.lines.position(span.end),
        )
    }

    fn push(&mut self, node: Node, span: Span) -> NodeId {
        let location = self.location(span);
        self.ast.push(node, span, location)
    }
}

/// Expression and literal parsing.
///
/// Binary operators use precedence climbing over the `qilang_core` operator registry. Prefix operators bind tighter
/// than any binary operator; indexing (`a[b]`) binds tightest and is represented as a `[]` binary operation.
impl<'a> Parser<'a> {
    // ========================================================================
    // Values
    // ========================================================================

    /// Parse an initializer or property value.
    ///
    /// Plain literals are returned as literal nodes; anything computed stays an expression node.
    fn value(&mut self) -> Result<NodeId, CompileError> {
        let id = self.expression()?;
        match self.ast.expr(id) {
            Some(Expr::Literal(inner)) => Ok(*inner),
            _ => Ok(id),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<NodeId, CompileError> {
        self.binary(0)
    }

    fn binary(&mut self, min_precedence: u8) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let mut left = self.unary()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Operator(op) if operators::allows(*op, Fixity::Infix) => *op,
                _ => break,
            };
            let precedence = operators::precedence(op);
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.binary(precedence + 1)?;
            let span = self.span_from(start);
            left = self.push(Node::Expr(Expr::BinaryOp { op, left, right }), span);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        match &self.peek().kind {
            TokenKind::Operator(op) if operators::allows(*op, Fixity::Prefix) => {
                let op = *op;
                self.advance();
                let operand = self.unary()?;
                let span = self.span_from(start);
                Ok(self.push(Node::Expr(Expr::UnaryOp { op, operand }), span))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let mut expr = self.primary()?;
        while self.match_token(&TokenKind::LBracket) {
            let index = self.expression()?;
            self.expect(&TokenKind::RBracket, "Expected ']' after index")?;
            let span = self.span_from(start);
            expr = self.push(
                Node::Expr(Expr::BinaryOp {
                    op: OperatorId::FetchArray,
                    left: expr,
                    right: index,
                }),
                span,
            );
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        match &self.peek().kind {
            TokenKind::LParen => self.paren_expr(),
            TokenKind::Ident(_) => {
                let name = self.dotted_name("Expected name")?;
                if !self.match_token(&TokenKind::LParen) {
                    let span = self.span_from(start);
                    return Ok(self.push(Node::Expr(Expr::Var(name)), span));
                }
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.expression()?);
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen, "Expected ')' after call arguments")?;
                let span = self.span_from(start);
                Ok(self.push(Node::Expr(Expr::Call { name, args }), span))
            }
            _ => {
                let literal = self.literal()?;
                let span = self.span_from(start);
                Ok(self.push(Node::Expr(Expr::Literal(literal)), span))
            }
        }
    }

    /// `(expr)` grouping, or a tuple literal `()`, `(a,)`, `(a, b)`.
    fn paren_expr(&mut self) -> Result<NodeId, CompileError> {
        let start = self.expect(&TokenKind::LParen, "Expected '('")?.span;
        if self.match_token(&TokenKind::RParen) {
            let span = self.span_from(start);
            let tuple = self.push(Node::Literal(Literal::Tuple(Vec::new())), span);
            return Ok(self.push(Node::Expr(Expr::Literal(tuple)), span));
        }

        let first = self.expression()?;
        if self.match_token(&TokenKind::RParen) {
            return Ok(first);
        }
        self.expect(&TokenKind::Comma, "Expected ',' or ')'")?;

        let mut elements = vec![self.tuple_element(first)?];
        while !self.check(&TokenKind::RParen) {
            let element = self.expression()?;
            elements.push(self.tuple_element(element)?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "Expected ')' after tuple elements")?;
        let span = self.span_from(start);
        let tuple = self.push(Node::Literal(Literal::Tuple(elements)), span);
        Ok(self.push(Node::Expr(Expr::Literal(tuple)), span))
    }

    /// Unwrap a tuple element expression to its literal node.
    fn tuple_element(&self, id: NodeId) -> Result<NodeId, CompileError> {
        match self.ast.expr(id) {
            Some(Expr::Literal(inner)) => Ok(*inner),
            _ => Err(CompileError::syntax(
                "Tuple elements must be literals".to_string(),
                self.ast.span(id),
            )),
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// Parse a literal and return its literal node.
    fn literal(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        let literal = match &self.peek().kind {
            TokenKind::Int(v) => {
                let v = *v;
                self.advance();
                Literal::Int(v)
            }
            TokenKind::Float(v) => {
                let v = *v;
                self.advance();
                Literal::Float(v)
            }
            TokenKind::String(s) => {
                self.advance();
                Literal::String(s.clone())
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Literal::Bool(true)
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Literal::Bool(false)
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.literal_list(&TokenKind::RBracket)?;
                self.expect(&TokenKind::RBracket, "Expected ']' after list elements")?;
                Literal::List(elements)
            }
            TokenKind::LParen => {
                self.advance();
                let elements = self.literal_list(&TokenKind::RParen)?;
                self.expect(&TokenKind::RParen, "Expected ')' after tuple elements")?;
                Literal::Tuple(elements)
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    let key = self.literal()?;
                    self.expect(&TokenKind::Colon, "Expected ':' after dictionary key")?;
                    let value = self.literal()?;
                    entries.push((key, value));
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBrace, "Expected '}' after dictionary entries")?;
                Literal::Dict(entries)
            }
            _ => return Err(self.unexpected("Expected expression")),
        };
        let span = self.span_from(start);
        Ok(self.push(Node::Literal(literal), span))
    }

    /// Comma-separated literals up to (not including) `close`; a trailing comma is accepted.
    fn literal_list(&mut self, close: &TokenKind) -> Result<Vec<NodeId>, CompileError> {
        let mut elements = Vec::new();
        while !self.check(close) {
            elements.push(self.literal()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(elements)
    }
}

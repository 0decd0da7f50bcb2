/// Type expression parsing.
///
/// ```text
/// int32          builtin
/// pkg.Robot      custom (resolved later by the package manager)
/// []str          list
/// [str]int32     map
/// (str, int32)   tuple
/// ```
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn type_expr(&mut self) -> Result<NodeId, CompileError> {
        let start = self.current_span();
        match &self.peek().kind {
            TokenKind::LBracket => {
                self.advance();
                if self.match_token(&TokenKind::RBracket) {
                    let element = self.type_expr()?;
                    let span = self.span_from(start);
                    return Ok(self.push(Node::TypeExpr(TypeExpr::List(element)), span));
                }
                let key = self.type_expr()?;
                self.expect(&TokenKind::RBracket, "Expected ']' after map key type")?;
                let value = self.type_expr()?;
                let span = self.span_from(start);
                Ok(self.push(Node::TypeExpr(TypeExpr::Map { key, value }), span))
            }
            TokenKind::LParen => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        elements.push(self.type_expr()?);
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen, "Expected ')' after tuple element types")?;
                let span = self.span_from(start);
                Ok(self.push(Node::TypeExpr(TypeExpr::Tuple(elements)), span))
            }
            TokenKind::Ident(_) => {
                let name = self.dotted_name("Expected type name")?;
                let ty = match builtin_types::from_str(&name) {
                    Some(id) => TypeExpr::Builtin(id),
                    None => TypeExpr::Custom(name),
                };
                let span = self.span_from(start);
                Ok(self.push(Node::TypeExpr(ty), span))
            }
            _ => Err(self.unexpected("Expected type")),
        }
    }
}

/// Return `true` if a token can begin a type expression.
fn starts_type(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Ident(_) | TokenKind::LBracket | TokenKind::LParen)
}

/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by skipping to the next line, so one run reports
///   every independent mistake.
/// - Nodes are pushed into the arena bottom-up: children always have smaller ids than their parent.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
    ast: Ast,
    lines: LineIndex,
    filename: Arc<str>,
    /// `##` lines seen since the last declaration.
    pending_doc: Option<String>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `qilang_syntax::lexer`.
    /// - `source`: The text the tokens were produced from (used to compute line/column locations).
    /// - `filename`: Recorded in every node location.
    pub fn new(tokens: &'a [Token], source: &str, filename: &str) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            ast: Ast::new(),
            lines: LineIndex::new(source),
            filename: Arc::from(filename),
            pending_doc: None,
        }
    }

    /// Parse the entire token stream into an [`Ast`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails.
    pub fn parse(mut self) -> Result<Ast, Vec<CompileError>> {
        loop {
            self.skip_layout(false);
            if self.is_at_end() {
                break;
            }
            match self.top_level() {
                Ok(id) => self.ast.add_root(id),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(self.ast)
        } else {
            Err(self.errors)
        }
    }

    /// Parse one top-level statement or declaration.
    fn top_level(&mut self) -> Result<NodeId, CompileError> {
        if let TokenKind::Comment(text) = &self.peek().kind {
            let text = text.clone();
            let span = self.advance().span;
            self.expect_line_end()?;
            return Ok(self.push(Node::Stmt(Stmt::Comment(text)), span));
        }

        let id = match &self.peek().kind {
            TokenKind::Keyword(KeywordId::Package) => self.package_stmt(),
            TokenKind::Keyword(KeywordId::Import) | TokenKind::Keyword(KeywordId::From) => self.import_stmt(),
            TokenKind::Keyword(KeywordId::Interface) => self.interface_decl(),
            TokenKind::Keyword(KeywordId::Struct) => self.struct_decl(),
            TokenKind::Keyword(KeywordId::Enum) => self.enum_decl(),
            TokenKind::Keyword(KeywordId::Const) => self.const_decl(),
            TokenKind::Keyword(KeywordId::Typedef) => self.typedef_decl(),
            TokenKind::Keyword(KeywordId::Fn) => self.fn_decl(),
            TokenKind::Keyword(KeywordId::Object) => self.object_def(),
            TokenKind::Keyword(KeywordId::Var) => self.var_def(),
            TokenKind::Keyword(id @ (KeywordId::Emit | KeywordId::Prop)) => Err(CompileError::syntax(
                format!("'{}' is only valid inside an interface", keywords::as_str(*id)),
                self.current_span(),
            )),
            _ => Err(CompileError::syntax(
                format!("Expected declaration, found {:?}", self.peek().kind),
                self.current_span(),
            )),
        };
        self.pending_doc = None;
        id
    }
}

/// Parse a token stream into an [`Ast`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `qilang_syntax::lexer`.
/// - `source`: The text the tokens were lexed from.
/// - `filename`: Recorded in every node location.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), filename = %filename))]
pub fn parse(tokens: &[Token], source: &str, filename: &str) -> Result<Ast, Vec<CompileError>> {
    Parser::new(tokens, source, filename).parse()
}

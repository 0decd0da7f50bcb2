//! Lexer for the qilang interface definition language
//!
//! Handles tokenization including:
//! - Keywords (`package`, `interface`, `fn`, `emit`, `end`, ...)
//! - Identifiers and literals (int, float, string)
//! - Operators and punctuation
//! - Line structure (`Newline` tokens; blank lines collapse)
//! - Comments: `#` lines become `Comment` tokens, `##` lines become `DocComment` tokens, trailing comments are
//!   dropped
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use qilang_core::lang::operators::OperatorId;

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for qilang source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// No token has been emitted on the current line yet.
    at_line_start: bool,
    /// Bracket depth for implicit line continuation (parens, brackets, braces)
    bracket_depth: usize,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            at_line_start: true,
            bracket_depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with a `Newline` (if the last line had content) and an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        if !self.at_line_start {
            self.push(TokenKind::Newline, self.current_pos);
        }
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        if !matches!(kind, TokenKind::Newline) {
            self.at_line_start = false;
        }
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn error(&mut self, message: String, start: usize) {
        self.errors
            .push(CompileError::lexical(message, Span::new(start, self.current_pos)));
    }

    fn rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        text.trim_end_matches('\r').to_string()
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Skip whitespace (but not newlines)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '#' => self.scan_comment(start),

            '\n' => {
                // Inside brackets, or on a blank line: no token
                if self.bracket_depth == 0 && !self.at_line_start {
                    self.push(TokenKind::Newline, start);
                    self.at_line_start = true;
                }
            }

            '(' => self.open(TokenKind::LParen, start),
            '[' => self.open(TokenKind::LBracket, start),
            '{' => self.open(TokenKind::LBrace, start),
            ')' => self.close(TokenKind::RParen, start),
            ']' => self.close(TokenKind::RBracket, start),
            '}' => self.close(TokenKind::RBrace, start),
            ',' => self.push(TokenKind::Comma, start),
            ':' => self.push(TokenKind::Colon, start),
            '.' => self.push(TokenKind::Dot, start),

            '"' => self.scan_string(start),

            c if c.is_ascii_digit() => self.scan_number(c, start),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(c, start),

            c => self.scan_operator(c, start),
        }
    }

    fn open(&mut self, kind: TokenKind, start: usize) {
        self.bracket_depth += 1;
        self.push(kind, start);
    }

    fn close(&mut self, kind: TokenKind, start: usize) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
        self.push(kind, start);
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn scan_comment(&mut self, start: usize) {
        let is_doc = self.peek() == Some('#');
        if is_doc {
            self.advance();
        }
        let text = self.rest_of_line();
        if !self.at_line_start || self.bracket_depth > 0 {
            // Trailing comment
            return;
        }
        let text = text.strip_prefix(' ').unwrap_or(&text).to_string();
        let kind = if is_doc {
            TokenKind::DocComment(text)
        } else {
            TokenKind::Comment(text)
        };
        self.push(kind, start);
    }

    // ========================================================================
    // Literals and identifiers
    // ========================================================================

    fn scan_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    self.error("Unterminated string literal".to_string(), start);
                    return;
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(other) => {
                        self.error(format!("Unknown escape sequence '\\{}'", other), start);
                        value.push(other);
                    }
                    None => {
                        self.error("Unterminated string literal".to_string(), start);
                        return;
                    }
                },
                Some(c) => value.push(c),
            }
        }
        self.push(TokenKind::String(value), start);
    }

    fn scan_number(&mut self, first: char, start: usize) {
        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let mut digits = String::new();
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() || c == '_' {
                    if c != '_' {
                        digits.push(c);
                    }
                    self.advance();
                } else {
                    break;
                }
            }
            match u64::from_str_radix(&digits, 16) {
                Ok(v) => self.push(TokenKind::Int(v), start),
                Err(_) => self.error(format!("Invalid hexadecimal literal '0x{}'", digits), start),
            }
            return;
        }

        let mut text = String::from(first);
        let mut is_float = false;
        self.digits(&mut text);

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.advance();
            self.digits(&mut text);
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = self.peek_next();
            let has_exponent = match sign {
                Some('+') | Some('-') => self.source[self.current_pos + 2..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_exponent {
                is_float = true;
                text.push('e');
                self.advance();
                if let Some(s @ ('+' | '-')) = self.peek() {
                    text.push(s);
                    self.advance();
                }
                self.digits(&mut text);
            }
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(v) => self.push(TokenKind::Float(v), start),
                Err(_) => self.error(format!("Invalid float literal '{}'", text), start),
            }
        } else {
            match text.parse::<u64>() {
                Ok(v) => self.push(TokenKind::Int(v), start),
                Err(_) => self.error(format!("Integer literal '{}' does not fit in 64 bits", text), start),
            }
        }
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self, first: char, start: usize) {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match keyword_id(&name) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(name),
        };
        self.push(kind, start);
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn scan_operator(&mut self, c: char, start: usize) {
        let next = self.peek();
        let (kind, two_chars) = match (c, next) {
            ('-', Some('>')) => (Some(TokenKind::Arrow), true),
            ('|', Some('|')) => (Some(TokenKind::Operator(OperatorId::BoolOr)), true),
            ('&', Some('&')) => (Some(TokenKind::Operator(OperatorId::BoolAnd)), true),
            ('=', Some('=')) => (Some(TokenKind::Operator(OperatorId::EqEq)), true),
            ('!', Some('=')) => (Some(TokenKind::Operator(OperatorId::Ne)), true),
            ('>', Some('=')) => (Some(TokenKind::Operator(OperatorId::Ge)), true),
            ('<', Some('=')) => (Some(TokenKind::Operator(OperatorId::Le)), true),
            ('=', _) => (Some(TokenKind::Eq), false),
            ('|', _) => (Some(TokenKind::Operator(OperatorId::Or)), false),
            ('&', _) => (Some(TokenKind::Operator(OperatorId::And)), false),
            ('^', _) => (Some(TokenKind::Operator(OperatorId::Xor)), false),
            ('>', _) => (Some(TokenKind::Operator(OperatorId::Gt)), false),
            ('<', _) => (Some(TokenKind::Operator(OperatorId::Lt)), false),
            ('+', _) => (Some(TokenKind::Operator(OperatorId::Plus)), false),
            ('-', _) => (Some(TokenKind::Operator(OperatorId::Minus)), false),
            ('/', _) => (Some(TokenKind::Operator(OperatorId::Divide)), false),
            ('*', _) => (Some(TokenKind::Operator(OperatorId::Multiply)), false),
            ('%', _) => (Some(TokenKind::Operator(OperatorId::Modulus)), false),
            ('!', _) => (Some(TokenKind::Operator(OperatorId::Negate)), false),
            _ => (None, false),
        };
        if two_chars {
            self.advance();
        }
        match kind {
            Some(kind) => self.push(kind, start),
            None => self.error(format!("Unexpected character '{}'", c), start),
        }
    }
}

/// Tokenize `source`.
///
/// ## Errors
/// Returns every lexical error found; the lexer does not stop at the first one.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qilang_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("interface Foo"),
            vec![
                TokenKind::Keyword(KeywordId::Interface),
                TokenKind::Ident("Foo".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_out_is_emit_alias() {
        assert_eq!(kinds("out")[0], TokenKind::Keyword(KeywordId::Emit));
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(
            kinds("a\n\n\n  \nb\n"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Newline,
                TokenKind::Ident("b".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        assert_eq!(
            kinds("f(a,\n  b)"),
            vec![
                TokenKind::Ident("f".into()),
                TokenKind::LParen,
                TokenKind::Ident("a".into()),
                TokenKind::Comma,
                TokenKind::Ident("b".into()),
                TokenKind::RParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("0x1F")[0], TokenKind::Int(31));
        assert_eq!(kinds("1.5")[0], TokenKind::Float(1.5));
        assert_eq!(kinds("2e3")[0], TokenKind::Float(2000.0));
        assert_eq!(kinds("1.25e-2")[0], TokenKind::Float(0.0125));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let errs = lex("18446744073709551616").unwrap_err();
        assert!(errs[0].message.contains("does not fit"));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(kinds(r#""a\"b\n""#)[0], TokenKind::String("a\"b\n".into()));
    }

    #[test]
    fn test_unterminated_string() {
        let errs = lex("\"abc\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Unterminated"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("# hello\nx # trailing\n## doc\n"),
            vec![
                TokenKind::Comment("hello".into()),
                TokenKind::Newline,
                TokenKind::Ident("x".into()),
                TokenKind::Newline,
                TokenKind::DocComment("doc".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("-> || && == != <= >= - !"),
            vec![
                TokenKind::Arrow,
                TokenKind::Operator(OperatorId::BoolOr),
                TokenKind::Operator(OperatorId::BoolAnd),
                TokenKind::Operator(OperatorId::EqEq),
                TokenKind::Operator(OperatorId::Ne),
                TokenKind::Operator(OperatorId::Le),
                TokenKind::Operator(OperatorId::Ge),
                TokenKind::Operator(OperatorId::Minus),
                TokenKind::Operator(OperatorId::Negate),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let errs = lex("interface @").unwrap_err();
        assert!(errs[0].message.contains("Unexpected character '@'"));
    }
}

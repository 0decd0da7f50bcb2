//! Token types for the qilang lexer.
//!
//! Keywords and operators carry registry-backed ids from `qilang_core::lang`, so the parser never compares
//! spellings.

use crate::ast::Span;
use qilang_core::lang::keywords::{self, KeywordId};
use qilang_core::lang::operators::OperatorId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),

    // ========== Punctuation ==========
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Eq,
    Arrow,

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(u64),
    Float(f64),
    String(String),

    // ========== Comments ==========
    /// `# text` on a line of its own.
    Comment(String),
    /// `## text`, attached to the next declaration.
    DocComment(String),

    // ========== Layout ==========
    Newline,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return `true` for tokens that end a logical line.
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof | TokenKind::Comment(_))
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

//! Syntax frontend for the qilang interface definition language: lexer, parser, AST arena, traversal, diagnostics.
//!
//! This crate is dependency-light and shared by the compiler and its tests.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do package discovery or type resolution.
//! - Vocabulary identity (keywords/operators/builtin types) comes from `qilang_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! let ast = qilang_syntax::parse_source("package demo\ninterface Foo\nend\n", "demo/foo.qi").unwrap();
//! assert_eq!(ast.roots().len(), 2);
//! ```
//!
//! ## See also
//! - `qilang_core::lang` for keyword/operator/builtin type registries.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod visitor;

use ast::Ast;
use diagnostics::CompileError;

/// Lex and parse `source` in one step.
///
/// `filename` is recorded in every node location.
///
/// ## Errors
/// Returns every lexer error, or every parser error if lexing succeeded.
pub fn parse_source(source: &str, filename: &str) -> Result<Ast, Vec<CompileError>> {
    let tokens = lexer::lex(source)?;
    parser::parse(&tokens, source, filename)
}

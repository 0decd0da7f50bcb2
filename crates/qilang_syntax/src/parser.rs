//! Parser for the qilang interface definition language
//!
//! Converts a token stream into an [`Ast`] arena. The grammar is line oriented: every declaration or statement
//! ends at a newline and blocks (`interface`, `struct`, `enum`, `object`) are closed by `end`.
//!
//! ## Examples
//!
//! ```rust
//! use qilang_syntax::{lexer, parser};
//!
//! let source = "package demo\ninterface Foo\n  fn ping() int32\nend\n";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens, source, "demo/foo.qi").unwrap();
//! assert_eq!(ast.roots().len(), 2);
//! ```

use std::sync::Arc;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use qilang_core::lang::keywords::{self, KeywordId};
use qilang_core::lang::operators::{self, Fixity, OperatorId};
use qilang_core::lang::types as builtin_types;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");

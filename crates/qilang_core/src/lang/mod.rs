//! qilang vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `OperatorId`, `BuiltinTypeId`) and look up spellings/metadata via
//! registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings for shared use (parsing, formatting, codegen).
//!
//! ## Examples
//! ```rust
//! use qilang_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("interface"), Some(KeywordId::Interface));
//! assert_eq!(keywords::as_str(KeywordId::Interface), "interface");
//! ```

pub mod keywords;
pub mod operators;
pub mod types;

//! qilang Compiler Frontend
//!
//! This module contains all frontend components:
//! - `ast`, `lexer`, `parser`, `visitor`: re-exported from the shared `qilang_syntax` crate
//! - `package`: packages, parsed files, exports and resolution results
//! - `package_manager`: package discovery, loading and type resolution
//! - `diagnostics`: diagnostics sink for everything found after parsing
//! - `docparser`: `##` documentation blocks

// Syntax components are provided by the shared qilang_syntax crate.
pub use qilang_syntax::{ast, lexer, parser, visitor};

pub mod diagnostics;
pub mod docparser;
pub mod package;
pub mod package_manager;

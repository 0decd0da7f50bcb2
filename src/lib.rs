#![forbid(unsafe_code)]
//! qilang Interface Definition Language Compiler
//!
//! qilang describes service interfaces (methods, signals, properties) and the data types they exchange.
//! This crate provides the compiler: frontend (package loading, type resolution, documentation parsing) and
//! backend (C++ bindings, canonical qilang, s-expression and JSON documentation output). Lexing and parsing live in
//! the shared `qilang_syntax` crate.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod backend;
pub mod cli;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::package_manager::{PackageError, PackageManager};

pub use backend::{Backend, CodegenOptions, GenError, generate};
